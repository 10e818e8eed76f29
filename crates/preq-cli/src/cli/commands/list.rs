//! `preq list` – show every queued request.

use anyhow::Result;
use preq_core::manager::SharedManager;

pub async fn run_list(manager: &SharedManager) -> Result<()> {
    let manager = manager.lock().await;
    let queue = manager.queue();
    if queue.is_empty() {
        println!("No queued requests.");
        return Ok(());
    }
    println!("{:<50} {:<8} {:<11} {}", "ID", "METHOD", "BODY", "URL");
    for envelope in queue {
        let request = envelope.native();
        let body = request.data.as_ref().map_or("-", |b| b.kind());
        println!(
            "{:<50} {:<8} {:<11} {}",
            envelope.request_id,
            request.method.as_str(),
            body,
            request.resolved_url()
        );
    }
    Ok(())
}
