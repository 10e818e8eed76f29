//! `preq reset` – drop every queued request.

use anyhow::Result;
use preq_core::manager::SharedManager;

pub async fn run_reset(manager: &SharedManager) -> Result<()> {
    let mut manager = manager.lock().await;
    let count = manager.queue().len();
    manager.reset().await?;
    println!("Removed {count} queued request(s)");
    Ok(())
}
