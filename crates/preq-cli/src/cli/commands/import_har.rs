//! `preq import-har <path>` – queue the requests of a HAR file.

use anyhow::Result;
use preq_core::har;
use preq_core::manager::{QueueSettings, SharedManager};
use std::path::Path;

pub async fn run_import_har(
    manager: &SharedManager,
    settings: &QueueSettings,
    path: &Path,
) -> Result<()> {
    let log = har::read_har(path)?;
    let requests = har::har_to_requests(&log, &settings.client_defaults)?;
    let mut manager = manager.lock().await;
    let client_type = manager.default_client_type();
    for request in requests {
        let envelope = manager.enqueue(request, client_type).await?;
        println!(
            "Queued {} {} {}",
            envelope.request_id,
            envelope.native().method,
            envelope.native().resolved_url()
        );
    }
    Ok(())
}
