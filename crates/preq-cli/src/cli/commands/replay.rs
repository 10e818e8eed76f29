//! `preq replay [<id>] [--all]` – send queued requests again.
//!
//! Replays go through a client without the queue interceptor, so a replayed
//! request is not queued a second time. Entries are removed only after a 2xx.

use anyhow::{bail, Result};
use preq_core::client::{CurlTransport, HttpClient};
use preq_core::envelope::RequestEnvelope;
use preq_core::manager::{QueueSettings, SharedManager};
use std::sync::Arc;

pub async fn run_replay(
    manager: &SharedManager,
    settings: &QueueSettings,
    id: Option<&str>,
    all: bool,
) -> Result<()> {
    let targets: Vec<RequestEnvelope> = {
        let manager = manager.lock().await;
        if all {
            manager.queue().to_vec()
        } else {
            let Some(id) = id else {
                bail!("give a request id or --all");
            };
            match manager.get(id) {
                Some(envelope) => vec![envelope.clone()],
                None => bail!("no queued request with id {id}"),
            }
        }
    };

    let client = HttpClient::new(
        settings.client_defaults.clone(),
        Arc::new(CurlTransport::default()),
    );
    let mut failed = 0usize;
    for envelope in &targets {
        let request = envelope.native().clone();
        match client.request(request).await {
            Ok(response) => {
                manager.lock().await.remove_by_id(&envelope.request_id).await?;
                println!("{} {} {}", response.status, envelope.request_id, envelope.native().resolved_url());
            }
            Err(err) => {
                failed += 1;
                tracing::warn!(request_id = %envelope.request_id, "replay failed: {err}");
                println!("failed {} ({err})", envelope.request_id);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} replayed request(s) failed and stay queued", targets.len());
    }
    if targets.is_empty() {
        println!("No queued requests.");
    }
    Ok(())
}
