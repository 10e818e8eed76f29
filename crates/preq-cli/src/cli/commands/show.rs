//! `preq show <id>` – print the stored record of one request.

use anyhow::{bail, Result};
use preq_core::manager::SharedManager;

pub async fn run_show(manager: &SharedManager, id: &str) -> Result<()> {
    let records = manager.lock().await.stored_records().await?;
    let Some(record) = records.iter().find(|r| r.request_id == id) else {
        bail!("no queued request with id {id}");
    };
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
