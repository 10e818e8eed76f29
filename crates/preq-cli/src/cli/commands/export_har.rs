//! `preq export-har [--output <file>]` – write the queue as a HAR log.

use anyhow::{Context, Result};
use preq_core::har;
use preq_core::manager::SharedManager;
use std::path::Path;

pub async fn run_export_har(manager: &SharedManager, output: Option<&Path>) -> Result<()> {
    let records = manager.lock().await.stored_records().await?;
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            har::write_har(&records, std::io::BufWriter::new(file))?;
            println!("Exported {} request(s) to {}", records.len(), path.display());
        }
        None => har::write_har(&records, std::io::stdout().lock())?,
    }
    Ok(())
}
