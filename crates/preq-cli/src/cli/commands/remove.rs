//! `preq remove <id>` – drop a queued request without sending it.

use anyhow::Result;
use preq_core::manager::SharedManager;

pub async fn run_remove(manager: &SharedManager, id: &str) -> Result<()> {
    match manager.lock().await.remove_by_id(id).await? {
        Some(_) => println!("Removed request {id}"),
        None => println!("No queued request with id {id}"),
    }
    Ok(())
}
