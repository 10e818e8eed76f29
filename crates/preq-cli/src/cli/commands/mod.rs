//! CLI command handlers. Each command is in its own file.

mod export_har;
mod import_har;
mod list;
mod remove;
mod replay;
mod reset;
mod send;
mod show;

pub use export_har::run_export_har;
pub use import_har::run_import_har;
pub use list::run_list;
pub use remove::run_remove;
pub use replay::run_replay;
pub use reset::run_reset;
pub use send::run_send;
pub use show::run_show;
