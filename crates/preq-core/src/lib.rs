pub mod config;
pub mod logging;

pub mod client;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod har;
pub mod ids;
pub mod interceptor;
pub mod manager;
pub mod persist;

pub use error::{PreqError, Result};
