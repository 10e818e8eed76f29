//! HAR (HTTP Archive) interop: export the pending queue as a HAR log and
//! import the requests of a HAR file captured elsewhere (e.g. browser devtools).

mod export;
mod import;
mod parse;

pub use export::{records_to_har, write_har};
pub use import::{har_to_requests, read_har};
pub use parse::{HarEntry, HarHeader, HarLog, HarParam, HarPostData, HarRequest, HAR_VERSION};
