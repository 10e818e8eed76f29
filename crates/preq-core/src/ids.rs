//! Request ids and tagging.
//!
//! Ids are `<epoch millis>-<uuid v4>`. The millisecond prefix is zero padded
//! so ids sort lexically by creation time; ids from the same millisecond are
//! told apart by the random suffix, not ordered by it.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::client::ClientRequest;
use crate::envelope::{ClientType, RequestEnvelope, TaggedRequest};

pub fn generate_request_id() -> String {
    format!("{:013}-{}", epoch_millis(), Uuid::new_v4())
}

/// Wraps `request` in an envelope with a fresh id and stamps the id onto the
/// request for later correlation.
pub fn tag_request(mut request: ClientRequest, client_type: ClientType) -> RequestEnvelope {
    let request_id = generate_request_id();
    request.persistence_id = Some(request_id.clone());
    let raw_request = match client_type {
        ClientType::Native => TaggedRequest::Native(request),
    };
    RequestEnvelope {
        request_id,
        raw_request,
    }
}

/// Creation time encoded in an id, if it has the expected shape.
pub fn id_timestamp_millis(request_id: &str) -> Option<i64> {
    request_id.split_once('-')?.0.parse().ok()
}

pub(crate) fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
