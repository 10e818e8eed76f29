//! Request codec: live envelopes to storage-safe records and back.
//!
//! Dispatches on the client binding that produced a request. Serialization
//! works on the envelope in place because the outgoing transform and the
//! Content-Type correction touch the live request, exactly as a send would.

mod native;
mod record;

pub use native::{content_type_or_unknown, infer_content_type, NativeCodec, UNKNOWN_CONTENT_TYPE};
pub use record::{FileEncoding, FormEntry, Header, PostData, SerializedRequest, HTTP_VERSION};

use crate::client::ClientDefaults;
use crate::envelope::{ClientType, RequestEnvelope, TaggedRequest};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct RequestCodec {
    native: NativeCodec,
}

impl RequestCodec {
    /// `defaults` is what deserialized native requests are rebuilt on.
    pub fn new(defaults: ClientDefaults) -> Self {
        Self {
            native: NativeCodec::new(defaults),
        }
    }

    pub fn native(&self) -> &NativeCodec {
        &self.native
    }

    pub async fn serialize(&self, envelope: &mut RequestEnvelope) -> Result<SerializedRequest> {
        let request_id = envelope.request_id.clone();
        match &mut envelope.raw_request {
            TaggedRequest::Native(request) => self.native.serialize(&request_id, request).await,
        }
    }

    /// Fails with `UnsupportedClientType` when the record names no known
    /// binding.
    pub fn deserialize(&self, record: &SerializedRequest) -> Result<RequestEnvelope> {
        let raw_request = match record.client_type.parse::<ClientType>()? {
            ClientType::Native => TaggedRequest::Native(self.native.deserialize(record)?),
        };
        Ok(RequestEnvelope {
            request_id: record.request_id.clone(),
            raw_request,
        })
    }

    /// Serializes in queue order.
    pub async fn serialize_all(&self, queue: &mut [RequestEnvelope]) -> Result<Vec<SerializedRequest>> {
        let mut records = Vec::with_capacity(queue.len());
        for envelope in queue.iter_mut() {
            records.push(self.serialize(envelope).await?);
        }
        Ok(records)
    }

    pub fn deserialize_all(&self, records: &[SerializedRequest]) -> Result<Vec<RequestEnvelope>> {
        records.iter().map(|r| self.deserialize(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Method, RequestBody};
    use crate::error::PreqError;
    use crate::ids::tag_request;
    use serde_json::json;

    #[tokio::test]
    async fn envelope_round_trip_keeps_id_and_binding() {
        let codec = RequestCodec::default();
        let request = codec
            .native()
            .defaults()
            .request(Method::Patch, "https://example.com/posts/1")
            .with_data(RequestBody::Json(json!({ "title": "x" })));
        let mut envelope = tag_request(request, ClientType::Native);

        let record = codec.serialize(&mut envelope).await.unwrap();
        assert_eq!(record.request_id, envelope.request_id);
        assert_eq!(record.client_type, "NATIVE_CLIENT");

        let rebuilt = codec.deserialize(&record).unwrap();
        assert_eq!(rebuilt.request_id, envelope.request_id);
        assert_eq!(rebuilt.client_type(), ClientType::Native);
        assert_eq!(
            rebuilt.native().persistence_id.as_deref(),
            Some(envelope.request_id.as_str())
        );
        assert_eq!(rebuilt.native().data, envelope.native().data);
    }

    #[tokio::test]
    async fn serialize_all_keeps_queue_order() {
        let codec = RequestCodec::default();
        let mut queue: Vec<RequestEnvelope> = ["a", "b", "c"]
            .iter()
            .map(|p| {
                let url = format!("https://example.com/{p}");
                tag_request(codec.native().defaults().request(Method::Get, url), ClientType::Native)
            })
            .collect();
        let records = codec.serialize_all(&mut queue).await.unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://example.com/a", "https://example.com/b", "https://example.com/c"]
        );
        let rebuilt = codec.deserialize_all(&records).unwrap();
        let ids: Vec<&str> = rebuilt.iter().map(|e| e.request_id.as_str()).collect();
        let expected: Vec<&str> = queue.iter().map(|e| e.request_id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn unknown_client_type_is_rejected() {
        let record = SerializedRequest {
            request_id: "1-x".to_string(),
            client_type: "FETCH".to_string(),
            method: "GET".to_string(),
            url: "https://example.com/".to_string(),
            http_version: HTTP_VERSION.to_string(),
            headers: Vec::new(),
            post_data: None,
        };
        let err = RequestCodec::default().deserialize(&record).unwrap_err();
        assert!(matches!(err, PreqError::UnsupportedClientType(t) if t == "FETCH"));
    }
}
