//! Tagged request envelopes: the unit held in the queue.

use std::fmt;
use std::str::FromStr;

use crate::client::ClientRequest;
use crate::error::PreqError;

/// Which client binding produced a queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientType {
    #[default]
    Native,
}

impl ClientType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientType::Native => "NATIVE_CLIENT",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = PreqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NATIVE_CLIENT" | "native" => Ok(ClientType::Native),
            other => Err(PreqError::UnsupportedClientType(other.to_string())),
        }
    }
}

/// The live request, one variant per client binding.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedRequest {
    Native(ClientRequest),
}

impl TaggedRequest {
    pub fn client_type(&self) -> ClientType {
        match self {
            TaggedRequest::Native(_) => ClientType::Native,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    pub request_id: String,
    pub raw_request: TaggedRequest,
}

impl RequestEnvelope {
    pub fn client_type(&self) -> ClientType {
        self.raw_request.client_type()
    }

    pub fn native(&self) -> &ClientRequest {
        match &self.raw_request {
            TaggedRequest::Native(request) => request,
        }
    }

    pub fn into_native(self) -> ClientRequest {
        match self.raw_request {
            TaggedRequest::Native(request) => request,
        }
    }
}
