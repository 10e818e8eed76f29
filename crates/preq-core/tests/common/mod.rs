#![allow(dead_code)]

pub mod capture_server;

use async_trait::async_trait;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use preq_core::client::{Transport, WireRequest, WireResponse};
use preq_core::Result;

/// Transport that answers every request with a fixed status and keeps what
/// it was asked to send.
#[derive(Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<WireRequest>>>,
    status: Arc<AtomicU16>,
}

impl RecordingTransport {
    pub fn new(status: u16) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            status: Arc::new(AtomicU16::new(status)),
        }
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<WireRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> WireRequest {
        self.sent().pop().expect("nothing sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(WireResponse {
            status: self.status.load(Ordering::SeqCst),
            headers: Vec::new(),
            body: b"{}".to_vec(),
        })
    }
}
