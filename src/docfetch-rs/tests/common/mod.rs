//! Shared test helpers: an in-memory transport that records requests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docfetch::{
    bson::Document, codec, Auth, Client, ClientOptions, HttpRequest, HttpResponse, Transport,
    TransportError,
};

pub const ENDPOINT: &str = "https://data.example.com/app/data-test/endpoint/data/v1";
pub const DATA_SOURCE: &str = "Cluster0";

/// Replies to every request with the same response and keeps what it was sent.
pub struct RecordingTransport {
    response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Self::with_response(HttpResponse::new(status, body))
    }

    pub fn with_response(response: HttpResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// Decoded body of the last request.
    pub fn last_body(&self) -> Document {
        codec::decode_document(&self.last_request().body).unwrap()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Fails every request the way a DNS or connect error would.
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err("dns error: failed to lookup address information".into())
    }
}

pub fn client_with(transport: Arc<dyn Transport>) -> Client {
    Client::new(
        ClientOptions::new(ENDPOINT, DATA_SOURCE, Auth::api_key("test-key")).with_transport(transport),
    )
    .unwrap()
}
