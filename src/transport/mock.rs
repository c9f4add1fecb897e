//! Recording transport for deterministic tests.
//!
//! ```rust
//! use article_gallery::transport::mock::MockTransport;
//!
//! let transport = MockTransport::new().with_json(200, serde_json::json!({ "ok": true }));
//! assert_eq!(transport.call_count(), 0);
//! ```

use super::{HttpTransport, TransportResponse};
use crate::error::{Error, Result};

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One request observed by the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: &'static str,
    pub url: String,
    pub bearer_token: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Respond(TransportResponse),
    Fail(String),
}

/// Transport that answers every request with a canned reply and logs it.
#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: MockReply,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Answers `200` with an empty JSON object.
    pub fn new() -> Self {
        Self {
            reply: MockReply::Respond(TransportResponse {
                status: 200,
                body: b"{}".to_vec(),
            }),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.reply = MockReply::Respond(TransportResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        let bytes = body.to_string().into_bytes();
        self.with_response(status, bytes)
    }

    /// Simulate a connection-level failure on every request.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = MockReply::Fail(message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: MockCall) -> Result<TransportResponse> {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(call);
        }
        match &self.reply {
            MockReply::Respond(response) => Ok(response.clone()),
            MockReply::Fail(message) => Err(Error::Other(anyhow::anyhow!("{message}"))),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        self.record(MockCall {
            method: "GET",
            url: url.to_string(),
            bearer_token: None,
            body: None,
        })
    }

    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse> {
        self.record(MockCall {
            method: "POST",
            url: url.to_string(),
            bearer_token: Some(bearer_token.to_string()),
            body: Some(body.clone()),
        })
    }
}
