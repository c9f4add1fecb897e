//! Outbound HTTP seam.
//!
//! The image fetcher and the AI proxy talk to the network only through
//! [`HttpTransport`], which keeps them testable against [`mock::MockTransport`].

pub mod mock;

use crate::error::Result;

use async_trait::async_trait;

/// Fully buffered response from a single outbound request.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET and buffer the whole body in memory.
    async fn get(&self, url: &str) -> Result<TransportResponse>;

    /// POST `body` as JSON with a bearer credential.
    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse>;
}

/// Production transport backed by a shared `reqwest::Client`.
///
/// No timeouts and no retries are configured; a hung upstream blocks only the
/// request waiting on it.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("article-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn collect(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let response = self.client.get(url).send().await?;
        Self::collect(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .json(body)
            .send()
            .await?;
        Self::collect(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_covers_2xx_only() {
        let ok = TransportResponse { status: 200, body: Vec::new() };
        let created = TransportResponse { status: 201, body: Vec::new() };
        let missing = TransportResponse { status: 404, body: Vec::new() };

        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn json_rejects_non_json_bodies() {
        let response = TransportResponse {
            status: 502,
            body: b"<html>Bad Gateway</html>".to_vec(),
        };
        assert!(response.json().is_err());
    }
}
