//! Pass-through proxy for the AI provider's chat and image endpoints.
//!
//! The server holds the API key; clients only ever see the provider's JSON
//! response, which is forwarded unchanged (upstream error payloads included).

use crate::config::Config;
use crate::error::{Error, Result};
use crate::transport::HttpTransport;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_IMAGE_SIZE: &str = "1792x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "standard";
pub const DEFAULT_IMAGE_COUNT: u32 = 1;

const CHAT_PATH: &str = "chat/completions";
const IMAGE_PATH: &str = "images/generations";

/// Caller fields are kept as raw JSON and forwarded without type checks; the
/// provider decides what it accepts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Conversation in the provider's message format, passed through as-is.
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub quality: Option<Value>,
    #[serde(default)]
    pub n: Option<Value>,
}

pub struct OpenAiProxy {
    api_key: Option<String>,
    base_url: String,
    chat_model: String,
    image_model: String,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiProxy {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<Value> {
        let api_key = self.api_key()?;
        let body = self.chat_body(request);
        self.forward(CHAT_PATH, api_key, &body).await
    }

    pub async fn generate_image(&self, request: &ImageRequest) -> Result<Value> {
        let api_key = self.api_key()?;
        let body = self.image_body(request);
        self.forward(IMAGE_PATH, api_key, &body).await
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(Error::NotConfigured("OpenAI API Key"))
    }

    fn chat_body(&self, request: &ChatRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), Value::from(self.chat_model.as_str()));
        if let Some(messages) = &request.messages {
            body.insert("messages".into(), messages.clone());
        }
        body.insert(
            "max_tokens".into(),
            or_default(&request.max_tokens, Value::from(DEFAULT_MAX_TOKENS)),
        );
        Value::Object(body)
    }

    fn image_body(&self, request: &ImageRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), Value::from(self.image_model.as_str()));
        if let Some(prompt) = &request.prompt {
            body.insert("prompt".into(), prompt.clone());
        }
        body.insert(
            "size".into(),
            or_default(&request.size, Value::from(DEFAULT_IMAGE_SIZE)),
        );
        body.insert(
            "quality".into(),
            or_default(&request.quality, Value::from(DEFAULT_IMAGE_QUALITY)),
        );
        body.insert(
            "n".into(),
            or_default(&request.n, Value::from(DEFAULT_IMAGE_COUNT)),
        );
        Value::Object(body)
    }

    async fn forward(&self, path: &str, api_key: &str, body: &Value) -> Result<Value> {
        let url = format!("{}/{path}", self.base_url);
        let started = std::time::Instant::now();

        let response = self.transport.post_json(&url, api_key, body).await?;

        if response.is_success() {
            tracing::debug!(
                %path,
                status = response.status,
                duration_ms = started.elapsed().as_millis() as u64,
                "upstream request completed"
            );
        } else {
            tracing::warn!(
                %path,
                status = response.status,
                "upstream returned an error payload, forwarding it"
            );
        }

        response.json()
    }
}

/// Caller value unless it is missing or falsy (`null`, `false`, `0`, `""`).
fn or_default(value: &Option<Value>, default: Value) -> Value {
    match value {
        Some(value) if !is_falsy(value) => value.clone(),
        _ => default,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    fn proxy(api_key: Option<&str>, transport: &MockTransport) -> OpenAiProxy {
        let config = Config {
            openai_api_key: api_key.map(str::to_string),
            openai_base_url: "https://llm.example.com/v1/".into(),
            ..Config::default()
        };
        OpenAiProxy::new(&config, Arc::new(transport.clone()))
    }

    #[tokio::test]
    async fn missing_key_never_reaches_upstream() {
        let transport = MockTransport::new();
        let proxy = proxy(None, &transport);

        let chat = proxy.chat_completion(&ChatRequest::default()).await;
        let image = proxy.generate_image(&ImageRequest::default()).await;

        assert!(matches!(chat, Err(Error::NotConfigured(_))));
        assert!(matches!(image, Err(Error::NotConfigured(_))));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn chat_applies_defaults_and_bearer_credential() {
        let transport = MockTransport::new().with_json(200, json!({ "id": "chatcmpl-1" }));
        let proxy = proxy(Some("sk-test"), &transport);
        let request = ChatRequest {
            messages: Some(json!([{ "role": "user", "content": "Hallo" }])),
            max_tokens: None,
        };

        let response = proxy.chat_completion(&request).await.expect("chat");
        assert_eq!(response, json!({ "id": "chatcmpl-1" }));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://llm.example.com/v1/chat/completions");
        assert_eq!(calls[0].bearer_token.as_deref(), Some("sk-test"));
        assert_eq!(
            calls[0].body,
            Some(json!({
                "model": "gpt-4",
                "messages": [{ "role": "user", "content": "Hallo" }],
                "max_tokens": 800
            }))
        );
    }

    #[tokio::test]
    async fn chat_keeps_caller_max_tokens_but_not_zero() {
        let transport = MockTransport::new();
        let proxy = proxy(Some("sk-test"), &transport);

        for (requested, expected) in [(json!(64), json!(64)), (json!(0), json!(800))] {
            let request = ChatRequest {
                messages: Some(json!([])),
                max_tokens: Some(requested),
            };
            proxy.chat_completion(&request).await.expect("chat");
            let body = transport.calls().last().and_then(|c| c.body.clone()).expect("body");
            assert_eq!(body["max_tokens"], expected);
        }
    }

    #[tokio::test]
    async fn image_merges_caller_values_with_defaults() {
        let transport = MockTransport::new().with_json(200, json!({ "data": [] }));
        let proxy = proxy(Some("sk-test"), &transport);

        let request = ImageRequest {
            prompt: Some(json!("Ein Leuchtturm bei Nacht")),
            size: Some(json!("")),
            quality: Some(json!("hd")),
            n: None,
        };
        proxy.generate_image(&request).await.expect("image");

        let call = &transport.calls()[0];
        assert_eq!(call.url, "https://llm.example.com/v1/images/generations");
        assert_eq!(
            call.body,
            Some(json!({
                "model": "dall-e-3",
                "prompt": "Ein Leuchtturm bei Nacht",
                "size": "1792x1024",
                "quality": "hd",
                "n": 1
            }))
        );
    }

    #[tokio::test]
    async fn loosely_typed_values_are_forwarded_unchanged() {
        let transport = MockTransport::new();
        let proxy = proxy(Some("sk-test"), &transport);

        let chat = ChatRequest {
            messages: Some(json!([])),
            max_tokens: Some(json!("500")),
        };
        proxy.chat_completion(&chat).await.expect("chat");

        let image = ImageRequest {
            prompt: Some(json!("Berge")),
            size: Some(json!(null)),
            quality: Some(json!(false)),
            n: Some(json!(-1)),
        };
        proxy.generate_image(&image).await.expect("image");

        let calls = transport.calls();
        let chat_body = calls[0].body.clone().expect("chat body");
        assert_eq!(chat_body["max_tokens"], json!("500"));
        let image_body = calls[1].body.clone().expect("image body");
        assert_eq!(image_body["n"], json!(-1));
        assert_eq!(image_body["size"], json!("1792x1024"));
        assert_eq!(image_body["quality"], json!("standard"));
    }

    #[test]
    fn falsy_values_match_loose_truthiness() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(-1), json!(0.5), json!("0"), json!([]), json!({})] {
            assert!(!is_falsy(&value), "{value} should be truthy");
        }
    }

    #[tokio::test]
    async fn upstream_error_payload_is_forwarded_verbatim() {
        let payload = json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        });
        let transport = MockTransport::new().with_json(401, payload.clone());
        let proxy = proxy(Some("sk-wrong"), &transport);

        let response = proxy
            .chat_completion(&ChatRequest::default())
            .await
            .expect("forwarded");
        assert_eq!(response, payload);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_error() {
        let transport = MockTransport::new().failing("dns lookup failed");
        let proxy = proxy(Some("sk-test"), &transport);

        let result = proxy.generate_image(&ImageRequest::default()).await;
        assert!(matches!(result, Err(Error::Other(_))));
        assert_eq!(transport.call_count(), 1);
    }
}
