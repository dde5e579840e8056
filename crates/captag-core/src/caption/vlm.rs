//! VLM caption provider using an OpenAI-compatible Chat Completions API.
//!
//! Sends the image as a JPEG data URL next to the prompt in a single user
//! message. One attempt per call; no retries.

use super::provider::CaptionProvider;
use crate::config::{ImageConfig, VlmConfig};
use crate::error::CaptionError;
use crate::image::SourceImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Caption provider for a self-hosted or remote VLM.
pub struct VlmProvider {
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
    image: ImageConfig,
    client: reqwest::Client,
}

impl VlmProvider {
    pub fn new(config: &VlmConfig, image: &ImageConfig) -> Self {
        Self::with_client(config, image, reqwest::Client::new())
    }

    /// Create with a shared HTTP client.
    pub fn with_client(config: &VlmConfig, image: &ImageConfig, client: reqwest::Client) -> Self {
        Self {
            endpoint: config.endpoint(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_millis(config.timeout_ms),
            image: image.clone(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CaptionProvider for VlmProvider {
    fn name(&self) -> &str {
        "vlm"
    }

    async fn caption(&self, image: &SourceImage, prompt: &str) -> Result<String, CaptionError> {
        if prompt.trim().is_empty() {
            return Err(CaptionError::InvalidInput("prompt is empty".to_string()));
        }

        let payload = image.to_jpeg(&self.image).await?;
        tracing::debug!(
            "Encoded {} as {}x{} JPEG ({} base64 chars)",
            image.name,
            payload.width,
            payload.height,
            payload.data.len()
        );

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: prompt.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: payload.data_url(),
                        },
                    },
                ],
            }],
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let start = Instant::now();
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CaptionError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                CaptionError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CaptionError::Response(format!("invalid JSON: {e}")))?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CaptionError::Response("empty choices array".to_string()))?
            .message
            .content
            .ok_or_else(|| CaptionError::Response("choice has no message content".to_string()))?;

        tracing::debug!(
            "Caption received from {} in {}ms",
            self.endpoint,
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use serde_json::{json, Value};
    use std::io::Cursor;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_image() -> SourceImage {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        SourceImage::from_bytes(buf.into_inner(), "test.png")
    }

    fn provider(server: &MockServer, api_key: Option<&str>) -> VlmProvider {
        let config = VlmConfig {
            base_url: server.uri(),
            api_key: api_key.map(String::from),
            model: "test-vlm".to_string(),
            ..VlmConfig::default()
        };
        VlmProvider::new(&config, &ImageConfig::default())
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "test-vlm",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_returns_content_verbatim() {
        let server = MockServer::start().await;
        let caption = "  A red boat in a harbour.\nGulls overhead.  ";
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(caption)))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server, None)
            .caption(&test_image(), "Describe.")
            .await
            .unwrap();
        assert_eq!(text, caption);
    }

    #[tokio::test]
    async fn test_request_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&server)
            .await;

        provider(&server, None)
            .caption(&test_image(), "What is in this image?")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "test-vlm");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "user");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "What is in this image?");
        assert_eq!(content[1]["type"], "image_url");
        let url = content[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_api_key_header_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header(API_KEY_HEADER, "s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let text = provider(&server, Some("s3cret"))
            .caption(&test_image(), "Describe.")
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_api_key_header_absent_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&server)
            .await;

        provider(&server, Some(""))
            .caption(&test_image(), "Describe.")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("x-api-key"));
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .caption(&test_image(), "Describe.")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_malformed_json_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .caption(&test_image(), "Describe.")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Response(_)));
    }

    #[tokio::test]
    async fn test_missing_choices_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .caption(&test_image(), "Describe.")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Response(_)));
    }

    #[tokio::test]
    async fn test_null_content_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .caption(&test_image(), "Describe.")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Response(_)));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server, None)
            .caption(&test_image(), "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = VlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..VlmConfig::default()
        };
        let err = VlmProvider::new(&config, &ImageConfig::default())
            .caption(&test_image(), "Describe.")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Transport(_)));
    }
}
