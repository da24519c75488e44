//! HTTP client for the external image-generation service
//!
//! The service speaks a chat-completions style protocol: the prompt goes out
//! as a user message and the image URL comes back as the assistant message
//! content. The client maps every failure mode (transport error, HTTP error,
//! error payload, missing URL) into a uniform `GenerationResponse`; it never
//! retries and never panics.

use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};

use crate::model::{GenerationRequest, GenerationResponse, GenerationSettings};

const DEFAULT_ENDPOINT: &str = "https://oi-server.onrender.com/chat/completions";
const DEFAULT_MODEL: &str = "replicate/black-forest-labs/flux-1.1-pro";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Seam between the orchestrator and the external generation service.
///
/// The production implementation is [`HttpImageClient`]; tests substitute a
/// stub so orchestration logic runs without the network.
pub trait ImageService: Send + Sync {
    /// Perform one generation call. Never panics; failures come back as
    /// `success: false` with an error message.
    fn generate(&self, request: &GenerationRequest) -> GenerationResponse;

    /// Lightweight reachability probe
    fn health_check(&self) -> bool;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Production client backed by a blocking reqwest client
pub struct HttpImageClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    customer_id: String,
}

impl HttpImageClient {
    /// Build a client from the environment, falling back to the service
    /// defaults. `PIXGEN_ENDPOINT`, `PIXGEN_MODEL`, `PIXGEN_API_KEY`, and
    /// `PIXGEN_CUSTOMER_ID` override.
    pub fn from_env() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: env::var("PIXGEN_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: env::var("PIXGEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: env::var("PIXGEN_API_KEY").unwrap_or_default(),
            customer_id: env::var("PIXGEN_CUSTOMER_ID").unwrap_or_default(),
        })
    }

    fn post_prompt(&self, content: &str) -> reqwest::Result<reqwest::blocking::Response> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        };

        self.client
            .post(&self.endpoint)
            .header("customerId", &self.customer_id)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
    }

    fn generate_inner(&self, request: &GenerationRequest) -> Result<String, String> {
        let enhanced = enhance_prompt(&request.prompt, &request.settings);
        debug!("sending generation request: {}", enhanced);

        let response = self.post_prompt(&enhanced).map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("request failed")
            ));
        }

        let data: ChatResponse = response.json().map_err(|e| e.to_string())?;

        if let Some(err) = data.error {
            return Err(err.message);
        }

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| "No image URL received from AI service".to_string())
    }
}

impl ImageService for HttpImageClient {
    fn generate(&self, request: &GenerationRequest) -> GenerationResponse {
        let started = Instant::now();
        let elapsed = |s: Instant| s.elapsed().as_millis() as u64;

        match self.generate_inner(request) {
            Ok(url) => GenerationResponse::ok(url, elapsed(started)),
            Err(message) => GenerationResponse::failure(message, elapsed(started)),
        }
    }

    fn health_check(&self) -> bool {
        match self.post_prompt("Test connection - generate a simple red circle") {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Build the outgoing prompt: base prompt plus fixed style, composition,
/// and quality phrases
pub fn enhance_prompt(prompt: &str, settings: &GenerationSettings) -> String {
    let mut enhanced = prompt.to_string();

    if let Some(style) = settings.style {
        enhanced.push_str(", ");
        enhanced.push_str(style.prompt_modifier());
    }

    enhanced.push_str(", ");
    enhanced.push_str(settings.aspect_ratio.prompt_context());

    enhanced.push_str(", high resolution, professional quality");
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AspectRatio, GenerationStyle};

    #[test]
    fn test_enhance_prompt_with_style_and_ratio() {
        let settings = GenerationSettings {
            aspect_ratio: AspectRatio::Widescreen,
            style: Some(GenerationStyle::Anime),
            ..Default::default()
        };

        let enhanced = enhance_prompt("a mountain lake", &settings);
        assert_eq!(
            enhanced,
            "a mountain lake, anime style, manga inspired, stylized, \
             widescreen landscape composition, high resolution, professional quality"
        );
    }

    #[test]
    fn test_enhance_prompt_without_style() {
        let settings = GenerationSettings {
            aspect_ratio: AspectRatio::Square,
            ..Default::default()
        };

        let enhanced = enhance_prompt("a red circle", &settings);
        assert_eq!(
            enhanced,
            "a red circle, square composition, high resolution, professional quality"
        );
    }

    #[test]
    fn test_chat_response_parses_image_url() {
        let json = r#"{"choices": [{"message": {"content": "http://x/img.png"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.as_ref().unwrap().content.as_deref(),
            Some("http://x/img.png")
        );
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_chat_response_parses_error_payload() {
        let json = r#"{"error": {"message": "quota exceeded", "type": "rate_limit"}}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.unwrap().message, "quota exceeded");
        assert!(parsed.choices.is_empty());
    }
}
