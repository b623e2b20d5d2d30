//! OpenAI-compatible adapter implementation.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM and any endpoint exposing
//! `/chat/completions`. The assembled frames are sent as the content parts
//! of a single user message:
//!
//! - `Text` frames → `text` parts
//! - `Blob` frames → `image_url` parts (the frame's URI, or a base64 `data:` URI)
//!
//! Tool definitions on the context are forwarded as function tools.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dcl_core::{AdapterError, ContentFrame, GenerationAdapter, InvocationContext, ToolDefinition};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An OpenAI-compatible generation adapter.
pub struct OpenAiCompatAdapter {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiCompatAdapter {
    /// Create a new adapter for `model` at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to configure HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            client,
        }
    }

    /// Create an OpenAI adapter (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("https://api.openai.com/v1", api_key, model)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Convert frames to content parts.
    fn to_content_parts(frames: &[ContentFrame]) -> Vec<ApiContentPart> {
        frames
            .iter()
            .map(|frame| match frame {
                ContentFrame::Text { content } => ApiContentPart::Text { text: content.clone() },
                ContentFrame::Blob { mime_type, data, uri } => ApiContentPart::ImageUrl {
                    image_url: ApiImageUrl {
                        url: uri
                            .clone()
                            .unwrap_or_else(|| format!("data:{mime_type};base64,{}", STANDARD.encode(data))),
                    },
                },
            })
            .collect()
    }

    /// Convert tool definitions to OpenAI API format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    /// Build the request body for a context.
    fn request_body(&self, context: &InvocationContext) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": Self::to_content_parts(&context.frames),
            }],
            "temperature": self.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !context.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&context.tools));
        }

        body
    }

    /// Pull the generated text out of a response.
    fn response_text(response: ApiResponse) -> Result<String, AdapterError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AdapterError::InvalidResponse("No choices in response".into()))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl GenerationAdapter for OpenAiCompatAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, context: &InvocationContext) -> Result<String, AdapterError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(context);

        debug!(model = %self.model, frames = context.frames.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(AdapterError::RateLimited);
        }

        if status == 401 || status == 403 {
            return Err(AdapterError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Generation service returned error");
            return Err(AdapterError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        debug!(model = %api_response.model, "Completion received");
        Self::response_text(api_response)
    }

    async fn health_check(&self) -> Result<bool, AdapterError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- API types ---

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentPart {
    Text { text: String },
    ImageUrl { image_url: ApiImageUrl },
}

#[derive(Debug, Serialize)]
struct ApiImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}
