//! OpenAI REST backend.
//!
//! Talks to `/chat/completions` for text and multimodal completions and to
//! `/images/generations` for images. Any OpenAI-compatible endpoint works
//! as long as it accepts the same request shapes.

use crate::backend::{
    CompletionRequest, CompletionResponse, GeneratedImage, GenerativeBackend, ImageOptions,
    ImageRequest, TokenUsage,
};
use crate::error::LlmError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Connection and model settings for the OpenAI backend.
///
/// Every field has a default, so the whole block can be omitted from the
/// environment. The API key is deliberately not part of this struct.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    /// API base URL, without a trailing `/chat/completions`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for every completion.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for image generation.
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Size of generated images. DALL-E 2 accepts 256x256, 512x512 and 1024x1024.
    #[serde(default = "default_image_size")]
    pub image_size: String,
    /// Quality tier of generated images.
    #[serde(default = "default_image_quality")]
    pub image_quality: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-2".to_string()
}

fn default_image_size() -> String {
    "512x512".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl OpenAiSettings {
    /// Returns the image size and quality builders should request.
    #[must_use]
    pub fn image_options(&self) -> ImageOptions {
        ImageOptions {
            size: self.image_size.clone(),
            quality: self.image_quality.clone(),
        }
    }
}

/// Generative backend backed by the OpenAI HTTP API.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    api_key: String,
    base_url: String,
    chat_model: String,
    image_model: String,
    http_client: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a backend with the given API key and settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the key is blank or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>, settings: &OpenAiSettings) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "API key is empty".to_string(),
            });
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            chat_model: settings.chat_model.clone(),
            image_model: settings.image_model.clone(),
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %url, "Request to generative backend failed");
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::RequestFailed {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            let body = response.text().await.unwrap_or_default();
            warn!(
                endpoint = %url,
                status = %status,
                body = %body,
                "Generative backend returned error"
            );
            return Err(status_error(status, retry_after_secs, &body));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| LlmError::ResponseParseFailed {
                reason: e.to_string(),
            })
    }
}

/// Maps a non-success status to an error.
fn status_error(status: StatusCode, retry_after_secs: Option<u64>, body: &str) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimited { retry_after_secs }
    } else {
        LlmError::RequestFailed {
            reason: format!("HTTP {status}: {body}"),
        }
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    #[instrument(skip_all, fields(model = %self.chat_model, multimodal = request.is_multimodal()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::build(&self.chat_model, request);
        let completion: ChatCompletionResponse = self.post_json("chat/completions", &body).await?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ResponseParseFailed {
                reason: "completion has no choices".to_string(),
            })?;
        let usage = completion.usage.unwrap_or_default();

        debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            "Completion finished"
        );

        Ok(CompletionResponse {
            content: choice.message.content,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
            model: completion.model.unwrap_or_else(|| self.chat_model.clone()),
        })
    }

    #[instrument(skip_all, fields(model = %self.image_model, size = %request.size))]
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, LlmError> {
        let started = Instant::now();
        let body = ImageGenerationRequest {
            model: &self.image_model,
            prompt: &request.prompt,
            n: 1,
            size: &request.size,
            quality: &request.quality,
            response_format: "b64_json",
        };
        let generated: ImageGenerationResponse =
            self.post_json("images/generations", &body).await?;

        let encoded = generated
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .ok_or_else(|| LlmError::ResponseParseFailed {
                reason: "image response has no b64_json payload".to_string(),
            })?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| LlmError::ResponseParseFailed {
                reason: format!("image payload is not valid base64: {e}"),
            })?;

        debug!(
            latency_ms = started.elapsed().as_millis() as u64,
            image_bytes = bytes.len(),
            "Image generated"
        );

        Ok(GeneratedImage::png(bytes))
    }

    fn model(&self) -> &str {
        &self.chat_model
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn build(model: &'a str, request: &'a CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(system),
            });
        }

        let user_content = match &request.image_url {
            Some(url) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: &request.user,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url },
                },
            ]),
            None => MessageContent::Text(&request.user),
        };
        messages.push(ChatMessage {
            role: "user",
            content: user_content,
        });

        Self {
            model,
            messages,
            response_format: request.json_output.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
}
