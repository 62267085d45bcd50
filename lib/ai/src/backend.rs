//! Generative backend abstraction.
//!
//! Provides a unified interface over the remote service used for text
//! completion, multimodal completion and image generation.

use crate::error::LlmError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A completion request: one system prompt and one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt, if any.
    pub system: Option<String>,
    /// The user turn text.
    pub user: String,
    /// Image attached to the user turn, as a data URI or URL.
    pub image_url: Option<String>,
    /// Whether the reply must be a single JSON object.
    pub json_output: bool,
}

impl CompletionRequest {
    /// Creates a new request with just the user text.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            image_url: None,
            json_output: false,
        }
    }

    /// Adds a system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Attaches an image to the user turn, making the request multimodal.
    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Requests a JSON-object reply.
    #[must_use]
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Returns true if an image is attached.
    #[must_use]
    pub fn is_multimodal(&self) -> bool {
        self.image_url.is_some()
    }
}

/// A completion reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text; `None` when the service returned no content.
    pub content: Option<String>,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    /// Returns the content if present and not blank.
    #[must_use]
    pub fn non_empty_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

/// Size and quality used for every generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Image dimensions, e.g. `512x512`.
    pub size: String,
    /// Quality tier, e.g. `standard`.
    pub quality: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            size: "512x512".to_string(),
            quality: "standard".to_string(),
        }
    }
}

/// An image generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// What to draw.
    pub prompt: String,
    /// Image dimensions.
    pub size: String,
    /// Quality tier.
    pub quality: String,
}

impl ImageRequest {
    /// Creates a request for `prompt` using the given options.
    #[must_use]
    pub fn new(prompt: impl Into<String>, options: &ImageOptions) -> Self {
        Self {
            prompt: prompt.into(),
            size: options.size.clone(),
            quality: options.quality.clone(),
        }
    }
}

/// A generated image, already decoded from the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl GeneratedImage {
    /// Creates a PNG image from raw bytes.
    #[must_use]
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/png".to_string(),
        }
    }

    /// Encodes the image as a `data:` URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Trait for generative backends.
///
/// Every remote call site in the agents goes through this trait.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Runs a text or multimodal completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails. An empty reply is not an
    /// error; it is reported as `content: None`.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Generates one image.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails or returns no image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, LlmError>;

    /// Returns the completion model name.
    fn model(&self) -> &str;
}
