//! In-memory backend that replays canned replies.
//!
//! Used by the agent and server tests to drive the pipeline without a
//! network. Every request is recorded so tests can assert on prompts.

use crate::backend::{
    CompletionRequest, CompletionResponse, GeneratedImage, GenerativeBackend, ImageRequest,
    TokenUsage,
};
use crate::error::LlmError;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<Option<String>, LlmError> + Send + Sync>;

/// A scripted backend.
///
/// Completions are answered by a responder function so that concurrent
/// callers get deterministic replies regardless of call order.
pub struct ScriptedBackend {
    responder: Responder,
    image: Result<GeneratedImage, LlmError>,
    completions: Mutex<Vec<CompletionRequest>>,
    images: Mutex<Vec<ImageRequest>>,
}

impl ScriptedBackend {
    /// Creates a backend whose completions are computed by `responder`.
    #[must_use]
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<Option<String>, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            image: Ok(GeneratedImage::png(vec![0x89, b'P', b'N', b'G'])),
            completions: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
        }
    }

    /// Creates a backend that answers every completion with `reply`.
    #[must_use]
    pub fn replying(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::from_fn(move |_| Ok(Some(reply.clone())))
    }

    /// Creates a backend that answers every completion with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_fn(|_| Ok(None))
    }

    /// Creates a backend whose completions all fail with `error`.
    #[must_use]
    pub fn failing(error: LlmError) -> Self {
        Self::from_fn(move |_| Err(error.clone()))
    }

    /// Sets the result of every image generation.
    #[must_use]
    pub fn with_image(mut self, image: Result<GeneratedImage, LlmError>) -> Self {
        self.image = image;
        self
    }

    /// Returns every completion request received so far.
    #[must_use]
    pub fn completion_requests(&self) -> Vec<CompletionRequest> {
        self.completions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns every image request received so far.
    #[must_use]
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.completions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let content = (self.responder)(request)?;
        Ok(CompletionResponse {
            content,
            usage: TokenUsage::default(),
            model: self.model().to_string(),
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage, LlmError> {
        self.images
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.image.clone()
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
