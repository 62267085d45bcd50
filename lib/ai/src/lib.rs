//! Generative-AI primitives for atelier.
//!
//! This crate wraps the remote generative service behind one trait with two
//! capabilities:
//!
//! - **Completion**: system prompt plus user text, optionally with an image
//!   attached and a JSON-object response format
//! - **Image generation**: prompt in, decoded image bytes out
//!
//! Agents in `atelier-agents` only ever talk to [`GenerativeBackend`], so
//! the OpenAI HTTP client and the scripted test backend are interchangeable.

pub mod backend;
pub mod error;
pub mod openai;
pub mod reply;
pub mod scripted;

pub use backend::{
    CompletionRequest, CompletionResponse, GeneratedImage, GenerativeBackend, ImageOptions,
    ImageRequest, TokenUsage,
};
pub use error::LlmError;
pub use openai::{OpenAiBackend, OpenAiSettings};
pub use reply::strip_code_fence;
pub use scripted::ScriptedBackend;
