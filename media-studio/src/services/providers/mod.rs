//! Generative-AI provider abstractions and implementations.
//!
//! One trait per capability so pipelines can be tested against mocks and
//! the Gemini client can back all of them at once.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::models::Voice;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("{0}")]
    EmptyResponse(String),
}

/// Handle for an in-progress video generation job.
///
/// Obtained from `VideoProvider::submit` and replaced wholesale by each
/// `refresh` until `done` is set.
#[derive(Debug, Clone)]
pub struct VideoOperation {
    /// Server-side operation name used for refreshes.
    pub name: String,
    pub done: bool,
    /// Download reference, present once the operation completes with output.
    pub video: Option<VideoHandle>,
}

/// Reference to a finished video, resolvable to bytes via `download`.
#[derive(Debug, Clone)]
pub struct VideoHandle {
    pub uri: String,
}

/// Text generation (translation stage of the audio pipeline).
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, ProviderError>;
}

/// Image generation. Returns exactly one image as encoded-image bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Speech synthesis. Returns raw 16-bit little-endian mono PCM at 24kHz.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, ProviderError>;
}

/// Long-running video generation: submit once, refresh until done, then
/// download the result to a caller-owned path.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<VideoOperation, ProviderError>;

    async fn refresh(&self, operation: &VideoOperation) -> Result<VideoOperation, ProviderError>;

    async fn download(&self, video: &VideoHandle, dest: &Path) -> Result<(), ProviderError>;
}

/// The full provider wiring consumed by the generation service.
pub struct ProviderSet {
    pub text: std::sync::Arc<dyn TextProvider>,
    pub image: std::sync::Arc<dyn ImageProvider>,
    pub video: std::sync::Arc<dyn VideoProvider>,
    pub speech: std::sync::Arc<dyn SpeechProvider>,
}
