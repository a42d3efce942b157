//! Mock provider implementations for testing.

use super::{
    ImageProvider, ProviderError, SpeechProvider, TextProvider, VideoHandle, VideoOperation,
    VideoProvider,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::Voice;

/// Mock translator returning a fixed translation for any input.
pub struct MockTextProvider {
    translation: String,
}

impl MockTextProvider {
    pub fn new(translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _system_instruction: &str,
    ) -> Result<String, ProviderError> {
        Ok(self.translation.clone())
    }
}

/// Mock image provider returning fixed bytes, or failing when constructed
/// with `failing`.
pub struct MockImageProvider {
    bytes: Option<Vec<u8>>,
}

impl MockImageProvider {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }

    pub fn failing() -> Self {
        Self { bytes: None }
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        match &self.bytes {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(ProviderError::ApiError(
                "mock image generation failure".to_string(),
            )),
        }
    }
}

/// Mock speech provider returning fixed PCM bytes.
pub struct MockSpeechProvider {
    pcm: Vec<u8>,
}

impl MockSpeechProvider {
    pub fn new(pcm: Vec<u8>) -> Self {
        Self { pcm }
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(&self, _text: &str, _voice: Voice) -> Result<Vec<u8>, ProviderError> {
        Ok(self.pcm.clone())
    }
}

/// Mock video provider that stays pending for a fixed number of refreshes
/// and counts every refresh call.
pub struct MockVideoProvider {
    pending_refreshes: usize,
    refresh_calls: AtomicUsize,
    payload: Option<Vec<u8>>,
}

impl MockVideoProvider {
    /// Completes with `payload` after `pending_refreshes` not-done polls.
    pub fn new(pending_refreshes: usize, payload: Vec<u8>) -> Self {
        Self {
            pending_refreshes,
            refresh_calls: AtomicUsize::new(0),
            payload: Some(payload),
        }
    }

    /// Completes without any generated video.
    pub fn without_video(pending_refreshes: usize) -> Self {
        Self {
            pending_refreshes,
            refresh_calls: AtomicUsize::new(0),
            payload: None,
        }
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for MockVideoProvider {
    async fn submit(&self, _prompt: &str) -> Result<VideoOperation, ProviderError> {
        Ok(VideoOperation {
            name: "operations/mock".to_string(),
            done: false,
            video: None,
        })
    }

    async fn refresh(&self, operation: &VideoOperation) -> Result<VideoOperation, ProviderError> {
        let calls = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if calls <= self.pending_refreshes {
            return Ok(VideoOperation {
                name: operation.name.clone(),
                done: false,
                video: None,
            });
        }

        Ok(VideoOperation {
            name: operation.name.clone(),
            done: true,
            video: self.payload.as_ref().map(|_| VideoHandle {
                uri: "mock://video".to_string(),
            }),
        })
    }

    async fn download(&self, _video: &VideoHandle, dest: &Path) -> Result<(), ProviderError> {
        let bytes = self.payload.clone().unwrap_or_default();
        tokio::fs::write(dest, bytes)
            .await
            .map_err(|e| ProviderError::ApiError(format!("mock download failed: {}", e)))
    }
}
