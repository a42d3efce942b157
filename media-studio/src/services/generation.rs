//! Generation pipelines.
//!
//! Three independent request pipelines over the Gemini providers: one-shot
//! image generation, polled long-running video generation, and the
//! translate-synthesize-transcode audio chain.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::models::{
    AudioResponse, GenerationKind, ImageResponse, QuotaStatus, VideoResponse, Voice,
};
use crate::services::providers::ProviderSet;
use crate::services::rate_limiter::DailyQuota;
use crate::services::transcoder::{TempFile, Transcoder};

/// System instruction for the translation stage of the audio pipeline.
const TRANSLATE_INSTRUCTION: &str = "You are a translator. Translate the given English text to \
     Hindi. Return only the translated Hindi text, nothing else.";

pub struct GenerationService {
    providers: ProviderSet,
    transcoder: Arc<dyn Transcoder>,
    quota: Arc<DailyQuota>,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl GenerationService {
    pub fn new(
        providers: ProviderSet,
        transcoder: Arc<dyn Transcoder>,
        quota: Arc<DailyQuota>,
        poll_interval: Duration,
        max_polls: Option<u32>,
    ) -> Self {
        Self {
            providers,
            transcoder,
            quota,
            poll_interval,
            max_polls,
        }
    }

    /// Generate one image. Quota is consumed only on success.
    pub async fn generate_image(&self, prompt: &str) -> Result<ImageResponse, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::BadRequest("prompt must not be empty".to_string()));
        }

        self.quota.check(GenerationKind::Image)?;

        tracing::info!(prompt_len = prompt.len(), "starting image generation");

        let bytes = self.providers.image.generate(prompt).await?;
        self.quota.record(GenerationKind::Image);

        tracing::info!(image_kb = bytes.len() / 1024, "image generation complete");

        Ok(ImageResponse {
            image: BASE64.encode(bytes),
        })
    }

    /// Generate one video, polling the operation until the upstream service
    /// reports completion. There is no ceiling on the wait unless
    /// `max_polls` is configured.
    pub async fn generate_video(&self, prompt: &str) -> Result<VideoResponse, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::BadRequest("prompt must not be empty".to_string()));
        }

        self.quota.check(GenerationKind::Video)?;

        tracing::info!(prompt_len = prompt.len(), "starting video generation");

        let mut operation = self.providers.video.submit(prompt).await?;
        tracing::info!(operation = %operation.name, "video job created, polling for completion");

        let mut polls = 0u32;
        while !operation.done {
            if let Some(max) = self.max_polls {
                if polls >= max {
                    return Err(AppError::GenerationFailed(format!(
                        "video operation still pending after {} polls",
                        max
                    )));
                }
            }
            polls += 1;
            tracing::debug!(poll = polls, "video not ready yet");
            tokio::time::sleep(self.poll_interval).await;
            operation = self.providers.video.refresh(&operation).await?;
        }

        let handle = match operation.video {
            Some(handle) => handle,
            None => {
                tracing::error!(operation = %operation.name, "completed operation carried no video");
                return Err(AppError::GenerationFailed("no video returned".to_string()));
            }
        };

        let temp = TempFile::new("video", "mp4");
        self.providers.video.download(&handle, temp.path()).await?;
        let bytes = tokio::fs::read(temp.path()).await.map_err(|e| {
            AppError::GenerationFailed(format!("failed to read downloaded video: {}", e))
        })?;
        drop(temp);

        self.quota.record(GenerationKind::Video);

        tracing::info!(
            polls,
            video_kb = bytes.len() / 1024,
            "video generation complete"
        );

        Ok(VideoResponse {
            video: BASE64.encode(bytes),
        })
    }

    /// Translate English text to Hindi, synthesize it with the selected
    /// voice, and transcode the raw PCM to MP3. Audio is unmetered.
    pub async fn generate_audio(&self, text: &str, voice: Voice) -> Result<AudioResponse, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("text must not be empty".to_string()));
        }

        tracing::info!(voice = voice.as_str(), text_len = text.len(), "starting audio generation");

        let translation = self
            .providers
            .text
            .generate(text, TRANSLATE_INSTRUCTION)
            .await?;
        tracing::debug!(translation_len = translation.len(), "translation complete");

        let pcm = self.providers.speech.synthesize(&translation, voice).await?;
        tracing::debug!(pcm_bytes = pcm.len(), "speech synthesis complete");

        let mp3 = self.transcoder.pcm_to_mp3(&pcm).await?;

        tracing::info!(mp3_kb = mp3.len() / 1024, "audio generation complete");

        Ok(AudioResponse {
            audio: BASE64.encode(mp3),
            translation,
        })
    }

    pub fn image_status(&self) -> QuotaStatus {
        self.quota.status(GenerationKind::Image)
    }

    pub fn video_status(&self) -> QuotaStatus {
        self.quota.status(GenerationKind::Video)
    }
}
