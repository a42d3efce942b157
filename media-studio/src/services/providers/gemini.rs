//! Gemini AI provider implementation.
//!
//! Backs all four capabilities against Google's generative language REST
//! API: generateContent for text and speech, Imagen predict for images, and
//! the Veo long-running operation surface for video.

use super::{
    ImageProvider, ProviderError, SpeechProvider, TextProvider, VideoHandle, VideoOperation,
    VideoProvider,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::Voice;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Vertical aspect ratio used for every video job (Shorts format).
const VIDEO_ASPECT_RATIO: &str = "9:16";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub text_model: String,
    pub tts_model: String,
    pub image_model: String,
    pub video_model: String,
}

/// Client for all Gemini-backed generation calls.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Build the API URL for the given model and method.
    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, model, method, self.config.api_key
        )
    }

    /// Build the API URL for an operation resource name.
    fn operation_url(&self, name: &str) -> String {
        format!("{}/{}?key={}", GEMINI_API_BASE, name, self.config.api_key)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }

        Err(ProviderError::ApiError(format!(
            "Gemini API error {}: {}",
            status, error_text
        )))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.model_url(model, "generateContent");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![ContentPart::Text {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![ContentPart::Text {
                    text: system_instruction.to_string(),
                }],
            }),
            generation_config: None,
        };

        tracing::debug!(
            model = %self.config.text_model,
            prompt_len = prompt.len(),
            "Sending text request to Gemini API"
        );

        let api_response = self.generate_content(&self.config.text_model, &request).await?;

        api_response
            .first_text()
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse("no text returned".to_string()))
    }
}

#[async_trait]
impl SpeechProvider for GeminiClient {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![ContentPart::Text {
                    text: text.to_string(),
                }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.as_str().to_string(),
                        },
                    },
                }),
            }),
        };

        tracing::debug!(
            model = %self.config.tts_model,
            voice = voice.as_str(),
            text_len = text.len(),
            "Sending speech request to Gemini API"
        );

        let api_response = self.generate_content(&self.config.tts_model, &request).await?;

        let data = api_response
            .first_inline_data()
            .ok_or_else(|| ProviderError::EmptyResponse("no audio data returned".to_string()))?;

        BASE64
            .decode(data)
            .map_err(|e| ProviderError::ApiError(format!("invalid audio payload: {}", e)))
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let request = PredictRequest {
            instances: vec![PromptInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImageParameters { sample_count: 1 },
        };

        let url = self.model_url(&self.config.image_model, "predict");

        tracing::debug!(
            model = %self.config.image_model,
            prompt_len = prompt.len(),
            "Sending image request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let api_response: PredictResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let data = api_response
            .predictions
            .first()
            .and_then(|p| p.bytes_base64_encoded.as_deref())
            .ok_or_else(|| ProviderError::EmptyResponse("no image returned".to_string()))?;

        BASE64
            .decode(data)
            .map_err(|e| ProviderError::ApiError(format!("invalid image payload: {}", e)))
    }
}

#[async_trait]
impl VideoProvider for GeminiClient {
    async fn submit(&self, prompt: &str) -> Result<VideoOperation, ProviderError> {
        let request = VideoGenerationRequest {
            instances: vec![PromptInstance {
                prompt: prompt.to_string(),
            }],
            parameters: VideoParameters {
                aspect_ratio: VIDEO_ASPECT_RATIO.to_string(),
                sample_count: 1,
            },
        };

        let url = self.model_url(&self.config.video_model, "predictLongRunning");

        tracing::debug!(
            model = %self.config.video_model,
            prompt_len = prompt.len(),
            aspect_ratio = VIDEO_ASPECT_RATIO,
            "Submitting video job to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let operation: OperationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        operation.into_operation()
    }

    async fn refresh(&self, operation: &VideoOperation) -> Result<VideoOperation, ProviderError> {
        let url = self.operation_url(&operation.name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let refreshed: OperationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        refreshed.into_operation()
    }

    async fn download(&self, video: &VideoHandle, dest: &Path) -> Result<(), ProviderError> {
        let separator = if video.uri.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}key={}&alt=media",
            video.uri, separator, self.config.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            ProviderError::ApiError(format!("failed to write video to {}: {}", dest.display(), e))
        })?;

        Ok(())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| match p {
                ContentPart::Text { text } => Some(text.trim().to_string()),
                _ => None,
            })
    }

    fn first_inline_data(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| match p {
                ContentPart::InlineData { inline_data } => Some(inline_data.data.as_str()),
                _ => None,
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct PromptInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    instances: Vec<PromptInstance>,
    parameters: ImageParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageParameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoGenerationRequest {
    instances: Vec<PromptInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    aspect_ratio: String,
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<OperationResult>,
    #[serde(default)]
    error: Option<OperationError>,
}

impl OperationResponse {
    fn into_operation(self) -> Result<VideoOperation, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::ApiError(format!(
                "video operation failed: {}",
                error.message.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        let video = self
            .response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .and_then(|r| r.generated_samples.first())
            .and_then(|s| s.video.as_ref())
            .and_then(|v| v.uri.clone())
            .map(|uri| VideoHandle { uri });

        Ok(VideoOperation {
            name: self.name,
            done: self.done,
            video,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationError {
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoReference>,
}

#[derive(Debug, Deserialize)]
struct VideoReference {
    uri: Option<String>,
}
