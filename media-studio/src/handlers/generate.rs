use axum::{extract::State, Json};

use crate::error::AppError;
use crate::models::{
    AudioRequest, AudioResponse, ImageRequest, ImageResponse, QuotaStatus, VideoRequest,
    VideoResponse,
};
use crate::services::metrics;
use crate::AppState;

pub async fn generate_image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    let result = state.generation.generate_image(&request.prompt).await;
    metrics::record_generation("image", result.is_ok());
    result.map(Json)
}

pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoResponse>, AppError> {
    let result = state.generation.generate_video(&request.prompt).await;
    metrics::record_generation("video", result.is_ok());
    result.map(Json)
}

pub async fn generate_audio(
    State(state): State<AppState>,
    Json(request): Json<AudioRequest>,
) -> Result<Json<AudioResponse>, AppError> {
    let result = state
        .generation
        .generate_audio(&request.text, request.voice)
        .await;
    metrics::record_generation("audio", result.is_ok());
    result.map(Json)
}

pub async fn image_limit(State(state): State<AppState>) -> Json<QuotaStatus> {
    Json(state.generation.image_status())
}

pub async fn video_limit(State(state): State<AppState>) -> Json<QuotaStatus> {
    Json(state.generation.video_status())
}
