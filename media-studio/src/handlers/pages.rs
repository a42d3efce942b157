use askama::Template;
use axum::response::IntoResponse;

use crate::models::Voice;

#[derive(Template)]
#[template(path = "image.html")]
pub struct ImageTemplate {}

#[derive(Template)]
#[template(path = "video.html")]
pub struct VideoTemplate {}

#[derive(Template)]
#[template(path = "audio.html")]
pub struct AudioTemplate {
    pub voices: Vec<&'static str>,
}

pub async fn image_page() -> impl IntoResponse {
    ImageTemplate {}
}

pub async fn video_page() -> impl IntoResponse {
    VideoTemplate {}
}

pub async fn audio_page() -> impl IntoResponse {
    AudioTemplate {
        voices: Voice::ALL.iter().map(Voice::as_str).collect(),
    }
}
