//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use media_studio::config::Settings;
use media_studio::error::AppError;
use media_studio::services::generation::GenerationService;
use media_studio::services::providers::mock::{
    MockImageProvider, MockSpeechProvider, MockTextProvider, MockVideoProvider,
};
use media_studio::services::providers::ProviderSet;
use media_studio::services::rate_limiter::DailyQuota;
use media_studio::services::transcoder::Transcoder;
use media_studio::startup::Application;
use media_studio::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Transcoder stub that hands the PCM input back as the "MP3" output.
pub struct PassthroughTranscoder;

#[async_trait]
impl Transcoder for PassthroughTranscoder {
    async fn pcm_to_mp3(&self, pcm: &[u8]) -> Result<Vec<u8>, AppError> {
        Ok(pcm.to_vec())
    }
}

pub fn test_settings() -> Settings {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0"); // Random port
    std::env::set_var("GEMINI_API_KEY", "test-api-key");
    std::env::set_var("APP_USER_ID", "operator");
    std::env::set_var("APP_PASSWORD", "hunter2");

    Settings::load().expect("Failed to load settings")
}

/// Assemble application state around the given providers, with a short
/// poll interval so video tests finish quickly.
pub fn state_with(settings: Settings, providers: ProviderSet) -> AppState {
    let quota = Arc::new(DailyQuota::new(
        settings.limits.image_per_day,
        settings.limits.video_per_day,
    ));
    let generation = Arc::new(GenerationService::new(
        providers,
        Arc::new(PassthroughTranscoder),
        quota,
        Duration::from_millis(10),
        None,
    ));
    AppState::new(settings, generation)
}

/// State wired entirely to well-behaved mocks.
pub fn mock_state(settings: Settings) -> AppState {
    let providers = ProviderSet {
        text: Arc::new(MockTextProvider::new("नमस्ते")),
        image: Arc::new(MockImageProvider::new(b"png bytes".to_vec())),
        video: Arc::new(MockVideoProvider::new(0, b"mp4 bytes".to_vec())),
        speech: Arc::new(MockSpeechProvider::new(vec![0u8; 64])),
    };
    state_with(settings, providers)
}

/// Spawn the application on a random port and return its base URL.
pub async fn spawn_app(state: AppState) -> String {
    media_studio::services::metrics::init_metrics();

    let app = Application::with_state(state)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    format!("http://localhost:{}", port)
}

/// Client with a cookie store and no automatic redirect following, so
/// redirect statuses stay observable.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Log in with the test credentials, asserting success.
pub async fn login(client: &reqwest::Client, address: &str) {
    let response = client
        .post(format!("{}/login", address))
        .form(&[("user_id", "operator"), ("password", "hunter2")])
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/image");
}
