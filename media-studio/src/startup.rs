//! Application startup and router assembly.

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use time::Duration as SessionDuration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Settings;
use crate::error::AppError;
use crate::handlers::{app, auth, generate, metrics, pages};
use crate::middleware::auth::require_session;
use crate::services::generation::GenerationService;
use crate::services::providers::gemini::{GeminiClient, GeminiConfig};
use crate::services::providers::ProviderSet;
use crate::services::rate_limiter::DailyQuota;
use crate::services::transcoder::{FfmpegTranscoder, Transcoder};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(SessionDuration::hours(24)));

    // Everything behind the session gate: pages and the action API.
    let protected = Router::new()
        .route("/", get(app::index))
        .route("/image", get(pages::image_page))
        .route("/video", get(pages::video_page))
        .route("/audio", get(pages::audio_page))
        .route("/api/generate/image", post(generate::generate_image))
        .route("/api/generate/video", post(generate::generate_video))
        .route("/api/generate/audio", post(generate::generate_audio))
        .route("/api/limits/image", get(generate::image_limit))
        .route("/api/limits/video", get(generate::video_limit))
        .layer(from_fn(require_session));

    Router::new()
        .route("/health", get(app::health_check))
        .route("/metrics", get(metrics::metrics))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route("/logout", get(auth::logout_handler))
        .merge(protected)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with providers wired from configuration.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let gemini = Arc::new(GeminiClient::new(GeminiConfig {
            api_key: settings.gemini.api_key.expose_secret().clone(),
            text_model: settings.gemini.text_model.clone(),
            tts_model: settings.gemini.tts_model.clone(),
            image_model: settings.gemini.image_model.clone(),
            video_model: settings.gemini.video_model.clone(),
        }));

        tracing::info!(
            text_model = %settings.gemini.text_model,
            tts_model = %settings.gemini.tts_model,
            image_model = %settings.gemini.image_model,
            video_model = %settings.gemini.video_model,
            "Initialized Gemini providers"
        );

        let providers = ProviderSet {
            text: gemini.clone(),
            image: gemini.clone(),
            video: gemini.clone(),
            speech: gemini,
        };

        let quota = Arc::new(DailyQuota::new(
            settings.limits.image_per_day,
            settings.limits.video_per_day,
        ));

        let transcoder: Arc<dyn Transcoder> =
            Arc::new(FfmpegTranscoder::new(settings.ffmpeg_bin.clone()));

        let generation = Arc::new(GenerationService::new(
            providers,
            transcoder,
            quota,
            Duration::from_secs(settings.video_poll.interval_secs),
            settings.video_poll.max_polls,
        ));

        let state = AppState::new(settings, generation);
        Self::with_state(state).await
    }

    /// Build with an externally assembled state. Tests use this to inject
    /// mock providers.
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        // Port 0 binds a random free port.
        let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(state);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
