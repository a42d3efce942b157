use secrecy::Secret;
use serde::Deserialize;
use std::env;

use crate::error::AppError;

const DEFAULT_IMAGE_DAILY_LIMIT: u32 = 10;
const DEFAULT_VIDEO_DAILY_LIMIT: u32 = 5;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    fn load() -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub auth: AuthSettings,
    pub gemini: GeminiSettings,
    pub limits: LimitSettings,
    pub video_poll: PollSettings,
    pub ffmpeg_bin: String,
}

/// Operator credentials checked at login.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub user_id: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Model for the translation stage (e.g. gemini-2.5-flash)
    pub text_model: String,
    /// Model for speech synthesis (e.g. gemini-2.5-flash-preview-tts)
    pub tts_model: String,
    /// Model for image generation (e.g. imagen-4.0-generate-001)
    pub image_model: String,
    /// Model for video generation (e.g. veo-3.0-generate-001)
    pub video_model: String,
}

/// Per-day generation ceilings. Counters live in process memory only.
#[derive(Debug, Clone, Copy)]
pub struct LimitSettings {
    pub image_per_day: u32,
    pub video_per_day: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval_secs: u64,
    /// Optional ceiling on video polls. Unset means the pipeline waits as
    /// long as the upstream operation stays pending.
    pub max_polls: Option<u32>,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(Settings {
            server: ServerConfig::load()?,
            auth: AuthSettings {
                user_id: get_env("APP_USER_ID", None, is_prod)?,
                password: Secret::new(get_env("APP_PASSWORD", None, is_prod)?),
            },
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", None, is_prod)?),
                text_model: get_env("STUDIO_TEXT_MODEL", Some("gemini-2.5-flash"), is_prod)?,
                tts_model: get_env(
                    "STUDIO_TTS_MODEL",
                    Some("gemini-2.5-flash-preview-tts"),
                    is_prod,
                )?,
                image_model: get_env(
                    "STUDIO_IMAGE_MODEL",
                    Some("imagen-4.0-generate-001"),
                    is_prod,
                )?,
                video_model: get_env(
                    "STUDIO_VIDEO_MODEL",
                    Some("veo-3.0-generate-001"),
                    is_prod,
                )?,
            },
            limits: LimitSettings {
                image_per_day: get_env(
                    "STUDIO_IMAGE_DAILY_LIMIT",
                    Some(&DEFAULT_IMAGE_DAILY_LIMIT.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_IMAGE_DAILY_LIMIT),
                video_per_day: get_env(
                    "STUDIO_VIDEO_DAILY_LIMIT",
                    Some(&DEFAULT_VIDEO_DAILY_LIMIT.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_VIDEO_DAILY_LIMIT),
            },
            video_poll: PollSettings {
                interval_secs: get_env(
                    "STUDIO_VIDEO_POLL_INTERVAL_SECS",
                    Some(&DEFAULT_POLL_INTERVAL_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
                max_polls: env::var("STUDIO_VIDEO_MAX_POLLS")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
            ffmpeg_bin: get_env("STUDIO_FFMPEG_BIN", Some("ffmpeg"), is_prod)?,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
