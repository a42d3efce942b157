use serde::{Deserialize, Serialize};

/// Generation kinds that carry a daily quota. Audio is unmetered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    Image,
    Video,
}

impl std::fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationKind::Image => write!(f, "image"),
            GenerationKind::Video => write!(f, "video"),
        }
    }
}

/// Prebuilt Gemini TTS voices offered by the audio page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Voice {
    #[default]
    Kore,
    Puck,
    Zephyr,
    Enceladus,
    Charon,
    Leda,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Kore,
        Voice::Puck,
        Voice::Zephyr,
        Voice::Enceladus,
        Voice::Charon,
        Voice::Leda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Zephyr => "Zephyr",
            Voice::Enceladus => "Enceladus",
            Voice::Charon => "Charon",
            Voice::Leda => "Leda",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Voice,
}

/// One generated image, base64-encoded PNG.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image: String,
}

/// One generated video, base64-encoded MP4.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub video: String,
}

/// Synthesized speech (base64 MP3) plus the Hindi translation it reads.
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub audio: String,
    pub translation: String,
}

/// Read-only view of one kind's daily usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_defaults_to_kore() {
        assert_eq!(Voice::default(), Voice::Kore);
    }

    #[test]
    fn voice_deserializes_from_plain_name() {
        let request: AudioRequest =
            serde_json::from_str(r#"{"text": "Hello", "voice": "Leda"}"#).unwrap();
        assert_eq!(request.voice, Voice::Leda);
    }

    #[test]
    fn audio_request_without_voice_uses_default() {
        let request: AudioRequest = serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(request.voice, Voice::Kore);
    }
}
