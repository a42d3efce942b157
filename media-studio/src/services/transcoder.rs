//! PCM-to-MP3 transcoding via an external ffmpeg binary.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::AppError;

/// Request-scoped file under the system temp directory.
///
/// The file is removed when the guard drops; removal errors are swallowed.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(prefix: &str, extension: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{}-{}.{}", prefix, Uuid::new_v4(), extension));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Converts raw speech output into a compressed container.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode 16-bit little-endian mono PCM at 24kHz into MP3 bytes.
    async fn pcm_to_mp3(&self, pcm: &[u8]) -> Result<Vec<u8>, AppError>;
}

/// ffmpeg-backed transcoder producing MP3 at a constant 192kbps.
pub struct FfmpegTranscoder {
    program: String,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(120),
        }
    }

    fn args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-f".to_string(),
            "s16le".to_string(),
            "-ar".to_string(),
            "24000".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-b:a".to_string(),
            "192k".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn pcm_to_mp3(&self, pcm: &[u8]) -> Result<Vec<u8>, AppError> {
        let input = TempFile::new("speech", "pcm");
        let output = TempFile::new("speech", "mp3");

        tokio::fs::write(input.path(), pcm)
            .await
            .map_err(|e| AppError::TranscodeFailed(format!("failed to stage PCM input: {}", e)))?;

        let args = Self::args(input.path(), output.path());
        tracing::debug!(
            program = %self.program,
            input_bytes = pcm.len(),
            "transcoding PCM to MP3"
        );

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .args(&args)
                .stdout(std::process::Stdio::piped())
                .stderr(std::process::Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| {
            AppError::TranscodeFailed(format!(
                "{} timed out after {} seconds",
                self.program,
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| AppError::TranscodeFailed(format!("failed to run {}: {}", self.program, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!(
                program = %self.program,
                status = ?result.status.code(),
                stderr = %stderr,
                "transcode failed"
            );
            return Err(AppError::TranscodeFailed(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        let bytes = tokio::fs::read(output.path()).await.map_err(|e| {
            AppError::TranscodeFailed(format!("failed to read transcoded output: {}", e))
        })?;

        tracing::debug!(output_bytes = bytes.len(), "transcode complete");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_describe_the_pcm_input_format() {
        let args = FfmpegTranscoder::args(Path::new("/tmp/in.pcm"), Path::new("/tmp/out.mp3"));

        let format_args: Vec<&str> = args.iter().map(String::as_str).collect();
        let pcm_format = ["-f", "s16le", "-ar", "24000", "-ac", "1"];
        assert!(format_args
            .windows(pcm_format.len())
            .any(|window| window == pcm_format));
    }

    #[test]
    fn args_request_constant_192k_output() {
        let args = FfmpegTranscoder::args(Path::new("/tmp/in.pcm"), Path::new("/tmp/out.mp3"));

        let position = args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(args[position + 1], "192k");
        assert_eq!(args.last().unwrap(), "/tmp/out.mp3");
    }

    #[test]
    fn temp_file_is_removed_on_drop() {
        let path = {
            let temp = TempFile::new("transcoder-test", "pcm");
            std::fs::write(temp.path(), b"data").unwrap();
            assert!(temp.path().exists());
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn temp_files_do_not_collide() {
        let a = TempFile::new("speech", "pcm");
        let b = TempFile::new("speech", "pcm");
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    #[ignore = "Requires ffmpeg on PATH"]
    async fn transcodes_real_pcm_with_ffmpeg() {
        // 200ms of a 440Hz tone at 24kHz mono, s16le.
        let samples: Vec<i16> = (0..4800)
            .map(|i| {
                let t = i as f32 / 24_000.0;
                ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 20_000.0) as i16
            })
            .collect();
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

        let transcoder = FfmpegTranscoder::new("ffmpeg");
        let mp3 = transcoder.pcm_to_mp3(&pcm).await.unwrap();
        assert!(!mp3.is_empty());
    }

    #[tokio::test]
    async fn missing_binary_reports_transcode_failure() {
        let transcoder = FfmpegTranscoder::new("definitely-not-ffmpeg");
        let err = transcoder.pcm_to_mp3(&[0u8; 16]).await.unwrap_err();
        assert!(matches!(err, AppError::TranscodeFailed(_)));
    }
}
