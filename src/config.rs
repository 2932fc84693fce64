use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, PalikkaError};

/// Token window used when a subtitle line is too long for a single generation call
pub const DEFAULT_MAX_TOKENS: usize = 510;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub downloader: DownloaderConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Path to the yt-dlp binary
    pub binary_path: String,
    /// Audio codec requested from yt-dlp (`--audio-format`)
    pub audio_format: String,
    /// Audio quality passed to yt-dlp (`--audio-quality`)
    pub audio_quality: String,
    /// Container the downloaded video is re-encoded to (`--recode-video`)
    pub video_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,
    /// Model size handed to `--model`
    pub model: String,
    /// Source language hint, auto-detected when unset
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// Model used for translation
    pub model: String,
    /// Language code of the transcribed speech
    pub source_language: String,
    /// Language code subtitles are translated into
    pub target_language: String,
    /// Maximum tokens per generation call
    pub max_tokens: usize,
    /// HTTP timeout for a single generation request
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Additional encoding options for subtitle burn-in
    /// Common options: ["-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p"]
    pub subtitle_options: Vec<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            binary_path: "yt-dlp".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "320".to_string(),
            video_format: "mp4".to_string(),
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: "whisper".to_string(),
            model: "large".to_string(),
            language: None,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            source_language: "en".to_string(),
            target_language: "fi".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: 300,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            subtitle_options: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PalikkaError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PalikkaError::Config(format!("Failed to parse config file: {}", e)))?;

        if config.translate.max_tokens == 0 {
            return Err(PalikkaError::Config(
                "translate.max_tokens must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}
