use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PalikkaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed: {description} ({status})")]
    CommandFailed {
        description: String,
        status: ExitStatus,
    },

    #[error("Failed to start {description}: {source}")]
    CommandSpawn {
        description: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Audio file missing or empty: {0}")]
    MissingAudio(String),

    #[error("Unsupported file type: {0}. Please provide a valid audio or video file.")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, PalikkaError>;
