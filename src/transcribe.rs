use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::TranscriberConfig;
use crate::error::{PalikkaError, Result};
use crate::runner::{CommandRunner, ExternalCommand};

/// Runs the whisper CLI and locates the SRT file it writes
pub struct Transcriber {
    config: TranscriberConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Transcriber {
    pub fn new(config: TranscriberConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn command(&self, audio_path: &Path, output_dir: &Path) -> ExternalCommand {
        let mut cmd = ExternalCommand::new(&self.config.binary_path, "Transcribing audio to subtitles")
            .path_arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--output_dir")
            .path_arg(output_dir);

        if let Some(lang) = &self.config.language {
            cmd = cmd.arg("--language").arg(lang);
        }

        cmd
    }

    /// Transcribe `audio_path` into `output_dir`.
    ///
    /// The returned path is derived from the audio file's stem; whether whisper
    /// actually produced it is left to the caller.
    pub async fn transcribe(&self, audio_path: &Path, output_dir: &Path) -> Result<PathBuf> {
        info!("Transcribing {} with model {}", audio_path.display(), self.config.model);

        self.runner.run(&self.command(audio_path, output_dir)).await?;
        subtitle_path_for(audio_path, output_dir)
    }
}

/// `<output_dir>/<audio stem>.srt`
pub fn subtitle_path_for(audio_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = audio_path
        .file_stem()
        .ok_or_else(|| PalikkaError::FileNotFound(format!("Invalid audio filename: {}", audio_path.display())))?;

    let mut file_name = stem.to_os_string();
    file_name.push(".srt");
    Ok(output_dir.join(file_name))
}
