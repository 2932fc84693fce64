// Media processing via ffmpeg
//
// - Commands: argument builders for extraction and subtitle burn-in
// - MediaProcessor: runs those commands through a CommandRunner

pub mod commands;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use commands::*;

use crate::config::MediaConfig;
use crate::error::Result;
use crate::runner::CommandRunner;

/// ffmpeg-backed media operations
pub struct MediaProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
    runner: Arc<dyn CommandRunner>,
}

impl MediaProcessor {
    pub fn new(config: MediaConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
            runner,
        }
    }

    /// Extract the audio track of a video into `audio_path`
    pub async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        let command = self.command_builder.extract_audio(video_path, audio_path);
        self.runner.run(&command).await
    }

    /// Burn subtitles into a copy of the video at `output_path`
    pub async fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!("Burning subtitles from {} into {} -> {}",
              subtitle_path.display(), video_path.display(), output_path.display());

        let command = self.command_builder.burn_subtitles(
            video_path,
            subtitle_path,
            output_path,
            &self.config.subtitle_options,
        );
        self.runner.run(&command).await
    }
}
