use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::DownloaderConfig;
use crate::error::Result;
use crate::runner::{CommandRunner, ExternalCommand};

/// Fetches audio and video for a URL through yt-dlp
pub struct Downloader {
    config: DownloaderConfig,
    runner: Arc<dyn CommandRunner>,
}

impl Downloader {
    pub fn new(config: DownloaderConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Path yt-dlp writes the extracted audio to for a given base name
    pub fn audio_path(&self, base: &Path) -> PathBuf {
        with_suffix(base, &format!("-audio.{}", self.config.audio_format))
    }

    /// Path yt-dlp writes the re-encoded video to for a given base name
    pub fn video_path(&self, base: &Path) -> PathBuf {
        with_suffix(base, &format!(".{}", self.config.video_format))
    }

    pub fn audio_command(&self, url: &str, base: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.config.binary_path, "Downloading audio")
            .args(["-f", "ba", "-x"])
            .arg("--audio-format")
            .arg(&self.config.audio_format)
            .arg("--audio-quality")
            .arg(&self.config.audio_quality)
            .arg("-o")
            .path_arg(with_suffix(base, "-audio"))
            .arg(url)
    }

    pub fn video_command(&self, url: &str, base: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.config.binary_path, "Downloading video")
            .arg("--recode-video")
            .arg(&self.config.video_format)
            .arg("-o")
            .path_arg(base)
            .arg(url)
    }

    /// Download the audio track only, returning where it landed
    pub async fn download_audio(&self, url: &str, base: &Path) -> Result<PathBuf> {
        info!("Downloading audio for {}", url);
        self.runner.run(&self.audio_command(url, base)).await?;
        Ok(self.audio_path(base))
    }

    /// Download the full video, returning where it landed
    pub async fn download_video(&self, url: &str, base: &Path) -> Result<PathBuf> {
        info!("Downloading video for {}", url);
        self.runner.run(&self.video_command(url, base)).await?;
        Ok(self.video_path(base))
    }
}

/// Append to the final path component without treating dots as extensions
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ProcessRunner;

    fn downloader() -> Downloader {
        Downloader::new(DownloaderConfig::default(), Arc::new(ProcessRunner::new()))
    }

    #[test]
    fn test_artifact_paths() {
        let d = downloader();
        let base = Path::new("/runs/20240101-120000-video");
        assert_eq!(d.audio_path(base), PathBuf::from("/runs/20240101-120000-video-audio.mp3"));
        assert_eq!(d.video_path(base), PathBuf::from("/runs/20240101-120000-video.mp4"));
    }

    #[test]
    fn test_audio_command_args() {
        let cmd = downloader().audio_command("https://youtu.be/x", Path::new("/runs/b"));
        assert_eq!(cmd.program, "yt-dlp");
        assert_eq!(
            cmd.args,
            vec![
                "-f", "ba", "-x", "--audio-format", "mp3", "--audio-quality", "320",
                "-o", "/runs/b-audio", "https://youtu.be/x"
            ]
        );
    }

    #[test]
    fn test_video_command_args() {
        let cmd = downloader().video_command("https://youtu.be/x", Path::new("/runs/b"));
        assert_eq!(cmd.args, vec!["--recode-video", "mp4", "-o", "/runs/b", "https://youtu.be/x"]);
    }
}
