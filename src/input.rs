use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::download::Downloader;
use crate::error::{PalikkaError, Result};
use crate::media::MediaProcessor;
use crate::workflow::RunContext;

const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "wav", "m4a"];
const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "mov", "avi"];

/// What the pipeline was asked to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a local file by its (case-insensitive) extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(MediaKind::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(MediaKind::Video)
        } else {
            Err(PalikkaError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// Audio to transcribe plus the video to burn subtitles into, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub audio_path: PathBuf,
    pub video_path: Option<PathBuf>,
}

pub struct InputResolver {
    downloader: Downloader,
    media: Arc<MediaProcessor>,
}

impl InputResolver {
    pub fn new(downloader: Downloader, media: Arc<MediaProcessor>) -> Self {
        Self { downloader, media }
    }

    pub async fn resolve(&self, source: &InputSource, run: &RunContext) -> Result<ResolvedInput> {
        let resolved = match source {
            InputSource::Url(url) => {
                info!("Processing YouTube URL...");
                let audio_path = self.downloader.download_audio(url, &run.base).await?;
                let video_path = self.downloader.download_video(url, &run.base).await?;
                ResolvedInput {
                    audio_path,
                    video_path: Some(video_path),
                }
            }
            InputSource::File(path) => self.resolve_file(path, run).await?,
        };

        ensure_audio(&resolved.audio_path)?;
        Ok(resolved)
    }

    async fn resolve_file(&self, path: &Path, run: &RunContext) -> Result<ResolvedInput> {
        let input_path = std::path::absolute(path)?;

        match MediaKind::from_path(&input_path)? {
            MediaKind::Audio => {
                info!("Processing local audio file...");
                Ok(ResolvedInput {
                    audio_path: input_path,
                    video_path: None,
                })
            }
            MediaKind::Video => {
                info!("Processing local video file...");
                let audio_path = extracted_audio_path(&input_path, &run.output_dir)?;
                self.media.extract_audio(&input_path, &audio_path).await?;
                Ok(ResolvedInput {
                    audio_path,
                    video_path: Some(input_path),
                })
            }
        }
    }
}

/// `<output_dir>/<video stem>-extracted.mp3`
fn extracted_audio_path(video_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = video_path
        .file_stem()
        .ok_or_else(|| PalikkaError::UnsupportedFormat(video_path.display().to_string()))?;

    let mut file_name = stem.to_os_string();
    file_name.push("-extracted.mp3");
    Ok(output_dir.join(file_name))
}

fn ensure_audio(audio_path: &Path) -> Result<()> {
    match std::fs::metadata(audio_path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(PalikkaError::MissingAudio(audio_path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_audio() {
        for name in ["a.mp3", "b.WAV", "c.m4a"] {
            assert_eq!(MediaKind::from_path(Path::new(name)).unwrap(), MediaKind::Audio);
        }
    }

    #[test]
    fn test_media_kind_video() {
        for name in ["a.mp4", "b.mkv", "c.MOV", "d.avi"] {
            assert_eq!(MediaKind::from_path(Path::new(name)).unwrap(), MediaKind::Video);
        }
    }

    #[test]
    fn test_media_kind_unsupported() {
        for name in ["notes.txt", "noext", "clip.webm"] {
            let err = MediaKind::from_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, PalikkaError::UnsupportedFormat(_)));
        }
    }

    #[test]
    fn test_extracted_audio_path() {
        let path = extracted_audio_path(Path::new("/media/talk.final.mkv"), Path::new("/runs")).unwrap();
        assert_eq!(path, PathBuf::from("/runs/talk.final-extracted.mp3"));
    }

    #[test]
    fn test_ensure_audio() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.mp3");
        let full = dir.path().join("full.mp3");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"ID3").unwrap();

        assert!(matches!(ensure_audio(&empty), Err(PalikkaError::MissingAudio(_))));
        assert!(matches!(ensure_audio(&dir.path().join("none.mp3")), Err(PalikkaError::MissingAudio(_))));
        ensure_audio(&full).unwrap();
    }
}
