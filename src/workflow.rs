use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::download::Downloader;
use crate::error::{PalikkaError, Result};
use crate::input::{InputResolver, InputSource, MediaKind};
use crate::media::MediaProcessor;
use crate::runner::{CommandRunner, ProcessRunner};
use crate::transcribe::Transcriber;
use crate::translate::{ChunkedTranslator, OllamaTranslator, SubtitleTranslator, Translator, WordTokenizer};

/// Where one run keeps its files and the timestamped name they share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub output_dir: PathBuf,
    pub base: PathBuf,
}

impl RunContext {
    pub fn new<P: AsRef<Path>>(output_dir: P, started: DateTime<Local>) -> Self {
        let output_dir = output_dir.as_ref().to_path_buf();
        let base = output_dir.join(base_name(started));
        Self { output_dir, base }
    }
}

/// `<YYYYmmdd-HHMMSS>-video`
pub fn base_name(started: DateTime<Local>) -> String {
    format!("{}-video", started.format("%Y%m%d-%H%M%S"))
}

/// Every file a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub audio_path: PathBuf,
    pub video_path: Option<PathBuf>,
    pub subtitle_path: PathBuf,
    pub translated_subtitle_path: PathBuf,
    pub final_video_path: Option<PathBuf>,
}

impl RunArtifacts {
    /// The subtitled video when there is one, otherwise the translated subtitles
    pub fn final_artifact(&self) -> &Path {
        self.final_video_path
            .as_deref()
            .unwrap_or(self.translated_subtitle_path.as_path())
    }
}

pub struct Workflow {
    config: Config,
    resolver: InputResolver,
    transcriber: Transcriber,
    media: Arc<MediaProcessor>,
    translator: Arc<dyn Translator>,
    show_progress: bool,
}

impl Workflow {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>, translator: Arc<dyn Translator>) -> Self {
        let media = Arc::new(MediaProcessor::new(config.media.clone(), runner.clone()));
        let downloader = Downloader::new(config.downloader.clone(), runner.clone());
        let resolver = InputResolver::new(downloader, media.clone());
        let transcriber = Transcriber::new(config.transcriber.clone(), runner);

        Self {
            config,
            resolver,
            transcriber,
            media,
            translator,
            show_progress: false,
        }
    }

    /// Real processes and the Ollama translator
    pub fn from_config(config: Config) -> Result<Self> {
        let translator = Arc::new(OllamaTranslator::new(config.translate.clone())?);
        Ok(Self::new(config, Arc::new(ProcessRunner::new()), translator))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the whole pipeline for one input, stopping at the first failure
    pub async fn run<P: AsRef<Path>>(&self, source: &InputSource, output_dir: P) -> Result<RunArtifacts> {
        if let InputSource::File(path) = source {
            MediaKind::from_path(path)?;
        }

        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).await?;
        let run = RunContext::new(output_dir, Local::now());
        info!("Starting run {}", run.base.display());

        // Step 1: get audio (and video)
        let input = self.resolver.resolve(source, &run).await?;

        // Step 2: transcribe
        let subtitle_path = self.transcriber.transcribe(&input.audio_path, &run.output_dir).await?;
        if !fs::try_exists(&subtitle_path).await.unwrap_or(false) {
            return Err(PalikkaError::FileNotFound(format!(
                "transcription output {}",
                subtitle_path.display()
            )));
        }

        // Step 3: translate
        let translated_subtitle_path = translated_path(&subtitle_path)?;
        info!("Loading translation model...");
        self.translator.load().await?;
        self.subtitle_translator()
            .translate_file(&subtitle_path, &translated_subtitle_path)
            .await?;

        // Step 4: burn subtitles
        let final_video_path = match &input.video_path {
            Some(video_path) => {
                let final_video = final_video_path(video_path, &run.output_dir)?;
                self.media
                    .burn_subtitles(video_path, &translated_subtitle_path, &final_video)
                    .await?;
                info!("Done! Final translated video: {}", final_video.display());
                Some(final_video)
            }
            None => {
                info!("Done! Translated subtitles saved to: {}", translated_subtitle_path.display());
                None
            }
        };

        Ok(RunArtifacts {
            audio_path: input.audio_path,
            video_path: input.video_path,
            subtitle_path,
            translated_subtitle_path,
            final_video_path,
        })
    }

    fn subtitle_translator(&self) -> SubtitleTranslator {
        let units = ChunkedTranslator::new(
            Box::new(WordTokenizer),
            self.translator.clone(),
            self.config.translate.max_tokens,
        );
        SubtitleTranslator::new(units).with_progress(self.show_progress)
    }
}

/// `<dir>/<stem>-fin.srt` next to the transcript
fn translated_path(subtitle_path: &Path) -> Result<PathBuf> {
    let stem = subtitle_path
        .file_stem()
        .ok_or_else(|| PalikkaError::FileNotFound(subtitle_path.display().to_string()))?;

    let mut file_name = stem.to_os_string();
    file_name.push("-fin.srt");
    Ok(subtitle_path.with_file_name(file_name))
}

/// `<output_dir>/<video stem>-FIN.mp4`
fn final_video_path(video_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = video_path
        .file_stem()
        .ok_or_else(|| PalikkaError::FileNotFound(video_path.display().to_string()))?;

    let mut file_name = stem.to_os_string();
    file_name.push("-FIN.mp4");
    Ok(output_dir.join(file_name))
}
