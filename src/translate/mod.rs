// Subtitle translation
//
// - Translator: the narrow "translate(text) -> text" model capability
// - Tokenizer: token counting and window decoding for long lines
// - ChunkedTranslator: per-line translation with fixed token windows
// - SubtitleTranslator: block-level file rewrite
// - Ollama: production Translator over HTTP

pub mod chunk;
pub mod ollama;
pub mod tokenizer;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub use chunk::ChunkedTranslator;
pub use ollama::OllamaTranslator;
pub use tokenizer::{Tokenizer, WordTokenizer};

use crate::error::Result;
use crate::subtitle::{SubtitleBlock, SubtitleDocument};

/// Translate a piece of text into the configured target language
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Make sure the model is ready before the first line is sent
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String>;
}

/// Rewrites a subtitle file, translating every text line of every cue.
///
/// Each line is translated on its own, without the neighbouring lines as
/// context.
pub struct SubtitleTranslator {
    units: ChunkedTranslator,
    show_progress: bool,
}

impl SubtitleTranslator {
    pub fn new(units: ChunkedTranslator) -> Self {
        Self {
            units,
            show_progress: false,
        }
    }

    /// Draw a progress bar over blocks while translating
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn translate_document(&self, document: &SubtitleDocument) -> Result<SubtitleDocument> {
        let total = document.len();
        let progress = self.progress_bar(total as u64);
        let mut blocks = Vec::with_capacity(total);

        for (idx, block) in document.blocks.iter().enumerate() {
            let translated = match block {
                SubtitleBlock::Verbatim(_) => block.clone(),
                SubtitleBlock::Cue { header, lines } => {
                    let mut translated_lines = Vec::with_capacity(lines.len());
                    for line in lines {
                        translated_lines.push(self.units.translate_unit(line).await?);
                    }
                    info!("Translated block {}/{}", idx + 1, total);
                    SubtitleBlock::Cue {
                        header: header.clone(),
                        lines: translated_lines,
                    }
                }
            };
            blocks.push(translated);
            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(SubtitleDocument { blocks })
    }

    /// Translate `input` into `output`, returning the number of blocks written
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<usize> {
        info!("Translating subtitles {} -> {}", input.display(), output.display());

        let content = fs::read_to_string(input).await?;
        let document = SubtitleDocument::parse(&content);
        let translated = self.translate_document(&document).await?;

        fs::write(output, translated.render()).await?;

        info!("Wrote {} subtitle blocks to {}", translated.len(), output.display());
        Ok(translated.len())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks ({eta})")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
