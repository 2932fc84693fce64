use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::input::InputSource;

/// YouTube or local video translator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
pub struct Args {
    /// YouTube video URL
    #[arg(long)]
    pub url: Option<String>,

    /// Path to local video/audio file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Directory to store all intermediate and output files
    pub output_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn source(&self) -> Option<InputSource> {
        match (&self.url, &self.file) {
            (Some(url), _) => Some(InputSource::Url(url.clone())),
            (None, Some(file)) => Some(InputSource::File(file.clone())),
            (None, None) => None,
        }
    }
}
