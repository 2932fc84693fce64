//! Palikkalator - YouTube / local media subtitle translator
//!
//! Downloads or extracts audio, transcribes it with whisper, translates the
//! subtitles line by line with a language model and burns them into the
//! video with ffmpeg.

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod input;
pub mod media;
pub mod runner;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
pub mod workflow;
