use std::path::Path;

use crate::runner::ExternalCommand;

/// ffmpeg-specific argument helpers
impl ExternalCommand {
    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").path_arg(path)
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.path_arg(path)
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Copy audio stream
    pub fn copy_audio(self) -> Self {
        self.audio_codec("copy")
    }

    /// Set variable audio quality (`-q:a`, 0 is best)
    pub fn audio_quality(self, quality: u32) -> Self {
        self.arg("-q:a").arg(quality.to_string())
    }

    /// Select streams to map into the output
    pub fn map<S: Into<String>>(self, spec: S) -> Self {
        self.arg("-map").arg(spec)
    }

    /// Add video filter
    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }
}

/// Builder for the ffmpeg operations the pipeline needs
#[derive(Debug, Clone)]
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build subtitle burn-in command: video re-encoded with the overlay, audio copied
    pub fn burn_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        additional_options: &[String],
    ) -> ExternalCommand {
        ExternalCommand::new(&self.binary_path, "Burning subtitles into video")
            .overwrite()
            .input(video_path)
            .video_filter(format!("subtitles={}", escape_filter_path(subtitle_path)))
            .copy_audio()
            .args(additional_options.iter().cloned())
            .output(output_path)
    }

    /// Build audio extraction command
    pub fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.binary_path, "Extracting audio from video")
            .input(video_path)
            .audio_quality(0)
            .map("a")
            .output(audio_path)
            .overwrite()
    }
}

/// Escape a path for use as a filter option value inside a filtergraph.
///
/// ffmpeg unescapes twice: once when splitting the graph into filters and
/// once when splitting a filter's options, so both levels are applied.
fn escape_filter_path(path: &Path) -> String {
    let option_level = escape_chars(&path.to_string_lossy(), &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_audio_args() {
        let cmd = MediaCommandBuilder::new("ffmpeg")
            .extract_audio(Path::new("/in/clip.mkv"), Path::new("/out/clip-extracted.mp3"));

        assert_eq!(cmd.program, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec!["-i", "/in/clip.mkv", "-q:a", "0", "-map", "a", "/out/clip-extracted.mp3", "-y"]
        );
    }

    #[test]
    fn test_burn_subtitles_args() {
        let options = vec!["-crf".to_string(), "23".to_string()];
        let cmd = MediaCommandBuilder::new("/opt/ffmpeg").burn_subtitles(
            Path::new("/out/a.mp4"),
            Path::new("/out/a-fin.srt"),
            Path::new("/out/a-FIN.mp4"),
            &options,
        );

        assert_eq!(cmd.program, "/opt/ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-y", "-i", "/out/a.mp4", "-vf", "subtitles=/out/a-fin.srt", "-c:a", "copy",
                "-crf", "23", "/out/a-FIN.mp4"
            ]
        );
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new("/tmp/plain.srt")), "/tmp/plain.srt");
        assert_eq!(
            escape_filter_path(Path::new("C:\\subs\\it's.srt")),
            "C\\\\:\\\\\\\\subs\\\\\\\\it\\\\\\'s.srt"
        );
        assert_eq!(
            escape_filter_path(Path::new("/runs/a, b-extracted-fin.srt")),
            "/runs/a\\, b-extracted-fin.srt"
        );
    }

    /// Minimal `av_get_token`: backslash escapes, single quotes, stop at a terminator
    fn get_token<'a>(input: &'a str, terminators: &[char]) -> (String, &'a str) {
        let mut token = String::new();
        let mut chars = input.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, next)) = chars.next() {
                        token.push(next);
                    }
                }
                '\'' => {
                    for (_, quoted) in chars.by_ref() {
                        if quoted == '\'' {
                            break;
                        }
                        token.push(quoted);
                    }
                }
                c if terminators.contains(&c) => return (token, &input[idx..]),
                c => token.push(c),
            }
        }
        (token, "")
    }

    /// Path ffmpeg would open for a `subtitles=` filter argument
    fn parsed_subtitle_path(filter_arg: &str) -> (String, String) {
        let (filter, graph_rest) = get_token(filter_arg, &['[', ']', ',', ';']);
        let value = filter.strip_prefix("subtitles=").unwrap();
        let (path, option_rest) = get_token(value, &[':']);
        (path, format!("{}{}", option_rest, graph_rest))
    }

    #[test]
    fn test_burn_filter_survives_ffmpeg_parsing() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        for name in [
            "/runs/Bob's talk-extracted-fin.srt",
            "/runs/a, b-extracted-fin.srt",
            "/mnt/c:/x-fin.srt",
            "/runs/[x];y\\z.srt",
        ] {
            let cmd = builder.burn_subtitles(
                Path::new("/in.mp4"),
                Path::new(name),
                Path::new("/out.mp4"),
                &[],
            );
            let (path, leftover) = parsed_subtitle_path(&cmd.args[4]);
            assert_eq!(path, name);
            assert_eq!(leftover, "");
        }
    }
}
