//! Blank-line delimited subtitle blocks (SRT as written by whisper).
//!
//! A block with at least three lines is a cue: index line, timestamp range,
//! then text. Anything shorter is kept verbatim so it survives a rewrite.

const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleBlock {
    /// Index + timestamp header followed by one or more text lines
    Cue { header: String, lines: Vec<String> },
    /// Fewer than three lines, reproduced as-is
    Verbatim(String),
}

impl SubtitleBlock {
    fn parse(block: &str) -> Self {
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() < 3 {
            return SubtitleBlock::Verbatim(block.to_string());
        }

        SubtitleBlock::Cue {
            header: lines[..2].join("\n"),
            lines: lines[2..].iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            SubtitleBlock::Cue { header, lines } => format!("{}\n{}", header, lines.join("\n")),
            SubtitleBlock::Verbatim(raw) => raw.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    pub blocks: Vec<SubtitleBlock>,
}

impl SubtitleDocument {
    /// Split on blank lines, trim each block and drop the empty ones
    pub fn parse(content: &str) -> Self {
        let blocks = content
            .split(BLOCK_SEPARATOR)
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(SubtitleBlock::parse)
            .collect();

        Self { blocks }
    }

    /// Blocks joined by a blank line, no trailing newline
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(SubtitleBlock::render)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1\n00:00:00,000 --> 00:00:02,000\nHello world\n\n2\n00:00:02,000 --> 00:00:04,000\nGoodbye\n";

    #[test]
    fn test_parse_cues() {
        let doc = SubtitleDocument::parse(SAMPLE);
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.blocks[0],
            SubtitleBlock::Cue {
                header: "1\n00:00:00,000 --> 00:00:02,000".to_string(),
                lines: vec!["Hello world".to_string()],
            }
        );
    }

    #[test]
    fn test_render_drops_trailing_newline() {
        let doc = SubtitleDocument::parse(SAMPLE);
        assert_eq!(doc.render(), SAMPLE.trim_end());
    }

    #[test]
    fn test_short_blocks_are_verbatim() {
        let content = "1\n00:00:00,000 --> 00:00:01,000\n\nlonely line\n\n3\n00:00:05,000 --> 00:00:06,000\nA\nB";
        let doc = SubtitleDocument::parse(content);

        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc.blocks[0],
            SubtitleBlock::Verbatim("1\n00:00:00,000 --> 00:00:01,000".to_string())
        );
        assert_eq!(doc.blocks[1], SubtitleBlock::Verbatim("lonely line".to_string()));
        assert_eq!(doc.render(), content);
    }

    #[test]
    fn test_empty_blocks_discarded() {
        let doc = SubtitleDocument::parse("\n\n\n\n   \n\n1\n00:00:00,000 --> 00:00:01,000\nHi\n\n\n\n");
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let doc = SubtitleDocument::parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.render(), "");
    }

    #[test]
    fn test_whitespace_inner_line_kept() {
        let doc = SubtitleDocument::parse("7\n00:01:00,000 --> 00:01:02,000\nfirst\n  \nthird");
        match &doc.blocks[0] {
            SubtitleBlock::Cue { lines, .. } => assert_eq!(lines, &["first", "  ", "third"]),
            other => panic!("expected cue, got {:?}", other),
        }
    }
}
