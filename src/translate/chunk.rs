use std::sync::Arc;
use tracing::debug;

use crate::error::{PalikkaError, Result};
use super::{Tokenizer, Translator};

/// Translates one subtitle line, splitting it into fixed token windows when
/// it is longer than the model accepts.
///
/// Windows are cut by raw token position with no overlap, so a chunk boundary
/// may land mid-sentence.
pub struct ChunkedTranslator {
    tokenizer: Box<dyn Tokenizer>,
    translator: Arc<dyn Translator>,
    max_tokens: usize,
}

impl ChunkedTranslator {
    pub fn new(tokenizer: Box<dyn Tokenizer>, translator: Arc<dyn Translator>, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            translator,
            max_tokens: max_tokens.max(1),
        }
    }

    pub async fn translate_unit(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let tokens = self.tokenizer.encode(text);
        if tokens.len() <= self.max_tokens {
            return single_line(self.translator.translate(text).await?);
        }

        let chunk_count = tokens.len().div_ceil(self.max_tokens);
        debug!("Line has {} tokens, translating in {} chunks", tokens.len(), chunk_count);

        let mut translations = Vec::with_capacity(chunk_count);
        for window in tokens.chunks(self.max_tokens) {
            let chunk_text = self.tokenizer.decode(window);
            translations.push(single_line(self.translator.translate(&chunk_text).await?)?);
        }

        Ok(translations.join(" "))
    }
}

/// A translated line must stay one non-empty line, or it would split the cue
fn single_line(translation: String) -> Result<String> {
    let line = translation.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.is_empty() {
        return Err(PalikkaError::Translation("Empty translation received".to_string()));
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{MockTranslator, WordTokenizer};
    use mockall::Sequence;

    fn chunked(mock: MockTranslator, max_tokens: usize) -> ChunkedTranslator {
        ChunkedTranslator::new(Box::new(WordTokenizer), Arc::new(mock), max_tokens)
    }

    #[tokio::test]
    async fn test_blank_line_skips_model() {
        let mut mock = MockTranslator::new();
        mock.expect_translate().never();

        let translator = chunked(mock, 510);
        assert_eq!(translator.translate_unit("").await.unwrap(), "");
        assert_eq!(translator.translate_unit("   \t").await.unwrap(), "   \t");
    }

    #[tokio::test]
    async fn test_short_line_single_call_with_original_text() {
        let mut mock = MockTranslator::new();
        mock.expect_translate()
            .withf(|text| text == "Hello   world")
            .times(1)
            .returning(|_| Ok("Terve maailma".to_string()));

        let translator = chunked(mock, 510);
        assert_eq!(translator.translate_unit("Hello   world").await.unwrap(), "Terve maailma");
    }

    #[tokio::test]
    async fn test_exactly_threshold_is_one_call() {
        let line = vec!["w"; 510].join(" ");
        let mut mock = MockTranslator::new();
        mock.expect_translate().times(1).returning(|_| Ok("x".to_string()));

        chunked(mock, 510).translate_unit(&line).await.unwrap();
    }

    #[tokio::test]
    async fn test_long_line_is_chunked_in_order() {
        let line = (0..1100).map(|i| format!("t{}", i)).collect::<Vec<_>>().join(" ");

        let mut mock = MockTranslator::new();
        let mut seq = Sequence::new();
        mock.expect_translate()
            .withf(|text| text.starts_with("t0 ") && text.ends_with(" t509") && text.split(' ').count() == 510)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("A".to_string()));
        mock.expect_translate()
            .withf(|text| text.starts_with("t510 ") && text.ends_with(" t1019"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("B".to_string()));
        mock.expect_translate()
            .withf(|text| text.starts_with("t1020 ") && text.split(' ').count() == 80)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("C".to_string()));

        let result = chunked(mock, 510).translate_unit(&line).await.unwrap();
        assert_eq!(result, "A B C");
    }

    #[tokio::test]
    async fn test_line_breaks_in_translation_collapsed() {
        let mut mock = MockTranslator::new();
        mock.expect_translate()
            .times(2)
            .returning(|_| Ok("A\n\nB ".to_string()));

        let translator = chunked(mock, 2);
        assert_eq!(translator.translate_unit("one two three").await.unwrap(), "A B A B");
    }

    #[tokio::test]
    async fn test_blank_translation_is_error() {
        let mut mock = MockTranslator::new();
        mock.expect_translate()
            .times(1)
            .returning(|_| Ok(" \n ".to_string()));

        let err = chunked(mock, 510).translate_unit("Hello").await.unwrap_err();
        assert!(matches!(err, PalikkaError::Translation(_)));
    }

    #[tokio::test]
    async fn test_chunk_error_propagates() {
        let mut mock = MockTranslator::new();
        mock.expect_translate()
            .times(1)
            .returning(|_| Err(PalikkaError::Translation("boom".to_string())));

        let err = chunked(mock, 2).translate_unit("a b c").await.unwrap_err();
        assert!(matches!(err, PalikkaError::Translation(_)));
    }
}
