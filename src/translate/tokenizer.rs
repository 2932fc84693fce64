/// Splits text into model tokens and joins token windows back into text
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<String>;

    fn decode(&self, tokens: &[String]) -> String;
}

/// One token per whitespace-separated word
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn decode(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }
}
