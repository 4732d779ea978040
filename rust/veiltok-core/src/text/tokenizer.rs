//! Rule-based tokenization.
//!
//! See the [text module] documentation since this is a private module anyways.
//!
//! [text module]: crate::text

use serde::{Deserialize, Serialize};

use crate::text::{
    document::{TokenSpan, TokenizedDocument},
    vocab::{ConstructionError, OovPolicy, Vocab},
};

/// Characters split off the front of a whitespace-separated chunk.
pub const PREFIXES: &[char] = &['"', '\'', '(', '[', '{', '¿', '¡', '«', '$', '#'];

/// Characters split off the back of a whitespace-separated chunk.
pub const SUFFIXES: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', ')', ']', '}', '…', '»', '%',
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// A tokenizer for a language model.
///
/// Tokenizers are plain values: a coordinator constructs one for its pipeline and sends it to the
/// worker holding the text, which registers it in its store and tokenizes locally.
pub struct Tokenizer {
    model: String,
    oov: OovPolicy,
    prefixes: Vec<char>,
    suffixes: Vec<char>,
}

impl Tokenizer {
    /// Creates a tokenizer for a built-in model.
    ///
    /// # Errors
    /// Fails if there is no built-in model with this name.
    pub fn new(model: &str, oov: OovPolicy) -> Result<Self, ConstructionError> {
        Vocab::builtin(model)?;
        Ok(Self {
            model: model.to_string(),
            oov,
            prefixes: PREFIXES.to_vec(),
            suffixes: SUFFIXES.to_vec(),
        })
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the out-of-vocabulary policy.
    pub fn oov(&self) -> OovPolicy {
        self.oov
    }

    /// Tokenizes the text.
    ///
    /// The text is split on whitespace. Each chunk then loses its leading prefix characters and
    /// trailing suffix characters one by one, each becoming a token of its own; whatever remains
    /// is a single token.
    pub fn tokenize(&self, text: &str) -> TokenizedDocument {
        let mut spans = Vec::new();
        let mut chunk_start = None;
        for (i, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = chunk_start.take() {
                    self.split_chunk(text, start, i, &mut spans);
                }
            } else if chunk_start.is_none() {
                chunk_start = Some(i);
            }
        }
        if let Some(start) = chunk_start {
            self.split_chunk(text, start, text.len(), &mut spans);
        }
        TokenizedDocument::new(text.to_string(), spans, self.model.clone(), self.oov)
    }

    fn split_chunk(&self, text: &str, mut start: usize, mut end: usize, spans: &mut Vec<TokenSpan>) {
        while let Some(c) = text[start..end].chars().next() {
            if !self.prefixes.contains(&c) {
                break;
            }
            spans.push(TokenSpan::new(start, start + c.len_utf8()));
            start += c.len_utf8();
        }

        let mut suffixes = Vec::new();
        while let Some(c) = text[start..end].chars().next_back() {
            if !self.suffixes.contains(&c) {
                break;
            }
            end -= c.len_utf8();
            suffixes.push(TokenSpan::new(end, end + c.len_utf8()));
        }

        if start < end {
            spans.push(TokenSpan::new(start, end));
        }
        spans.extend(suffixes.into_iter().rev());
    }
}
