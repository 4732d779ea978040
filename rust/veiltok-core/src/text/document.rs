//! Tokenized documents and their embeddings.
//!
//! See the [text module] documentation since this is a private module anyways.
//!
//! [text module]: crate::text

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::vocab::{ConstructionError, OovPolicy, Vocab, VocabularyMiss};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors related to the embedding of a tokenized document.
pub enum EmbeddingError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    VocabularyMiss(#[from] VocabularyMiss),

    #[error("the document has no tokens")]
    EmptyDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The byte range of a token in the text of its document.
pub struct TokenSpan {
    /// The byte offset of the first character.
    pub start: usize,
    /// The byte offset after the last character.
    pub end: usize,
}

impl TokenSpan {
    /// Creates a token span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A text together with its ordered token spans.
///
/// A document remembers the model and out-of-vocabulary policy of the tokenizer that produced it,
/// so that it can be embedded on the worker that holds it.
pub struct TokenizedDocument {
    text: String,
    spans: Vec<TokenSpan>,
    model: String,
    oov: OovPolicy,
}

impl TokenizedDocument {
    pub(crate) fn new(text: String, spans: Vec<TokenSpan>, model: String, oov: OovPolicy) -> Self {
        Self {
            text,
            spans,
            model,
            oov,
        }
    }

    /// Gets the source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the token spans.
    pub fn spans(&self) -> &[TokenSpan] {
        &self.spans
    }

    /// Gets the number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Checks if the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Gets the model name of the tokenizer.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the token at the given position.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.spans
            .get(index)
            .map(|span| &self.text[span.start..span.end])
    }

    /// Iterates over the tokens in order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans
            .iter()
            .map(move |span| &self.text[span.start..span.end])
    }

    /// Gets the vector of every token from the vocabulary of the tokenizer's model.
    ///
    /// # Errors
    /// Fails if the model is unknown or if a token is out of vocabulary under the
    /// [`OovPolicy::Fail`] policy.
    pub fn token_vectors(&self) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vocab = Vocab::builtin(&self.model)?;
        self.tokens()
            .map(|token| vocab.vector(token, self.oov).map_err(EmbeddingError::from))
            .collect()
    }

    /// Gets the mean of the token vectors.
    ///
    /// # Errors
    /// Fails if the document has no tokens or if [`token_vectors()`] fails.
    ///
    /// [`token_vectors()`]: TokenizedDocument::token_vectors
    pub fn mean_vector(&self) -> Result<Vec<f64>, EmbeddingError> {
        if self.is_empty() {
            return Err(EmbeddingError::EmptyDocument);
        }
        let vocab = Vocab::builtin(&self.model)?;
        let mut sum = vec![0_f64; vocab.dim()];
        for vector in self.token_vectors()? {
            for (acc, x) in sum.iter_mut().zip(vector) {
                *acc += f64::from(x);
            }
        }
        let count = self.len() as f64;
        Ok(sum.into_iter().map(|acc| acc / count).collect())
    }
}
