//! Embedding tables.
//!
//! See the [text module] documentation since this is a private module anyways.
//!
//! [text module]: crate::text

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{generate_unit_float, Sha256};

/// The name of the built-in English model.
pub const EN_CORE_WEB_LG: &str = "en_core_web_lg";

/// The dimension of the vectors of the built-in English model.
pub const EN_CORE_WEB_LG_DIM: usize = 300;

const EN_CORE_WEB_LG_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at", "back",
    "be", "because", "been", "before", "being", "between", "both", "but", "by", "can", "city",
    "come", "could", "data", "day", "did", "do", "document", "does", "down", "each", "even",
    "first", "for", "from", "get", "give", "go", "good", "great", "had", "has", "have", "he",
    "hello", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "know", "language", "last", "life", "like", "little", "long", "look", "make", "man",
    "many", "me", "model", "more", "most", "much", "must", "my", "never", "new", "no", "not",
    "now", "of", "old", "on", "one", "only", "or", "other", "our", "out", "over", "own", "people",
    "private", "right", "said", "same", "say", "secret", "see", "she", "should", "so", "some",
    "still", "string", "such", "take", "text", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "thing", "think", "this", "those", "through", "time", "to", "token",
    "tokenize", "tokenizer", "two", "under", "up", "us", "use", "very", "want", "was", "way",
    "we", "well", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with",
    "word", "work", "world", "would", "year", "you", "your", ".", ",", "!", "?", ";", ":", "'",
    "\"", "(", ")", "-", "$", "%", "don't", "e-mail",
];

static BUILTIN: Lazy<Vec<Vocab>> = Lazy::new(|| {
    vec![Vocab::derived(
        EN_CORE_WEB_LG,
        EN_CORE_WEB_LG_DIM,
        EN_CORE_WEB_LG_WORDS.iter().copied(),
    )]
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors related to the construction of a language pipeline.
pub enum ConstructionError {
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("the token {token:?} is not in the vocabulary")]
/// A token without a vector under the [`OovPolicy::Fail`] policy.
pub struct VocabularyMiss {
    /// The missing token.
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The handling of out-of-vocabulary tokens.
pub enum OovPolicy {
    /// Out-of-vocabulary tokens get the zero vector.
    Zero,
    /// Out-of-vocabulary tokens fail the embedding.
    Fail,
}

impl Default for OovPolicy {
    fn default() -> Self {
        Self::Zero
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A named table of word vectors of a fixed dimension.
pub struct Vocab {
    name: String,
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl Vocab {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>, dim: usize) -> Self {
        Self {
            name: name.into(),
            dim,
            vectors: HashMap::new(),
        }
    }

    /// Creates a table with deterministic pseudo-random vectors for the given words.
    ///
    /// The vector of a word is drawn from a `ChaCha20` stream seeded with the `SHA256` digest of
    /// the table name and the word, so every component lies in `[-1, 1)`.
    pub fn derived<'w>(
        name: impl Into<String>,
        dim: usize,
        words: impl IntoIterator<Item = &'w str>,
    ) -> Self {
        let mut vocab = Self::new(name, dim);
        for word in words {
            let digest = Sha256::hash(format!("{}/{}", vocab.name, word).as_bytes());
            let mut prng = ChaCha20Rng::from_seed(digest.as_array());
            let vector = (0..dim).map(|_| generate_unit_float(&mut prng)).collect();
            vocab.vectors.insert(word.to_string(), vector);
        }
        vocab
    }

    /// Gets a built-in table by its model name.
    ///
    /// # Errors
    /// Fails if there is no built-in model with this name.
    pub fn builtin(name: &str) -> Result<&'static Vocab, ConstructionError> {
        BUILTIN
            .iter()
            .find(|vocab| vocab.name == name)
            .ok_or_else(|| ConstructionError::UnknownModel(name.to_string()))
    }

    /// Gets the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Gets the number of words in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Checks if the table has no words.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Looks up the vector of a token, first verbatim and then lower-cased.
    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors
            .get(token)
            .or_else(|| self.vectors.get(&token.to_lowercase()))
            .map(Vec::as_slice)
    }

    /// Gets the vector of a token wrt the out-of-vocabulary policy.
    ///
    /// # Errors
    /// Fails if the token is unknown and the policy is [`OovPolicy::Fail`].
    pub fn vector(&self, token: &str, oov: OovPolicy) -> Result<Vec<f32>, VocabularyMiss> {
        match (self.get(token), oov) {
            (Some(vector), _) => Ok(vector.to_vec()),
            (None, OovPolicy::Zero) => Ok(vec![0.0; self.dim]),
            (None, OovPolicy::Fail) => Err(VocabularyMiss {
                token: token.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let vocab = Vocab::builtin(EN_CORE_WEB_LG).unwrap();
        assert_eq!(vocab.name(), "en_core_web_lg");
        assert_eq!(vocab.dim(), 300);
        for word in &["a", "string", "to", "tokenize"] {
            let vector = vocab.get(word).unwrap();
            assert_eq!(vector.len(), 300);
            assert!(vector.iter().all(|x| (-1.0..1.0).contains(x)));
        }
        assert_eq!(
            Vocab::builtin("xx_unknown_sm"),
            Err(ConstructionError::UnknownModel("xx_unknown_sm".into()))
        );
    }

    #[test]
    fn test_derived_vectors_are_deterministic_and_distinct() {
        let vocab = Vocab::derived("test", 8, vec!["a", "b"]);
        let again = Vocab::derived("test", 8, vec!["a", "b"]);
        assert_eq!(vocab, again);
        assert_ne!(vocab.get("a"), vocab.get("b"));
        assert_ne!(vocab.get("a"), Vocab::derived("other", 8, vec!["a"]).get("a"));
    }

    #[test]
    fn test_lookup_falls_back_to_lowercase() {
        let vocab = Vocab::builtin(EN_CORE_WEB_LG).unwrap();
        assert_eq!(vocab.get("String"), vocab.get("string"));
        assert_eq!(vocab.get("A"), vocab.get("a"));
        assert!(vocab.get("zzyzx").is_none());
    }

    #[test]
    fn test_oov_policy() {
        let vocab = Vocab::derived("test", 2, vec!["known"]);
        assert_eq!(vocab.len(), 1);

        let known = vocab.get("known").unwrap().to_vec();
        assert_eq!(vocab.vector("known", OovPolicy::Fail).unwrap(), known);
        assert_eq!(vocab.vector("unknown", OovPolicy::Zero).unwrap(), vec![0.0, 0.0]);
        assert_eq!(
            vocab.vector("unknown", OovPolicy::Fail),
            Err(VocabularyMiss {
                token: "unknown".into()
            })
        );
    }

    #[test]
    fn test_oov_policy_names() {
        assert_eq!(serde_json::to_string(&OovPolicy::Zero).unwrap(), "\"zero\"");
        let policy: OovPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(policy, OovPolicy::Fail);
        assert_eq!(OovPolicy::default(), OovPolicy::Zero);
    }
}
