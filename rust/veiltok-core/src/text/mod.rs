//! Tokenization and word vectors.
//!
//! A [`Tokenizer`] is a serializable value built for a named language model. It splits a text on
//! whitespace and peels leading and trailing punctuation off every chunk, producing a
//! [`TokenizedDocument`] which keeps the text together with the byte spans of its tokens.
//!
//! Documents are embedded with the fixed [`Vocab`] of their model. Tokens are looked up verbatim
//! and then lower-cased; unknown tokens are handled according to the [`OovPolicy`].
//!
//! ```
//! # use veiltok_core::text::{OovPolicy, Tokenizer, EN_CORE_WEB_LG};
//! let tokenizer = Tokenizer::new(EN_CORE_WEB_LG, OovPolicy::Zero).unwrap();
//! let document = tokenizer.tokenize("A string to tokenize");
//! assert_eq!(document.tokens().collect::<Vec<_>>(), ["A", "string", "to", "tokenize"]);
//! assert_eq!(document.mean_vector().unwrap().len(), 300);
//! ```

pub(crate) mod document;
pub(crate) mod tokenizer;
pub(crate) mod vocab;

pub use self::{
    document::{EmbeddingError, TokenSpan, TokenizedDocument},
    tokenizer::{Tokenizer, PREFIXES, SUFFIXES},
    vocab::{
        ConstructionError,
        OovPolicy,
        Vocab,
        VocabularyMiss,
        EN_CORE_WEB_LG,
        EN_CORE_WEB_LG_DIM,
    },
};
