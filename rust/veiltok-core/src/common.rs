//! Identifiers shared by all parties.

use std::fmt;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
/// The name of a worker. Worker names are unique within a network.
pub struct WorkerId(String);

impl WorkerId {
    /// Creates a worker identifier from the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gets the worker name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for WorkerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
/// The identifier of an object in a worker's object store.
pub struct ObjectId(u64);

impl ObjectId {
    /// Generates a random object identifier.
    ///
    /// Uniqueness is only guaranteed once the identifier has been registered in a store, which
    /// regenerates identifiers on collision.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Gets the raw identifier.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The kind of an object held in a worker's object store.
pub enum ObjectKind {
    /// A piece of text.
    Text,
    /// A tokenizer sent by a coordinator.
    Tokenizer,
    /// A tokenized document.
    Document,
    /// One party's share of a secret-shared vector.
    Share,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Text => "Text",
            Self::Tokenizer => "Tokenizer",
            Self::Document => "Document",
            Self::Share => "Share",
        };
        f.write_str(name)
    }
}
