//! Object storage API.

use derive_more::From;
use displaydoc::Display;
use thiserror::Error;

use veiltok_core::{
    share::ShareVect,
    text::{TokenizedDocument, Tokenizer},
    ObjectId,
    ObjectKind,
};

/// Errors related to the lookup of objects in a store.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No object with id {0} exists in the store.
    NotFound(ObjectId),
    /// Expected an object of kind {expected}, found one of kind {actual}.
    KindMismatch {
        expected: ObjectKind,
        actual: ObjectKind,
    },
}

/// An object held in a worker's store.
#[derive(Debug, Clone, PartialEq, From)]
pub enum StoredObject {
    Text(String),
    Tokenizer(Tokenizer),
    Document(TokenizedDocument),
    Share(ShareVect),
}

/// What a worker reveals about an object without revealing its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSummary {
    /// The kind of the object.
    pub kind: ObjectKind,
    /// The number of characters of a text, tokens of a document or elements of a share. Zero for
    /// tokenizers.
    pub len: usize,
}

impl StoredObject {
    /// Gets the kind of the object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Text(_) => ObjectKind::Text,
            Self::Tokenizer(_) => ObjectKind::Tokenizer,
            Self::Document(_) => ObjectKind::Document,
            Self::Share(_) => ObjectKind::Share,
        }
    }

    /// Summarizes the object.
    pub fn summary(&self) -> ObjectSummary {
        let len = match self {
            Self::Text(text) => text.chars().count(),
            Self::Tokenizer(_) => 0,
            Self::Document(document) => document.len(),
            Self::Share(share) => share.len(),
        };
        ObjectSummary {
            kind: self.kind(),
            len,
        }
    }

    /// Checks that the object is of the `expected` kind.
    ///
    /// # Errors
    /// Fails with [`LookupError::KindMismatch`] otherwise.
    pub fn check_kind(&self, expected: ObjectKind) -> Result<(), LookupError> {
        let actual = self.kind();
        if actual == expected {
            Ok(())
        } else {
            Err(LookupError::KindMismatch { expected, actual })
        }
    }

    fn mismatch(&self, expected: ObjectKind) -> LookupError {
        LookupError::KindMismatch {
            expected,
            actual: self.kind(),
        }
    }

    pub fn into_text(self) -> Result<String, LookupError> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(other.mismatch(ObjectKind::Text)),
        }
    }

    pub fn into_tokenizer(self) -> Result<Tokenizer, LookupError> {
        match self {
            Self::Tokenizer(tokenizer) => Ok(tokenizer),
            other => Err(other.mismatch(ObjectKind::Tokenizer)),
        }
    }

    pub fn into_document(self) -> Result<TokenizedDocument, LookupError> {
        match self {
            Self::Document(document) => Ok(document),
            other => Err(other.mismatch(ObjectKind::Document)),
        }
    }

    pub fn into_share(self) -> Result<ShareVect, LookupError> {
        match self {
            Self::Share(share) => Ok(share),
            other => Err(other.mismatch(ObjectKind::Share)),
        }
    }
}

#[async_trait]
/// An abstract worker-local object store.
///
/// Implementations are cheap to clone handles to the same store. Accesses to the same object are
/// serialized, accesses to different objects may proceed concurrently.
pub trait ObjectStorage
where
    Self: Clone + Send + Sync + 'static,
{
    /// Registers an object and returns its freshly generated id.
    ///
    /// # Behavior
    ///
    /// - The id is unique in this store: a generated id which is already taken is discarded and
    ///   a new one is generated.
    async fn put(&self, object: StoredObject) -> ObjectId;

    /// Gets a copy of an object.
    ///
    /// # Behavior
    ///
    /// - If the object doesn't exist, return [`LookupError::NotFound`].
    async fn get(&self, id: ObjectId) -> Result<StoredObject, LookupError>;

    /// Removes an object.
    ///
    /// # Behavior
    ///
    /// - If the object doesn't exist, return [`LookupError::NotFound`].
    /// - Waits for pending accesses to the object to finish before returning.
    async fn remove(&self, id: ObjectId) -> Result<(), LookupError>;

    /// Checks if an object exists.
    async fn contains(&self, id: ObjectId) -> bool;

    /// Gets the number of stored objects.
    async fn len(&self) -> usize;

    /// Removes all objects.
    async fn clear(&self);
}
