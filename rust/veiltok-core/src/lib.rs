#![cfg_attr(docsrs, feature(doc_cfg))]
//! # Veiltok: tokenize text you are not allowed to read
//!
//! ###### tags: Privacy, Tokenization, Secret Sharing, NLP
//!
//! Veiltok lets a coordinator tokenize and embed text that lives on remote workers without ever
//! seeing the text itself. The coordinator only ever holds [`Pointer`]s to remote objects and,
//! optionally, encrypted embedding vectors that are additively secret-shared between two holder
//! workers.
//!
//! This crate contains the building blocks that every party needs:
//!
//! - **Pointers**: typed, non-owning references `(owner, location, id)` to objects living in a
//!   worker's object store. See the [`pointer`] module.
//! - **Text processing**: a rule-based whitespace/punctuation [`Tokenizer`], the
//!   [`TokenizedDocument`] it produces and the fixed embedding tables ([`Vocab`]) that map tokens to
//!   vectors. See the [`text`] module.
//! - **Secret sharing**: fixed-point encoding of embedding vectors into a finite group of
//!   power-of-two order, and their splitting into two additive shares with the help of a mask
//!   dealt by a crypto provider. See the [`share`] module.
//! - **Crypto**: thin wrappers around the [sodiumoxide] primitives used to deliver mask seeds to
//!   the worker that owns the plaintext. See the [`crypto`] module.
//!
//! The worker and coordinator runtimes are implemented in the `veiltok-server` crate.
//!
//! [`Tokenizer`]: crate::text::Tokenizer
//! [`TokenizedDocument`]: crate::text::TokenizedDocument
//! [`Vocab`]: crate::text::Vocab
//! [sodiumoxide]: https://docs.rs/sodiumoxide/

#[macro_use]
extern crate serde;

pub mod common;
pub mod crypto;
pub mod pointer;
pub mod share;
pub mod text;

use thiserror::Error;

pub use self::{
    common::{ObjectId, ObjectKind, WorkerId},
    pointer::Pointer,
};

#[derive(Error, Debug)]
#[error("initialization failed: the crypto backend could not be initialized")]
/// An error related to the initialization of the crypto backend at program startup.
pub struct InitError;

/// Initializes the crypto backend.
///
/// This is called implicitly by the key generation functions of sodiumoxide, but calling it once
/// at startup makes the random number generator thread safe.
///
/// # Errors
/// Fails if sodiumoxide could not be initialized.
pub fn init() -> Result<(), InitError> {
    sodiumoxide::init().map_err(|_| InitError)
}
