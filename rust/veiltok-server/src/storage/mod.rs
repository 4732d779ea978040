//! Worker-local object stores.
//!
//! Every worker registers the texts, tokenizers, documents and shares it receives or produces in
//! its own store. The store hands out random [`ObjectId`]s which, together with the worker's
//! name, make up the [`Pointer`]s held by other parties.
//!
//! [`ObjectId`]: veiltok_core::ObjectId
//! [`Pointer`]: veiltok_core::Pointer

pub mod memory;
pub mod traits;

pub use self::{
    memory::MemoryStore,
    traits::{LookupError, ObjectStorage, ObjectSummary, StoredObject},
};
