//! Typed pointers to objects living in a worker's object store.
//!
//! A [`Pointer`] is a non-owning reference plus routing information: it records which party holds
//! the pointer (the *owner*), which worker holds the referent (the *location*) and the referent's
//! [`ObjectId`] in that worker's store. The kind of the referent is tracked at the type level, so
//! that a pointer to a tokenized document cannot be passed where a pointer to a string is
//! expected.
//!
//! Pointers never expose the contents of their referent. They are serializable, which makes them
//! suitable for inclusion in request messages; the receiving worker validates the location and the
//! kind of every pointer it is asked to resolve.
//!
//! ```
//! # use veiltok_core::{pointer::{kind, Pointer}, ObjectId, WorkerId};
//! let ptr = Pointer::<kind::Document>::new("me".into(), "bob".into(), ObjectId::from(42));
//! assert_eq!(ptr.to_string(), "[DocumentPointer | me -> bob:42]");
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Serialize};

use crate::common::{ObjectId, ObjectKind, WorkerId};

/// Type-level tags for the kinds of objects a [`Pointer`] may refer to.
pub mod kind {
    use crate::common::ObjectKind;

    mod private {
        pub trait Sealed {}
    }

    /// The kind of the referent of a [`Pointer`](super::Pointer).
    pub trait PointerKind: private::Sealed + Send + Sync + 'static {
        /// The kind of object in the store.
        const KIND: ObjectKind;
    }

    macro_rules! pointer_kinds {
        ($($(#[$doc:meta])* $name:ident;)*) => {
            $(
                $(#[$doc])*
                #[derive(Debug)]
                pub enum $name {}

                impl private::Sealed for $name {}

                impl PointerKind for $name {
                    const KIND: ObjectKind = ObjectKind::$name;
                }
            )*
        };
    }

    pointer_kinds! {
        /// A pointer to a piece of text.
        Text;
        /// A pointer to a tokenizer.
        Tokenizer;
        /// A pointer to a tokenized document.
        Document;
        /// A pointer to one party's share of a secret-shared vector.
        Share;
    }
}

use self::kind::PointerKind;

#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
/// A local, non-owning reference to an object of kind `K` living in a worker's object store.
pub struct Pointer<K: PointerKind> {
    owner: WorkerId,
    location: WorkerId,
    id: ObjectId,
    #[serde(skip)]
    kind: PhantomData<fn() -> K>,
}

impl<K: PointerKind> Pointer<K> {
    /// Creates a pointer held by `owner` to the object `id` stored on `location`.
    pub fn new(owner: WorkerId, location: WorkerId, id: ObjectId) -> Self {
        Self {
            owner,
            location,
            id,
            kind: PhantomData,
        }
    }

    /// Gets the identity of the party holding this pointer.
    pub fn owner(&self) -> &WorkerId {
        &self.owner
    }

    /// Gets the identity of the worker holding the referent.
    pub fn location(&self) -> &WorkerId {
        &self.location
    }

    /// Gets the identifier of the referent in the location's store.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Gets the kind of the referent.
    pub fn kind(&self) -> ObjectKind {
        K::KIND
    }

    /// Checks whether the referent lives on the given worker.
    pub fn is_located_on(&self, worker: &WorkerId) -> bool {
        &self.location == worker
    }

    /// Hands this pointer over to another owner.
    pub fn with_owner(self, owner: WorkerId) -> Self {
        Self { owner, ..self }
    }
}

impl<K: PointerKind> Clone for Pointer<K> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            location: self.location.clone(),
            id: self.id,
            kind: PhantomData,
        }
    }
}

impl<K: PointerKind> PartialEq for Pointer<K> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.location == other.location && self.id == other.id
    }
}

impl<K: PointerKind> Eq for Pointer<K> {}

impl<K: PointerKind> Hash for Pointer<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.location.hash(state);
        self.id.hash(state);
    }
}

impl<K: PointerKind> fmt::Debug for Pointer<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("kind", &K::KIND)
            .field("owner", &self.owner)
            .field("location", &self.location)
            .field("id", &self.id)
            .finish()
    }
}

impl<K: PointerKind> fmt::Display for Pointer<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}Pointer | {} -> {}:{}]",
            K::KIND,
            self.owner,
            self.location,
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn doc_ptr(id: u64) -> Pointer<kind::Document> {
        Pointer::new("me".into(), "bob".into(), ObjectId::from(id))
    }

    #[test]
    fn test_display() {
        let text = Pointer::<kind::Text>::new("me".into(), "alice".into(), ObjectId::from(7));
        assert_eq!(text.to_string(), "[TextPointer | me -> alice:7]");
        assert_eq!(doc_ptr(9).to_string(), "[DocumentPointer | me -> bob:9]");
    }

    #[test]
    fn test_accessors() {
        let ptr = doc_ptr(3);
        assert_eq!(ptr.owner(), &WorkerId::from("me"));
        assert_eq!(ptr.location(), &WorkerId::from("bob"));
        assert_eq!(ptr.id(), ObjectId::from(3));
        assert_eq!(ptr.kind(), ObjectKind::Document);
        assert!(ptr.is_located_on(&"bob".into()));
        assert!(!ptr.is_located_on(&"me".into()));
    }

    #[test]
    fn test_with_owner_keeps_routing() {
        let ptr = doc_ptr(3).with_owner("alice".into());
        assert_eq!(ptr.owner(), &WorkerId::from("alice"));
        assert_eq!(ptr.location(), &WorkerId::from("bob"));
        assert_eq!(ptr.id(), ObjectId::from(3));
    }

    #[test]
    fn test_equality_and_hash() {
        let mut set = HashSet::new();
        set.insert(doc_ptr(1));
        set.insert(doc_ptr(1));
        set.insert(doc_ptr(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serialized_form_is_routing_data() {
        let json = serde_json::to_value(&doc_ptr(5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "owner": "me", "location": "bob", "id": 5 })
        );
        let ptr: Pointer<kind::Document> = serde_json::from_value(json).unwrap();
        assert_eq!(ptr, doc_ptr(5));
    }
}
