//! An in-memory object store.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};

use crate::storage::{LookupError, ObjectStorage, StoredObject};
use veiltok_core::ObjectId;

type Entry = Arc<Mutex<StoredObject>>;

/// An object store that keeps everything in memory.
///
/// The map of ids is guarded by a read-write lock which is only held for map operations, every
/// object is guarded by its own mutex.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<ObjectId, Entry>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object under the first id from `generate` which isn't taken yet.
    pub(crate) async fn put_with<G>(&self, object: StoredObject, mut generate: G) -> ObjectId
    where
        G: FnMut() -> ObjectId + Send,
    {
        let mut objects = self.objects.write().await;
        let mut id = generate();
        while objects.contains_key(&id) {
            debug!("object id {} is taken, generating a new one", id);
            id = generate();
        }
        objects.insert(id, Arc::new(Mutex::new(object)));
        id
    }

    async fn entry(&self, id: ObjectId) -> Result<Entry, LookupError> {
        self.objects
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LookupError::NotFound(id))
    }
}

#[async_trait]
impl ObjectStorage for MemoryStore {
    async fn put(&self, object: StoredObject) -> ObjectId {
        self.put_with(object, ObjectId::generate).await
    }

    async fn get(&self, id: ObjectId) -> Result<StoredObject, LookupError> {
        let entry = self.entry(id).await?;
        let object = entry.lock().await;
        Ok(object.clone())
    }

    async fn remove(&self, id: ObjectId) -> Result<(), LookupError> {
        let entry = self
            .objects
            .write()
            .await
            .remove(&id)
            .ok_or(LookupError::NotFound(id))?;
        let _pending = entry.lock().await;
        Ok(())
    }

    async fn contains(&self, id: ObjectId) -> bool {
        self.objects.read().await.contains_key(&id)
    }

    async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    async fn clear(&self) {
        self.objects.write().await.clear();
    }
}
