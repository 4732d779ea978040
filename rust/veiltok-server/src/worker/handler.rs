use veiltok_core::pointer::{kind::PointerKind, Pointer};

use crate::{
    network::{Request, RequestError, Response, RoutingError},
    storage::{ObjectStorage, StoredObject},
    worker::WorkerContext,
};

/// A trait that must be implemented by a worker to handle a request.
#[async_trait]
pub trait Handler {
    /// Handles a request.
    ///
    /// # Errors
    /// Fails on lookup, routing, embedding and sharing errors.
    async fn handle_request(&self, req: Request) -> Result<Response, RequestError>;
}

#[async_trait]
impl<S: ObjectStorage> Handler for WorkerContext<S> {
    async fn handle_request(&self, req: Request) -> Result<Response, RequestError> {
        match req {
            Request::Put(object) => Ok(self.put(object).await),
            Request::Tokenize { text, tokenizer } => {
                let text = self.resolve(&text).await?.into_text()?;
                let tokenizer = self.resolve(&tokenizer).await?.into_tokenizer()?;
                let document = tokenizer.tokenize(&text);
                debug!(
                    "tokenized text into {} tokens with model {}",
                    document.len(),
                    tokenizer.model()
                );
                Ok(self.put(document.into()).await)
            }
            Request::Describe { id, kind } => {
                let object = self.store.get(id).await?;
                object.check_kind(kind)?;
                Ok(Response::Summary(object.summary()))
            }
            Request::Remove(id) => {
                self.store.remove(id).await?;
                Ok(Response::Done)
            }
            Request::Clear => {
                self.store.clear().await;
                info!("cleared the store of worker {}", self.id);
                Ok(Response::Done)
            }
            Request::ShareEmbedding(req) => self.share_embedding(req).await,
            Request::DealSeed(req) => self.deal_seed(req).await,
            Request::AddShares { first, second } => {
                let mut sum = self.store.get(first).await?.into_share()?;
                sum.add(self.store.get(second).await?.into_share()?)?;
                Ok(self.put(sum.into()).await)
            }
            #[cfg(any(test, feature = "testutils"))]
            Request::FetchShare(id) => self.fetch_share(id).await,
        }
    }
}

impl<S: ObjectStorage> WorkerContext<S> {
    async fn put(&self, object: StoredObject) -> Response {
        let kind = object.kind();
        let id = self.store.put(object).await;
        debug!("registered {} object {}", kind, id);
        Response::Stored(id)
    }

    #[cfg(any(test, feature = "testutils"))]
    async fn fetch_share(&self, id: veiltok_core::ObjectId) -> Result<Response, RequestError> {
        let share = self.store.get(id).await?.into_share()?;
        Ok(Response::Share(share))
    }

    /// Resolves a pointer to an object in this worker's store.
    ///
    /// # Errors
    /// Fails if the pointer is located on another worker, if the object doesn't exist or if it
    /// isn't of the pointer's kind.
    pub(super) async fn resolve<K: PointerKind>(
        &self,
        ptr: &Pointer<K>,
    ) -> Result<StoredObject, RequestError> {
        if !ptr.is_located_on(&self.id) {
            return Err(RoutingError::Misrouted {
                expected: ptr.location().clone(),
                actual: self.id.clone(),
            }
            .into());
        }
        let object = self.store.get(ptr.id()).await?;
        object.check_kind(K::KIND)?;
        Ok(object)
    }
}
