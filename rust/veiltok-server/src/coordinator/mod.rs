//! The coordinator: the party that drives tokenization and embedding without seeing any text.
//!
//! A [`Coordinator`] only ever holds pointers to remote objects. What it may learn about them is
//! limited to an [`ObjectSummary`] (kind and length), the token count of a document and the
//! [`EncryptedVector`]s of a document's embedding, whose shares stay on the holders.
//!
//! [`ObjectSummary`]: crate::storage::ObjectSummary

mod language;

use futures::future::try_join;

use crate::{
    network::{
        EmbeddingMode,
        Network,
        Request,
        RequestError,
        ShareEmbeddingRequest,
    },
    storage::{ObjectSummary, StoredObject},
};
use veiltok_core::{
    pointer::{
        kind::{self, PointerKind},
        Pointer,
    },
    share::{EncryptedVector, ShareConfig, ShareError},
    WorkerId,
};

pub use self::language::Language;

/// A handle for a coordinator.
#[derive(Debug, Clone)]
pub struct Coordinator {
    id: WorkerId,
    network: Network,
    config: ShareConfig,
}

impl Coordinator {
    /// Creates a coordinator which shares embeddings wrt the sharing `config`uration.
    pub fn new(id: WorkerId, network: Network, config: ShareConfig) -> Self {
        Self {
            id,
            network,
            config,
        }
    }

    /// Gets the name of the coordinator, which owns all the pointers it creates.
    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Gets the network of the coordinator.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Gets the sharing configuration.
    pub fn config(&self) -> ShareConfig {
        self.config
    }

    /// Sends a text to a worker.
    ///
    /// # Errors
    /// Fails if the worker isn't reachable.
    pub async fn send_text(
        &self,
        text: impl Into<String>,
        to: &WorkerId,
    ) -> Result<Pointer<kind::Text>, RequestError> {
        self.send(StoredObject::Text(text.into()), to).await
    }

    /// Registers an object in the store of a worker.
    pub(crate) async fn send<K: PointerKind>(
        &self,
        object: StoredObject,
        to: &WorkerId,
    ) -> Result<Pointer<K>, RequestError> {
        object.check_kind(K::KIND)?;
        let id = self
            .network
            .request(to, Request::Put(object))
            .await?
            .into_stored()?;
        Ok(Pointer::new(self.id.clone(), to.clone(), id))
    }

    /// Summarizes a remote object.
    ///
    /// # Errors
    /// Fails if the worker isn't reachable, the object doesn't exist or isn't of the pointer's
    /// kind.
    pub async fn describe<K: PointerKind>(
        &self,
        ptr: &Pointer<K>,
    ) -> Result<ObjectSummary, RequestError> {
        let req = Request::Describe {
            id: ptr.id(),
            kind: K::KIND,
        };
        self.network
            .request(ptr.location(), req)
            .await?
            .into_summary()
    }

    /// Gets the number of tokens of a remote document.
    ///
    /// # Errors
    /// Fails if [`describe()`] fails.
    ///
    /// [`describe()`]: Coordinator::describe
    pub async fn token_count(
        &self,
        document: &Pointer<kind::Document>,
    ) -> Result<usize, RequestError> {
        self.describe(document).await.map(|summary| summary.len)
    }

    /// Removes a remote object.
    ///
    /// # Errors
    /// Fails if the worker isn't reachable or the object doesn't exist.
    pub async fn remove<K: PointerKind>(&self, ptr: &Pointer<K>) -> Result<(), RequestError> {
        self.network
            .request(ptr.location(), Request::Remove(ptr.id()))
            .await?
            .into_done()
    }

    /// Gets the mean embedding of a remote document as an encrypted vector.
    ///
    /// The embedding is computed on the document's worker and shared between `holder_a` and
    /// `holder_b` with a mask dealt by the `crypto_provider`.
    ///
    /// # Errors
    /// Fails if the parties are invalid, any party isn't reachable, the document is empty or has a
    /// token which is out of vocabulary under the [`Fail`] policy.
    ///
    /// [`Fail`]: veiltok_core::text::OovPolicy::Fail
    pub async fn get_encrypted_vector(
        &self,
        document: &Pointer<kind::Document>,
        holder_a: &WorkerId,
        holder_b: &WorkerId,
        crypto_provider: &WorkerId,
    ) -> Result<EncryptedVector, RequestError> {
        let mut vectors = self
            .share_embedding(
                document,
                EmbeddingMode::Mean,
                holder_a,
                holder_b,
                crypto_provider,
            )
            .await?;
        vectors
            .pop()
            .ok_or(RequestError::UnexpectedResponse("exactly one shared vector"))
    }

    /// Gets the embeddings of all tokens of a remote document as encrypted vectors.
    ///
    /// # Errors
    /// Fails like [`get_encrypted_vector()`], except that an empty document yields no vectors.
    ///
    /// [`get_encrypted_vector()`]: Coordinator::get_encrypted_vector
    pub async fn get_encrypted_token_vectors(
        &self,
        document: &Pointer<kind::Document>,
        holder_a: &WorkerId,
        holder_b: &WorkerId,
        crypto_provider: &WorkerId,
    ) -> Result<Vec<EncryptedVector>, RequestError> {
        self.share_embedding(
            document,
            EmbeddingMode::PerToken,
            holder_a,
            holder_b,
            crypto_provider,
        )
        .await
    }

    async fn share_embedding(
        &self,
        document: &Pointer<kind::Document>,
        mode: EmbeddingMode,
        holder_a: &WorkerId,
        holder_b: &WorkerId,
        crypto_provider: &WorkerId,
    ) -> Result<Vec<EncryptedVector>, RequestError> {
        let req = ShareEmbeddingRequest {
            document: document.clone(),
            mode,
            holders: [holder_a.clone(), holder_b.clone()],
            crypto_provider: crypto_provider.clone(),
            config: self.config,
            owner: self.id.clone(),
        };
        req.check_parties()?;
        let (len, shares) = self
            .network
            .request(document.location(), Request::ShareEmbedding(req))
            .await?
            .into_shared()?;
        info!("received {} encrypted vectors of length {}", shares.len(), len);
        Ok(shares
            .into_iter()
            .map(|shares| {
                EncryptedVector::new(len, self.config, 1, crypto_provider.clone(), shares)
            })
            .collect())
    }

    /// Adds two encrypted vectors on their holders.
    ///
    /// Each holder adds its two shares locally, so the sum stays secret-shared between the same
    /// holders.
    ///
    /// # Errors
    /// Fails if the vectors are held by different holders, if their lengths or configurations
    /// differ, if the sum has too many summands or if a holder isn't reachable.
    pub async fn add_encrypted(
        &self,
        first: &EncryptedVector,
        second: &EncryptedVector,
    ) -> Result<EncryptedVector, RequestError> {
        if first.holders() != second.holders() {
            return Err(RequestError::InvalidParties(
                "encrypted vectors on different holders can't be added",
            ));
        }
        if first.config() != second.config() {
            return Err(ShareError::ConfigMismatch.into());
        }
        if first.len() != second.len() {
            return Err(ShareError::LengthMismatch(first.len(), second.len()).into());
        }
        let summands = first.summands() + second.summands();
        if summands > first.config().max_summands() {
            let max = first.config().max_summands();
            return Err(ShareError::TooManySummands(summands, max).into());
        }

        let (a, b) = (first.shares(), second.shares());
        let (share_a, share_b) =
            try_join(self.add_shares(&a[0], &b[0]), self.add_shares(&a[1], &b[1])).await?;
        Ok(EncryptedVector::new(
            first.len(),
            first.config(),
            summands,
            first.crypto_provider().clone(),
            [share_a, share_b],
        ))
    }

    async fn add_shares(
        &self,
        first: &Pointer<kind::Share>,
        second: &Pointer<kind::Share>,
    ) -> Result<Pointer<kind::Share>, RequestError> {
        let req = Request::AddShares {
            first: first.id(),
            second: second.id(),
        };
        let id = self
            .network
            .request(first.location(), req)
            .await?
            .into_stored()?;
        Ok(Pointer::new(self.id.clone(), first.location().clone(), id))
    }

    /// Reconstructs an encrypted vector by fetching both shares.
    ///
    /// This defeats the purpose of sharing and is reserved for tests and debugging.
    ///
    /// # Errors
    /// Fails if a holder isn't reachable or the shares are incompatible.
    #[cfg(any(test, feature = "testutils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "testutils")))]
    pub async fn reconstruct(&self, vector: &EncryptedVector) -> Result<Vec<f64>, RequestError> {
        let [a, b] = vector.shares();
        let (share_a, share_b) = try_join(
            self.network
                .request(a.location(), Request::FetchShare(a.id())),
            self.network
                .request(b.location(), Request::FetchShare(b.id())),
        )
        .await?;
        let values =
            veiltok_core::share::reconstruct(&share_a.into_share()?, &share_b.into_share()?)?;
        Ok(values)
    }
}
