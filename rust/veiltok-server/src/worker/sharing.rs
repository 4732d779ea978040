//! Sharing of embeddings between two holders with a mask dealt by a crypto provider.
//!
//! For every vector `x` the worker holding the document asks the crypto provider to deal a mask
//! `m`. The crypto provider stores `m` on the first holder and returns the seed of `m` sealed to
//! the worker's public key. The worker derives `m` from the seed and stores `encode(x) - m` on the
//! second holder. The plaintext vector never leaves the worker.

use futures::future::join_all;
use num::bigint::BigUint;

use crate::{
    network::{
        DealSeedRequest,
        EmbeddingMode,
        Request,
        RequestError,
        Response,
        ShareEmbeddingRequest,
    },
    storage::{ObjectStorage, StoredObject},
    worker::WorkerContext,
};
use veiltok_core::{
    crypto::ByteObject,
    pointer::{kind, Pointer},
    share::{complement, encode, EncryptedShareSeed, ShareSeed},
    WorkerId,
};

impl ShareEmbeddingRequest {
    /// Checks that the holders are distinct and that the crypto provider is not a holder.
    ///
    /// # Errors
    /// Fails with [`RequestError::InvalidParties`] otherwise.
    pub fn check_parties(&self) -> Result<(), RequestError> {
        if self.holders[0] == self.holders[1] {
            return Err(RequestError::InvalidParties("the holders must be distinct"));
        }
        if self.holders.contains(&self.crypto_provider) {
            return Err(RequestError::InvalidParties(
                "the crypto provider must not be a holder",
            ));
        }
        Ok(())
    }
}

impl<S: ObjectStorage> WorkerContext<S> {
    pub(super) async fn share_embedding(
        &self,
        req: ShareEmbeddingRequest,
    ) -> Result<Response, RequestError> {
        req.check_parties()?;
        let document = self.resolve(&req.document).await?.into_document()?;
        let vectors: Vec<Vec<f64>> = match req.mode {
            EmbeddingMode::Mean => vec![document.mean_vector()?],
            EmbeddingMode::PerToken => document
                .token_vectors()?
                .into_iter()
                .map(|vector| vector.into_iter().map(f64::from).collect())
                .collect(),
        };
        debug!(
            "sharing {} vectors between {} and {}",
            vectors.len(),
            req.holders[0],
            req.holders[1]
        );
        let results = join_all(vectors.iter().map(|vector| self.share_vector(vector, &req))).await;
        let mut shares = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(pair) => shares.push(pair),
                Err(error) => failure = failure.or(Some(error)),
            }
        }
        if let Some(error) = failure {
            // a partial embedding is never returned
            for share in shares.iter().flatten() {
                self.discard(share).await;
            }
            return Err(error);
        }
        Ok(Response::Shared {
            len: vectors.first().map_or(0, Vec::len),
            shares,
        })
    }

    async fn share_vector(
        &self,
        vector: &[f64],
        req: &ShareEmbeddingRequest,
    ) -> Result<[Pointer<kind::Share>; 2], RequestError> {
        let [first_holder, second_holder] = &req.holders;
        let encoded = encode(&req.config, vector)?;

        let deal = DealSeedRequest {
            requester: self.id.clone(),
            holder: first_holder.clone(),
            len: encoded.len(),
            config: req.config,
            owner: req.owner.clone(),
        };
        let (sealed_seed, first) = self
            .network
            .request(&req.crypto_provider, Request::DealSeed(deal))
            .await?
            .into_dealt()?;
        if !first.is_located_on(first_holder) {
            self.discard(&first).await;
            return Err(RequestError::UnexpectedResponse(
                "a share located on the first holder",
            ));
        }

        match self
            .complete_share(sealed_seed, encoded, second_holder, req)
            .await
        {
            Ok(second) => Ok([first, second]),
            Err(error) => {
                self.discard(&first).await;
                Err(error)
            }
        }
    }

    /// Stores the complement of the dealt mask on the second holder.
    async fn complete_share(
        &self,
        sealed_seed: EncryptedShareSeed,
        encoded: Vec<BigUint>,
        second_holder: &WorkerId,
        req: &ShareEmbeddingRequest,
    ) -> Result<Pointer<kind::Share>, RequestError> {
        let seed = sealed_seed
            .decrypt(&self.keys.public, &self.keys.secret)
            .map_err(|_| RequestError::Decryption)?;
        let mask = seed.derive_mask(encoded.len(), req.config);
        let remainder = complement(&mask, encoded);
        let id = self
            .network
            .request(second_holder, Request::Put(StoredObject::Share(remainder)))
            .await?
            .into_stored()?;
        Ok(Pointer::new(req.owner.clone(), second_holder.clone(), id))
    }

    /// Removes a share which is left over from a failed sharing.
    async fn discard(&self, share: &Pointer<kind::Share>) {
        let removed = self
            .network
            .request(share.location(), Request::Remove(share.id()))
            .await
            .and_then(Response::into_done);
        if let Err(error) = removed {
            warn!(
                "failed to discard share {} on worker {}: {}",
                share.id(),
                share.location(),
                error
            );
        }
    }

    pub(super) async fn deal_seed(&self, req: DealSeedRequest) -> Result<Response, RequestError> {
        let public_key = self.network.public_key(&req.requester).await?;
        let seed = ShareSeed::generate();
        let mask = seed.derive_mask(req.len, req.config);
        let id = self
            .network
            .request(&req.holder, Request::Put(StoredObject::Share(mask)))
            .await?
            .into_stored()?;
        debug!("dealt a mask of length {} for {}", req.len, req.requester);
        Ok(Response::Dealt {
            seed: seed.encrypt(&public_key),
            share: Pointer::new(req.owner, req.holder, id),
        })
    }
}
