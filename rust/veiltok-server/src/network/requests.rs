//! This module provides the `Request`, `Response`, `RequestSender` and `RequestReceiver` types.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use displaydoc::Display;
use futures::Stream;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::Span;

use crate::{
    network::RoutingError,
    storage::{LookupError, ObjectSummary, StoredObject},
};
use veiltok_core::{
    pointer::{kind, Pointer},
    share::{EncryptedShareSeed, ShareConfig, ShareError},
    text::{ConstructionError, EmbeddingError, VocabularyMiss},
    ObjectId,
    ObjectKind,
    WorkerId,
};

/// Errors which can occur while a worker handles a request.
#[derive(Debug, Display, Error)]
pub enum RequestError {
    /// Lookup failed: {0}.
    Lookup(#[from] LookupError),
    /// Routing failed: {0}.
    Routing(#[from] RoutingError),
    /// The language pipeline could not be constructed: {0}.
    Construction(#[from] ConstructionError),
    /// Embedding failed: {0}.
    VocabularyMiss(#[from] VocabularyMiss),
    /// Embedding failed: the document has no tokens.
    EmptyDocument,
    /// Sharing failed: {0}.
    Sharing(#[from] ShareError),
    /// Invalid parties: {0}.
    InvalidParties(&'static str),
    /// The share seed dealt by the crypto provider could not be decrypted.
    Decryption,
    /// Unexpected response: expected {0}.
    UnexpectedResponse(&'static str),
    /// The request could not be processed due to an internal error: {0}.
    InternalError(&'static str),
}

impl From<EmbeddingError> for RequestError {
    fn from(error: EmbeddingError) -> Self {
        match error {
            EmbeddingError::Construction(error) => Self::Construction(error),
            EmbeddingError::VocabularyMiss(error) => Self::VocabularyMiss(error),
            EmbeddingError::EmptyDocument => Self::EmptyDocument,
        }
    }
}

/// How a document is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// One vector: the mean of the token vectors.
    Mean,
    /// One vector per token.
    PerToken,
}

/// A request to embed a document and to share the embedding between two holders.
#[derive(Debug, Clone)]
pub struct ShareEmbeddingRequest {
    /// The document to embed.
    pub document: Pointer<kind::Document>,
    /// The embedding mode.
    pub mode: EmbeddingMode,
    /// The workers which hold the two shares of every vector.
    pub holders: [WorkerId; 2],
    /// The worker which deals the masks.
    pub crypto_provider: WorkerId,
    /// The sharing configuration.
    pub config: ShareConfig,
    /// The owner of the returned share pointers.
    pub owner: WorkerId,
}

/// A request to a crypto provider to deal the mask for one vector.
#[derive(Debug, Clone)]
pub struct DealSeedRequest {
    /// The worker which shares the vector and receives the sealed seed.
    pub requester: WorkerId,
    /// The worker which receives the mask as its share.
    pub holder: WorkerId,
    /// The length of the vector.
    pub len: usize,
    /// The sharing configuration.
    pub config: ShareConfig,
    /// The owner of the returned share pointer.
    pub owner: WorkerId,
}

/// A request to a worker.
///
/// Shares never leave their holder, except in tests and with the `testutils` feature:
#[cfg_attr(not(feature = "testutils"), doc = "```compile_fail")]
#[cfg_attr(feature = "testutils", doc = "```")]
/// # use veiltok_core::ObjectId;
/// # use veiltok_server::network::Request;
/// let fetch = Request::FetchShare(ObjectId::from(1));
/// ```
#[derive(Debug, Clone)]
pub enum Request {
    /// Register an object in the store.
    Put(StoredObject),
    /// Tokenize a text with a tokenizer and register the document.
    Tokenize {
        text: Pointer<kind::Text>,
        tokenizer: Pointer<kind::Tokenizer>,
    },
    /// Summarize an object of the given kind.
    Describe { id: ObjectId, kind: ObjectKind },
    /// Remove an object from the store.
    Remove(ObjectId),
    /// Remove all objects from the store.
    Clear,
    /// Embed a document and share the embedding.
    ShareEmbedding(ShareEmbeddingRequest),
    /// Deal a mask.
    DealSeed(DealSeedRequest),
    /// Add two shares and register the sum.
    AddShares { first: ObjectId, second: ObjectId },
    /// Get a copy of a share.
    #[cfg(any(test, feature = "testutils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "testutils")))]
    FetchShare(ObjectId),
}

impl Request {
    /// Gets a short name of the request for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Put(_) => "put",
            Self::Tokenize { .. } => "tokenize",
            Self::Describe { .. } => "describe",
            Self::Remove(_) => "remove",
            Self::Clear => "clear",
            Self::ShareEmbedding(_) => "share_embedding",
            Self::DealSeed(_) => "deal_seed",
            Self::AddShares { .. } => "add_shares",
            #[cfg(any(test, feature = "testutils"))]
            Self::FetchShare(_) => "fetch_share",
        }
    }
}

/// A response of a worker.
#[derive(Debug, Clone)]
pub enum Response {
    /// An object was registered under this id.
    Stored(ObjectId),
    /// A summary of an object.
    Summary(ObjectSummary),
    /// The request was executed.
    Done,
    /// A dealt mask: the seed sealed to the requester and the pointer to the holder's share.
    Dealt {
        seed: EncryptedShareSeed,
        share: Pointer<kind::Share>,
    },
    /// The length of the shared vectors and their share pointers, in holder order.
    Shared {
        len: usize,
        shares: Vec<[Pointer<kind::Share>; 2]>,
    },
    /// A copy of a share.
    #[cfg(any(test, feature = "testutils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "testutils")))]
    Share(veiltok_core::share::ShareVect),
}

impl Response {
    pub fn into_stored(self) -> Result<ObjectId, RequestError> {
        match self {
            Self::Stored(id) => Ok(id),
            _ => Err(RequestError::UnexpectedResponse("a stored object id")),
        }
    }

    pub fn into_summary(self) -> Result<ObjectSummary, RequestError> {
        match self {
            Self::Summary(summary) => Ok(summary),
            _ => Err(RequestError::UnexpectedResponse("an object summary")),
        }
    }

    pub fn into_done(self) -> Result<(), RequestError> {
        match self {
            Self::Done => Ok(()),
            _ => Err(RequestError::UnexpectedResponse("an acknowledgement")),
        }
    }

    pub fn into_dealt(self) -> Result<(EncryptedShareSeed, Pointer<kind::Share>), RequestError> {
        match self {
            Self::Dealt { seed, share } => Ok((seed, share)),
            _ => Err(RequestError::UnexpectedResponse("a dealt mask")),
        }
    }

    #[allow(clippy::type_complexity)]
    pub fn into_shared(self) -> Result<(usize, Vec<[Pointer<kind::Share>; 2]>), RequestError> {
        match self {
            Self::Shared { len, shares } => Ok((len, shares)),
            _ => Err(RequestError::UnexpectedResponse("share pointers")),
        }
    }

    #[cfg(any(test, feature = "testutils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "testutils")))]
    pub fn into_share(self) -> Result<veiltok_core::share::ShareVect, RequestError> {
        match self {
            Self::Share(share) => Ok(share),
            _ => Err(RequestError::UnexpectedResponse("a share")),
        }
    }
}

/// A channel for a worker to send the response to a [`Request`].
pub type ResponseSender = oneshot::Sender<Result<Response, RequestError>>;

/// A handle to send requests to a worker.
#[derive(Clone, Debug)]
pub struct RequestSender {
    worker: WorkerId,
    tx: mpsc::UnboundedSender<(Request, Span, ResponseSender)>,
}

impl RequestSender {
    /// Gets the worker this handle sends to.
    pub fn worker(&self) -> &WorkerId {
        &self.worker
    }

    /// Sends a request to the worker and waits for the response.
    ///
    /// # Errors
    /// Fails with [`RoutingError::Unreachable`] if the worker has already shut down and the
    /// request channel has been closed as a result, otherwise forwards the worker's error.
    pub async fn request(&self, req: Request, span: Span) -> Result<Response, RequestError> {
        let (resp_tx, resp_rx) = oneshot::channel::<Result<Response, RequestError>>();
        self.tx
            .send((req, span, resp_tx))
            .map_err(|_| RoutingError::Unreachable(self.worker.clone()))?;
        resp_rx
            .await
            .map_err(|_| RoutingError::Unreachable(self.worker.clone()))?
    }
}

/// The receiver half of the request channel that is used by a worker to receive requests.
#[derive(Debug)]
pub struct RequestReceiver(mpsc::UnboundedReceiver<(Request, Span, ResponseSender)>);

impl Stream for RequestReceiver {
    type Item = (Request, Span, ResponseSender);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        trace!("RequestReceiver: polling");
        Pin::new(&mut self.get_mut().0).poll_recv(cx)
    }
}

impl RequestReceiver {
    /// Creates a new request channel for a worker and returns the [`RequestReceiver`] as well as
    /// the [`RequestSender`] half.
    pub fn new(worker: WorkerId) -> (Self, RequestSender) {
        let (tx, rx) = mpsc::unbounded_channel::<(Request, Span, ResponseSender)>();
        (Self(rx), RequestSender { worker, tx })
    }

    /// Closes the request channel.
    /// See [the `tokio` documentation][close] for more information.
    ///
    /// [close]: https://docs.rs/tokio/1/tokio/sync/mpsc/struct.UnboundedReceiver.html#method.close
    pub fn close(&mut self) {
        self.0.close()
    }

    /// Receives the next request.
    /// See [the `tokio` documentation][receive] for more information.
    ///
    /// [receive]: https://docs.rs/tokio/1/tokio/sync/mpsc/struct.UnboundedReceiver.html#method.recv
    pub async fn recv(&mut self) -> Option<(Request, Span, ResponseSender)> {
        self.0.recv().await
    }
}
