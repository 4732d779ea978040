//! Routing of requests between the parties.
//!
//! The [`Network`] is a registry of the running workers: for every worker it keeps the sending
//! half of the worker's request channel and the worker's public encryption key. Every request is
//! sent to exactly one worker, traced in its own span and bounded by the configured timeout.

pub mod requests;

use std::{collections::HashMap, sync::Arc, time::Duration};

use displaydoc::Display;
use thiserror::Error;
use tokio::{sync::RwLock, time::timeout};
use uuid::Uuid;

use veiltok_core::{crypto::PublicEncryptKey, WorkerId};

pub use self::requests::{
    DealSeedRequest,
    EmbeddingMode,
    Request,
    RequestError,
    RequestReceiver,
    RequestSender,
    Response,
    ResponseSender,
    ShareEmbeddingRequest,
};

/// Errors related to the routing of requests.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// Worker {0} is not registered or has shut down.
    Unreachable(WorkerId),
    /// Worker {0} did not respond in time.
    Timeout(WorkerId),
    /// The object is located on worker {expected}, not on worker {actual}.
    Misrouted { expected: WorkerId, actual: WorkerId },
}

#[derive(Debug, Clone)]
struct Peer {
    sender: RequestSender,
    public_key: PublicEncryptKey,
}

/// A handle to the registry of running workers.
#[derive(Debug, Clone)]
pub struct Network {
    peers: Arc<RwLock<HashMap<WorkerId, Peer>>>,
    request_timeout: Duration,
}

impl Network {
    /// Creates an empty network whose requests time out after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            peers: Arc::new(RwLock::new(HashMap::new())),
            request_timeout,
        }
    }

    /// Gets the request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Registers a worker under the name of its request channel.
    ///
    /// A worker which is already registered under the same name is replaced.
    pub async fn register(&self, sender: RequestSender, public_key: PublicEncryptKey) {
        let id = sender.worker().clone();
        info!("registering worker {}", id);
        let peer = Peer { sender, public_key };
        if self.peers.write().await.insert(id.clone(), peer).is_some() {
            warn!("worker {} was already registered and has been replaced", id);
        }
    }

    /// Deregisters a worker. Returns whether the worker was registered.
    ///
    /// The worker shuts down once the last in-flight request to it has been answered.
    pub async fn deregister(&self, id: &WorkerId) -> bool {
        info!("deregistering worker {}", id);
        self.peers.write().await.remove(id).is_some()
    }

    /// Gets the names of all registered workers.
    pub async fn workers(&self) -> Vec<WorkerId> {
        let mut workers: Vec<WorkerId> = self.peers.read().await.keys().cloned().collect();
        workers.sort();
        workers
    }

    /// Gets the public encryption key of a worker.
    ///
    /// # Errors
    /// Fails if the worker isn't registered.
    pub async fn public_key(&self, id: &WorkerId) -> Result<PublicEncryptKey, RoutingError> {
        self.peer(id).await.map(|peer| peer.public_key)
    }

    async fn peer(&self, id: &WorkerId) -> Result<Peer, RoutingError> {
        self.peers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RoutingError::Unreachable(id.clone()))
    }

    /// Sends a request to a worker and waits for the response.
    ///
    /// # Errors
    /// Fails with a [`RoutingError`] if the worker isn't reachable or doesn't respond in time,
    /// otherwise forwards the worker's error.
    pub async fn request(&self, to: &WorkerId, req: Request) -> Result<Response, RequestError> {
        let span = error_span!("request", id = %Uuid::new_v4(), to = %to, kind = req.name());
        let peer = self.peer(to).await?;
        debug!(parent: &span, "sending request");
        timeout(self.request_timeout, peer.sender.request(req, span))
            .await
            .map_err(|_| {
                warn!("request to worker {} timed out", to);
                RoutingError::Timeout(to.clone())
            })?
    }

    /// Clears the store of a worker and deregisters it.
    ///
    /// # Errors
    /// Fails if the worker isn't reachable. The worker is deregistered in any case.
    pub async fn teardown(&self, id: &WorkerId) -> Result<(), RequestError> {
        let cleared = self.request(id, Request::Clear).await;
        self.deregister(id).await;
        cleared?.into_done()
    }

    /// Tears down all registered workers.
    ///
    /// Failures are logged, the remaining workers are torn down regardless.
    pub async fn shutdown(&self) {
        for id in self.workers().await {
            if let Err(error) = self.teardown(&id).await {
                warn!("failed to tear down worker {}: {}", id, error);
            }
        }
    }
}
