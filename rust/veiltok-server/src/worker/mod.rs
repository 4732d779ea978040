//! Workers: actors which own an object store and execute requests on their own data.
//!
//! A [`Worker`] receives requests through its [`RequestReceiver`] and handles every request on
//! its own task, instrumented with the span the request was sent with. Requests which touch
//! different objects therefore proceed concurrently, while accesses to the same object are
//! serialized by the store.
//!
//! Every worker has an encryption key pair. Its public key is registered in the [`Network`] next
//! to its request channel, so that crypto providers can seal the mask seeds they deal to it.

mod handler;
mod sharing;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing_futures::Instrument;

use crate::{
    network::{Network, RequestReceiver, RequestSender},
    storage::{MemoryStore, ObjectStorage},
};
use veiltok_core::{
    crypto::{EncryptKeyPair, PublicEncryptKey},
    WorkerId,
};

pub use self::handler::Handler;

/// The state shared by all request handling tasks of a worker.
pub struct WorkerContext<S> {
    id: WorkerId,
    store: S,
    network: Network,
    keys: EncryptKeyPair,
}

impl<S: ObjectStorage> WorkerContext<S> {
    /// Gets the name of the worker.
    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Gets the object store of the worker.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// A worker.
pub struct Worker<S> {
    context: Arc<WorkerContext<S>>,
    requests: RequestReceiver,
}

impl<S: ObjectStorage> Worker<S> {
    /// Creates a worker with a fresh key pair and returns it together with the sending half of
    /// its request channel.
    pub fn new(id: WorkerId, store: S, network: Network) -> (Self, RequestSender) {
        let (requests, sender) = RequestReceiver::new(id.clone());
        let context = WorkerContext {
            id,
            store,
            network,
            keys: EncryptKeyPair::generate(),
        };
        let worker = Self {
            context: Arc::new(context),
            requests,
        };
        (worker, sender)
    }

    /// Gets the name of the worker.
    pub fn id(&self) -> &WorkerId {
        &self.context.id
    }

    /// Gets the public encryption key of the worker.
    pub fn public_key(&self) -> PublicEncryptKey {
        self.context.keys.public
    }

    /// Handles requests until every sending half of the request channel has been dropped.
    pub async fn run(mut self) {
        info!("worker {} is running", self.context.id);
        while let Some((req, span, resp_tx)) = self.requests.recv().await {
            let context = self.context.clone();
            tokio::spawn(
                async move {
                    let name = req.name();
                    debug!("handling {} request", name);
                    let response = context.handle_request(req).await;
                    if let Err(ref error) = response {
                        warn!("{} request failed: {}", name, error);
                    }
                    // the requester may have timed out in the meantime
                    if resp_tx.send(response).is_err() {
                        debug!("the response to the {} request was dropped", name);
                    }
                }
                .instrument(span),
            );
        }
        info!("worker {} shut down", self.context.id);
    }
}

/// Spawns a worker with an in-memory store and registers it in the network.
pub async fn spawn(id: WorkerId, network: &Network) -> JoinHandle<()> {
    spawn_with_store(id, MemoryStore::new(), network).await
}

/// Spawns a worker with the given store and registers it in the network.
pub async fn spawn_with_store<S: ObjectStorage>(
    id: WorkerId,
    store: S,
    network: &Network,
) -> JoinHandle<()> {
    let (worker, sender) = Worker::new(id, store, network.clone());
    network.register(sender, worker.public_key()).await;
    tokio::spawn(worker.run())
}
