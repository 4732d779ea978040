#![cfg_attr(docsrs, feature(doc_cfg))]
//! `veiltok-server` runs the parties of a private tokenization network inside one process.
//!
//! # Parties
//! - **Workers** own an object store and execute requests on their own data. Each worker is an
//!   actor task that receives requests through a channel, see the [`worker`] module.
//! - The **network** routes requests from one party to the worker a pointer is located on and
//!   bounds every request by a timeout, see the [`network`] module.
//! - The **coordinator** owns a language pipeline. It sends text to workers and has them tokenize
//!   and embed it, but it only ever receives pointers, summaries and encrypted vectors, see the
//!   [`coordinator`] module.
//!
//! # Encrypted embeddings
//! The embedding of a document is computed on the worker that holds the document. The worker then
//! splits every vector into two additive shares which are stored on two *holder* workers: the
//! first share is a mask dealt by a *crypto provider*, the second share is the encoded vector
//! minus the mask. The crypto provider hands the seed of the mask to the worker sealed to its
//! public key, so neither the coordinator nor a single holder learns anything about the vector.
//!
//! # Example
//! ```no_run
//! # use std::time::Duration;
//! # use veiltok_core::{share::ShareConfig, text::OovPolicy, WorkerId};
//! # use veiltok_server::{coordinator::{Coordinator, Language}, network::Network, worker};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let network = Network::new(Duration::from_secs(5));
//! for name in &["bob", "alice", "theo", "crypto_provider"] {
//!     worker::spawn(WorkerId::from(*name), &network).await;
//! }
//! let me = Coordinator::new("me".into(), network, ShareConfig::default());
//! let nlp = Language::load("en_core_web_lg", &me, OovPolicy::Zero)?;
//!
//! let text = me.send_text("A string to tokenize", &"bob".into()).await?;
//! let doc = nlp.tokenize(&text).await?;
//! let vector = me
//!     .get_encrypted_vector(&doc, &"alice".into(), &"theo".into(), &"crypto_provider".into())
//!     .await?;
//! println!("{}\n{}", doc, vector);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate tracing;

pub mod coordinator;
pub mod network;
pub mod settings;
pub mod storage;
pub mod worker;

#[cfg(test)]
pub(crate) mod tests;
