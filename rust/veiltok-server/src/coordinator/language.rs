use veiltok_core::{
    pointer::{kind, Pointer},
    text::{ConstructionError, OovPolicy, Tokenizer},
};

use crate::{
    coordinator::Coordinator,
    network::{Request, RequestError},
    storage::StoredObject,
};

/// A language pipeline owned by a coordinator.
///
/// The pipeline never tokenizes locally: it sends its tokenizer to the worker holding the text and
/// has the worker tokenize there.
#[derive(Debug, Clone)]
pub struct Language {
    owner: Coordinator,
    tokenizer: Tokenizer,
}

impl Language {
    /// Loads the pipeline of a built-in model for the `owner`.
    ///
    /// # Errors
    /// Fails if there is no built-in model with this name.
    pub fn load(name: &str, owner: &Coordinator, oov: OovPolicy) -> Result<Self, ConstructionError> {
        let tokenizer = Tokenizer::new(name, oov)?;
        info!("loaded language model {}", name);
        Ok(Self {
            owner: owner.clone(),
            tokenizer,
        })
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        self.tokenizer.model()
    }

    /// Gets the out-of-vocabulary policy.
    pub fn oov(&self) -> OovPolicy {
        self.tokenizer.oov()
    }

    /// Tokenizes a remote text on the worker holding it.
    ///
    /// Returns a pointer to the tokenized document, which is located on the same worker as the
    /// text. The tokenizer sent along is removed from the worker afterwards.
    ///
    /// # Errors
    /// Fails if the worker isn't reachable or the text doesn't exist there.
    pub async fn tokenize(
        &self,
        text: &Pointer<kind::Text>,
    ) -> Result<Pointer<kind::Document>, RequestError> {
        let location = text.location();
        let tokenizer = self
            .owner
            .send::<kind::Tokenizer>(StoredObject::Tokenizer(self.tokenizer.clone()), location)
            .await?;
        debug!("sent tokenizer {} for {}", tokenizer, text);

        let req = Request::Tokenize {
            text: text.clone(),
            tokenizer: tokenizer.clone(),
        };
        let tokenized = self.owner.network().request(location, req).await;
        // the tokenizer is only needed for this one document
        if let Err(error) = self.owner.remove(&tokenizer).await {
            warn!("failed to remove tokenizer {}: {}", tokenizer, error);
        }
        let id = tokenized?.into_stored()?;
        Ok(Pointer::new(self.owner.id().clone(), location.clone(), id))
    }
}
