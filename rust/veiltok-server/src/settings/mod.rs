//! Loading and validation of settings.
//!
//! Values defined in the configuration file can be overridden by environment variables. An
//! example configuration file can be found in the `configs/` directory located in the repository
//! root.

#[cfg(test)]
mod tests;

use std::{fmt, path::Path, time::Duration};

use config::{Config, ConfigError, Environment};
use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize,
};
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;
use validator::{Validate, ValidationError, ValidationErrors};

use veiltok_core::{
    share::{BoundType, ShareConfig, SummandType},
    text::OovPolicy,
    WorkerId,
};

#[derive(Error, Debug)]
/// An error related to loading and validation of settings.
pub enum SettingsError {
    #[error("configuration loading failed: {0}")]
    Loading(#[from] ConfigError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Validate, Deserialize)]
/// The combined settings.
///
/// Each section in the configuration file corresponds to the identically named settings field.
pub struct Settings {
    pub log: LoggingSettings,
    #[validate]
    pub network: NetworkSettings,
    pub pipeline: PipelineSettings,
    #[validate]
    pub sharing: SharingSettings,
    #[validate]
    pub workers: WorkerSettings,
}

impl Settings {
    /// Loads and validates the settings via a configuration file.
    ///
    /// # Errors
    /// Fails when the loading of the configuration file or its validation failed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings: Settings = Self::load(path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("veiltok")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Deserialize, Validate, Clone, Copy)]
/// Network settings.
pub struct NetworkSettings {
    /// The time a party waits for the response to a request, in milliseconds. The value must be
    /// greater or equal to `1`.
    ///
    /// Requests which involve further parties, like the sharing of an embedding, are bounded as a
    /// whole by this timeout.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [network]
    /// request_timeout = 5000
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_NETWORK__REQUEST_TIMEOUT=5000
    /// ```
    #[validate(range(min = 1))]
    pub request_timeout: u64,
}

impl NetworkSettings {
    /// Gets the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

#[derive(Debug, Deserialize, Clone)]
/// Language pipeline settings.
pub struct PipelineSettings {
    /// The name of the language model. The only built-in model is `en_core_web_lg`.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [pipeline]
    /// model = "en_core_web_lg"
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_PIPELINE__MODEL=en_core_web_lg
    /// ```
    pub model: String,

    /// The handling of tokens without a vector: `zero` embeds them as the zero vector, `fail`
    /// fails the embedding. Defaults to `zero`.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [pipeline]
    /// oov = "fail"
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_PIPELINE__OOV=fail
    /// ```
    #[serde(default)]
    pub oov: OovPolicy,
}

#[derive(Debug, Deserialize, Validate, Clone, Copy)]
/// Sharing settings.
///
/// The sharing configuration determines the fixed-point encoding of the embedding vectors and the
/// order of the finite group the shares live in.
pub struct SharingSettings {
    /// The bound of the shared values. Embedding vectors of the built-in models are bounded by
    /// `1`, so `B0` suffices unless vectors are summed up in plaintext before sharing.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [sharing]
    /// bound_type = "B0"
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_SHARING__BOUND_TYPE=B0
    /// ```
    pub bound_type: BoundType,

    /// The number of decimal places preserved by the encoding. The value must be at most `12`.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [sharing]
    /// precision = 10
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_SHARING__PRECISION=10
    /// ```
    #[validate(range(max = 12))]
    pub precision: u8,

    /// The maximal number of encrypted vectors that may be added up.
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [sharing]
    /// summand_type = "S3"
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_SHARING__SUMMAND_TYPE=S3
    /// ```
    pub summand_type: SummandType,
}

impl From<SharingSettings> for ShareConfig {
    fn from(settings: SharingSettings) -> Self {
        let SharingSettings {
            bound_type,
            precision,
            summand_type,
        } = settings;
        ShareConfig {
            bound_type,
            precision,
            summand_type,
        }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[validate(schema(function = "validate_workers"))]
/// The parties of the simulated network.
///
/// All names must be non-empty and pairwise distinct.
///
/// # Examples
///
/// **TOML**
/// ```text
/// [workers]
/// coordinator = "me"
/// data = "bob"
/// holders = ["alice", "theo"]
/// crypto_provider = "crypto_provider"
/// ```
///
/// **Environment variable**
/// ```text
/// VEILTOK_WORKERS__DATA=bob
/// ```
pub struct WorkerSettings {
    /// The name of the coordinator, which owns all pointers.
    pub coordinator: String,
    /// The worker which receives the text.
    pub data: String,
    /// The two workers which hold the shares of the embeddings.
    pub holders: [String; 2],
    /// The worker which deals the masks.
    pub crypto_provider: String,
}

impl WorkerSettings {
    /// Gets the names of all parties, the coordinator first.
    pub fn names(&self) -> [&str; 5] {
        [
            self.coordinator.as_str(),
            self.data.as_str(),
            self.holders[0].as_str(),
            self.holders[1].as_str(),
            self.crypto_provider.as_str(),
        ]
    }

    /// Gets the names of the workers to spawn, i.e. all parties except the coordinator.
    pub fn workers(&self) -> Vec<WorkerId> {
        self.names()[1..].iter().copied().map(WorkerId::from).collect()
    }

    /// Checks that all names are non-empty and pairwise distinct.
    pub(crate) fn validate_workers(&self) -> Result<(), ValidationError> {
        let names = self.names();
        if names.iter().any(|name| name.is_empty()) {
            return Err(ValidationError::new("empty worker name"));
        }
        for (i, name) in names.iter().enumerate() {
            if names[i + 1..].contains(name) {
                return Err(ValidationError::new("duplicate worker name"));
            }
        }
        Ok(())
    }
}

/// A wrapper for validate derive.
fn validate_workers(s: &WorkerSettings) -> Result<(), ValidationError> {
    s.validate_workers()
}

#[derive(Debug, Deserialize)]
/// Logging settings.
pub struct LoggingSettings {
    /// A comma-separated list of logging directives. More information about logging directives
    /// can be found [here].
    ///
    /// # Examples
    ///
    /// **TOML**
    /// ```text
    /// [log]
    /// filter = "info"
    /// ```
    ///
    /// **Environment variable**
    /// ```text
    /// VEILTOK_LOG__FILTER=info
    /// ```
    ///
    /// [here]: https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/filter/struct.EnvFilter.html#directives
    #[serde(deserialize_with = "deserialize_env_filter")]
    pub filter: EnvFilter,
}

fn deserialize_env_filter<'de, D>(deserializer: D) -> Result<EnvFilter, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnvFilterVisitor;

    impl<'de> Visitor<'de> for EnvFilterVisitor {
        type Value = EnvFilter;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a valid tracing filter directive: https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/filter/struct.EnvFilter.html#directives")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            EnvFilter::try_new(value)
                .map_err(|_| de::Error::invalid_value(serde::de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_str(EnvFilterVisitor)
}
