use tracing_subscriber::*;

use veiltok_core::{
    text::{OovPolicy, Tokenizer, Vocab, EN_CORE_WEB_LG},
    WorkerId,
};

pub const ME: &str = "me";
pub const DATA: &str = "bob";
pub const HOLDER_A: &str = "alice";
pub const HOLDER_B: &str = "theo";
pub const CRYPTO_PROVIDER: &str = "crypto_provider";

pub fn enable_logging() {
    let _fmt_subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(true)
        .try_init();
}

pub fn worker(name: &str) -> WorkerId {
    WorkerId::from(name)
}

/// Computes the mean embedding of a text locally.
pub fn mean_embedding(text: &str) -> Vec<f64> {
    Tokenizer::new(EN_CORE_WEB_LG, OovPolicy::Zero)
        .unwrap()
        .tokenize(text)
        .mean_vector()
        .unwrap()
}

/// Computes the token embeddings of a text locally.
pub fn token_embeddings(text: &str) -> Vec<Vec<f64>> {
    let vocab = Vocab::builtin(EN_CORE_WEB_LG).unwrap();
    Tokenizer::new(EN_CORE_WEB_LG, OovPolicy::Zero)
        .unwrap()
        .tokenize(text)
        .tokens()
        .map(|token| {
            vocab
                .vector(token, OovPolicy::Zero)
                .unwrap()
                .into_iter()
                .map(f64::from)
                .collect()
        })
        .collect()
}

/// Asserts that two vectors are equal up to the given absolute error per component.
pub fn assert_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "component {}: {} differs from {} by more than {}",
            i,
            a,
            e,
            tolerance
        );
    }
}
