use veiltok_core::{
    pointer::{kind, Pointer},
    share::{BoundType, EncryptedVector, ShareConfig, ShareError, SummandType},
    text::OovPolicy,
};

use super::{
    utils::{
        assert_close,
        mean_embedding,
        token_embeddings,
        worker,
        CRYPTO_PROVIDER,
        DATA,
        HOLDER_A,
        HOLDER_B,
        ME,
    },
    NetworkBuilder,
    TestNetwork,
};
use crate::{
    coordinator::Coordinator,
    network::{Request, RequestError, RoutingError},
    storage::ObjectStorage,
};

const TEXT: &str = "A string to tokenize";
const TOLERANCE: f64 = 1e-9;

async fn tokenize(
    TestNetwork {
        coordinator,
        language,
        ..
    }: &TestNetwork,
    text: &str,
) -> Pointer<kind::Document> {
    let text = coordinator.send_text(text, &worker(DATA)).await.unwrap();
    language.tokenize(&text).await.unwrap()
}

async fn share_mean(
    coordinator: &Coordinator,
    document: &Pointer<kind::Document>,
) -> EncryptedVector {
    coordinator
        .get_encrypted_vector(
            document,
            &worker(HOLDER_A),
            &worker(HOLDER_B),
            &worker(CRYPTO_PROVIDER),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_encrypted_vector_reconstructs_to_mean_embedding() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;

    let vector = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker(HOLDER_A),
            &worker(HOLDER_B),
            &worker(CRYPTO_PROVIDER),
        )
        .await
        .unwrap();
    assert_eq!(vector.len(), 300);
    assert_eq!(vector.summands(), 1);
    assert_eq!(vector.crypto_provider(), &worker(CRYPTO_PROVIDER));
    assert_eq!(vector.holders(), (&worker(HOLDER_A), &worker(HOLDER_B)));
    for share in vector.shares() {
        assert_eq!(share.owner(), &worker(ME));
    }

    let values = net.coordinator.reconstruct(&vector).await.unwrap();
    assert_close(&values, &mean_embedding(TEXT), TOLERANCE);
}

#[tokio::test]
async fn test_encrypted_token_vectors_reconstruct_to_token_embeddings() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;

    let vectors = net
        .coordinator
        .get_encrypted_token_vectors(
            &document,
            &worker(HOLDER_A),
            &worker(HOLDER_B),
            &worker(CRYPTO_PROVIDER),
        )
        .await
        .unwrap();
    let expected = token_embeddings(TEXT);
    assert_eq!(vectors.len(), 4);
    assert_eq!(expected.len(), 4);
    for (vector, expected) in vectors.iter().zip(&expected) {
        assert_eq!(vector.len(), 300);
        let values = net.coordinator.reconstruct(vector).await.unwrap();
        assert_close(&values, expected, TOLERANCE);
    }
}

#[tokio::test]
async fn test_single_share_is_not_the_embedding() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;
    let vector = share_mean(&net.coordinator, &document).await;

    let [a, b] = vector.shares();
    assert_eq!(a.location(), &worker(HOLDER_A));
    assert_eq!(b.location(), &worker(HOLDER_B));
    let share_a = net
        .network
        .request(a.location(), Request::FetchShare(a.id()))
        .await
        .unwrap()
        .into_share()
        .unwrap();
    let share_b = net
        .network
        .request(b.location(), Request::FetchShare(b.id()))
        .await
        .unwrap()
        .into_share()
        .unwrap();
    assert_eq!(share_a.len(), 300);
    assert_ne!(share_a.data(), share_b.data());

    // the data worker keeps no share
    assert!(matches!(
        net.network
            .request(&worker(DATA), Request::FetchShare(a.id()))
            .await,
        Err(RequestError::Lookup(_))
    ));
}

#[tokio::test]
async fn test_add_encrypted_vectors() {
    let net = NetworkBuilder::new().build().await;
    let first = tokenize(&net, TEXT).await;
    let second = tokenize(&net, "Another string").await;
    let first = share_mean(&net.coordinator, &first).await;
    let second = share_mean(&net.coordinator, &second).await;

    let sum = net.coordinator.add_encrypted(&first, &second).await.unwrap();
    assert_eq!(sum.summands(), 2);
    assert_eq!(sum.len(), 300);

    let expected: Vec<f64> = mean_embedding(TEXT)
        .iter()
        .zip(mean_embedding("Another string"))
        .map(|(a, b)| a + b)
        .collect();
    let values = net.coordinator.reconstruct(&sum).await.unwrap();
    assert_close(&values, &expected, 2.0 * TOLERANCE);
}

#[tokio::test]
async fn test_add_incompatible_encrypted_vectors() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;
    let mean = share_mean(&net.coordinator, &document).await;

    let swapped = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker(HOLDER_B),
            &worker(HOLDER_A),
            &worker(CRYPTO_PROVIDER),
        )
        .await
        .unwrap();
    assert!(matches!(
        net.coordinator.add_encrypted(&mean, &swapped).await,
        Err(RequestError::InvalidParties(_))
    ));

    let config = ShareConfig::new(BoundType::B2, 6, SummandType::S3).unwrap();
    let other = Coordinator::new(worker(ME), net.network.clone(), config);
    let coarse = share_mean(&other, &document).await;
    assert!(matches!(
        net.coordinator.add_encrypted(&mean, &coarse).await,
        Err(RequestError::Sharing(ShareError::ConfigMismatch))
    ));

    // only the summand count of a vector matters for the limit
    let full = EncryptedVector::new(
        mean.len(),
        mean.config(),
        mean.config().max_summands(),
        mean.crypto_provider().clone(),
        mean.shares().clone(),
    );
    assert!(matches!(
        net.coordinator.add_encrypted(&full, &mean).await,
        Err(RequestError::Sharing(ShareError::TooManySummands(1001, 1000)))
    ));
}

#[tokio::test]
async fn test_invalid_parties() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;

    let same_holders = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker(HOLDER_A),
            &worker(HOLDER_A),
            &worker(CRYPTO_PROVIDER),
        )
        .await;
    assert!(matches!(same_holders, Err(RequestError::InvalidParties(_))));

    let provider_holds = net
        .coordinator
        .get_encrypted_token_vectors(
            &document,
            &worker(HOLDER_A),
            &worker(CRYPTO_PROVIDER),
            &worker(CRYPTO_PROVIDER),
        )
        .await;
    assert!(matches!(provider_holds, Err(RequestError::InvalidParties(_))));
}

#[tokio::test]
async fn test_out_of_vocabulary_token() {
    let text = "A zyzzyva to tokenize";

    // zero policy: the unknown token contributes a zero vector
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, text).await;
    let vector = share_mean(&net.coordinator, &document).await;
    let values = net.coordinator.reconstruct(&vector).await.unwrap();
    assert_close(&values, &mean_embedding(text), TOLERANCE);

    let net = NetworkBuilder::new().with_oov(OovPolicy::Fail).build().await;
    let document = tokenize(&net, text).await;
    let result = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker(HOLDER_A),
            &worker(HOLDER_B),
            &worker(CRYPTO_PROVIDER),
        )
        .await;
    assert!(matches!(
        result,
        Err(RequestError::VocabularyMiss(miss)) if miss.token == "zyzzyva"
    ));
}

#[tokio::test]
async fn test_empty_document() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, "   ").await;
    let (a, b, p) = (worker(HOLDER_A), worker(HOLDER_B), worker(CRYPTO_PROVIDER));

    assert!(matches!(
        net.coordinator.get_encrypted_vector(&document, &a, &b, &p).await,
        Err(RequestError::EmptyDocument)
    ));
    let vectors = net
        .coordinator
        .get_encrypted_token_vectors(&document, &a, &b, &p)
        .await
        .unwrap();
    assert!(vectors.is_empty());
}

#[tokio::test]
async fn test_unreachable_holder() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;

    let result = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker(HOLDER_A),
            &worker("nobody"),
            &worker(CRYPTO_PROVIDER),
        )
        .await;
    assert!(matches!(
        result,
        Err(RequestError::Routing(RoutingError::Unreachable(id))) if id == worker("nobody")
    ));
}

#[tokio::test]
async fn test_shares_with_an_extra_worker() {
    let net = NetworkBuilder::new().with_worker("zoe").build().await;
    let document = tokenize(&net, TEXT).await;

    let vector = net
        .coordinator
        .get_encrypted_vector(
            &document,
            &worker("zoe"),
            &worker(HOLDER_B),
            &worker(CRYPTO_PROVIDER),
        )
        .await
        .unwrap();
    assert_eq!(vector.holders(), (&worker("zoe"), &worker(HOLDER_B)));
    let values = net.coordinator.reconstruct(&vector).await.unwrap();
    assert_close(&values, &mean_embedding(TEXT), TOLERANCE);
}

#[tokio::test]
async fn test_failed_sharing_leaves_no_shares() {
    let net = NetworkBuilder::new().build().await;
    let document = tokenize(&net, TEXT).await;

    let result = net
        .coordinator
        .get_encrypted_token_vectors(
            &document,
            &worker(HOLDER_A),
            &worker("nobody"),
            &worker(CRYPTO_PROVIDER),
        )
        .await;
    assert!(matches!(
        result,
        Err(RequestError::Routing(RoutingError::Unreachable(_)))
    ));
    assert_eq!(net.store(HOLDER_A).len().await, 0);
    assert_eq!(net.store(CRYPTO_PROVIDER).len().await, 0);

    // a later sharing between reachable holders is unaffected
    let vector = share_mean(&net.coordinator, &document).await;
    assert_eq!(net.store(HOLDER_A).len().await, 1);
    assert_eq!(net.store(HOLDER_B).len().await, 1);
    let values = net.coordinator.reconstruct(&vector).await.unwrap();
    assert_close(&values, &mean_embedding(TEXT), TOLERANCE);
}
