use veiltok_core::{
    pointer::{kind, Pointer},
    text::{ConstructionError, OovPolicy},
    ObjectKind,
};

use super::{
    utils::{worker, DATA, HOLDER_A, ME},
    NetworkBuilder,
    TestNetwork,
};
use crate::{
    coordinator::Language,
    network::{Request, RequestError, RoutingError},
    storage::{LookupError, ObjectStorage},
};

#[tokio::test]
async fn test_document_is_located_on_the_worker_of_the_text() {
    let TestNetwork {
        coordinator,
        language,
        ..
    } = NetworkBuilder::new().build().await;

    for name in &[DATA, HOLDER_A] {
        let text = coordinator
            .send_text("A string to tokenize", &worker(name))
            .await
            .unwrap();
        let document = language.tokenize(&text).await.unwrap();
        assert_eq!(document.location(), &worker(name));
        assert_eq!(document.owner(), &worker(ME));
        assert_eq!(document.location(), text.location());
    }
}

#[tokio::test]
async fn test_coordinator_learns_summaries_only() {
    let TestNetwork {
        coordinator,
        language,
        ..
    } = NetworkBuilder::new().build().await;

    let text = coordinator
        .send_text("A string to tokenize", &worker(DATA))
        .await
        .unwrap();
    let summary = coordinator.describe(&text).await.unwrap();
    assert_eq!(summary.kind, ObjectKind::Text);
    assert_eq!(summary.len, 20);

    let document = language.tokenize(&text).await.unwrap();
    assert_eq!(coordinator.token_count(&document).await.unwrap(), 4);
    assert_eq!(
        document.to_string(),
        format!("[DocumentPointer | me -> bob:{}]", document.id())
    );

    // a pointer of the wrong kind doesn't resolve
    let disguised = Pointer::<kind::Document>::new(worker(ME), worker(DATA), text.id());
    assert!(matches!(
        coordinator.describe(&disguised).await,
        Err(RequestError::Lookup(LookupError::KindMismatch {
            expected: ObjectKind::Document,
            actual: ObjectKind::Text,
        }))
    ));
}

#[tokio::test]
async fn test_punctuation_and_empty_text() {
    let TestNetwork {
        coordinator,
        language,
        ..
    } = NetworkBuilder::new().build().await;

    let text = coordinator
        .send_text("Hello, world! (Don't panic.)", &worker(DATA))
        .await
        .unwrap();
    let document = language.tokenize(&text).await.unwrap();
    // Hello , world ! ( Don't panic . )
    assert_eq!(coordinator.token_count(&document).await.unwrap(), 9);

    let empty = coordinator.send_text("", &worker(DATA)).await.unwrap();
    let document = language.tokenize(&empty).await.unwrap();
    assert_eq!(coordinator.token_count(&document).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_model() {
    let TestNetwork { coordinator, .. } = NetworkBuilder::new().build().await;
    assert_eq!(
        Language::load("en_core_web_xl", &coordinator, OovPolicy::Zero).unwrap_err(),
        ConstructionError::UnknownModel("en_core_web_xl".into())
    );
}

#[tokio::test]
async fn test_stale_text() {
    let TestNetwork {
        coordinator,
        language,
        ..
    } = NetworkBuilder::new().build().await;

    let text = coordinator
        .send_text("A string to tokenize", &worker(DATA))
        .await
        .unwrap();
    coordinator.remove(&text).await.unwrap();
    assert!(matches!(
        language.tokenize(&text).await,
        Err(RequestError::Lookup(LookupError::NotFound(id))) if id == text.id()
    ));
    assert!(matches!(
        coordinator.remove(&text).await,
        Err(RequestError::Lookup(LookupError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_tokenize_after_teardown() {
    let TestNetwork {
        network,
        coordinator,
        language,
        ..
    } = NetworkBuilder::new().build().await;

    let text = coordinator
        .send_text("A string to tokenize", &worker(DATA))
        .await
        .unwrap();
    network.teardown(&worker(DATA)).await.unwrap();
    assert!(!network.workers().await.contains(&worker(DATA)));

    assert!(matches!(
        language.tokenize(&text).await,
        Err(RequestError::Routing(RoutingError::Unreachable(id))) if id == worker(DATA)
    ));
    assert!(matches!(
        network.teardown(&worker(DATA)).await,
        Err(RequestError::Routing(RoutingError::Unreachable(_)))
    ));
}

#[tokio::test]
async fn test_misrouted_tokenizer() {
    let TestNetwork {
        network,
        coordinator,
        ..
    } = NetworkBuilder::new().build().await;

    let text = coordinator
        .send_text("A string to tokenize", &worker(DATA))
        .await
        .unwrap();
    let foreign = coordinator
        .send_text("elsewhere", &worker(HOLDER_A))
        .await
        .unwrap();
    let req = Request::Tokenize {
        text,
        tokenizer: Pointer::new(worker(ME), worker(HOLDER_A), foreign.id()),
    };
    assert!(matches!(
        network.request(&worker(DATA), req).await,
        Err(RequestError::Routing(RoutingError::Misrouted { expected, actual }))
            if expected == worker(HOLDER_A) && actual == worker(DATA)
    ));
}

#[tokio::test]
async fn test_tokenizers_are_not_left_behind() {
    let net = NetworkBuilder::new().build().await;
    let text = net
        .coordinator
        .send_text("A string to tokenize", &worker(DATA))
        .await
        .unwrap();

    net.language.tokenize(&text).await.unwrap();
    net.language.tokenize(&text).await.unwrap();
    // the text and two documents
    assert_eq!(net.store(DATA).len().await, 3);

    // also after a failed tokenization
    net.coordinator.remove(&text).await.unwrap();
    assert!(net.language.tokenize(&text).await.is_err());
    assert_eq!(net.store(DATA).len().await, 2);
}
