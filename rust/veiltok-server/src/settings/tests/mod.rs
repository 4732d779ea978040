use validator::Validate;

use super::{NetworkSettings, Settings, SharingSettings, WorkerSettings};
use veiltok_core::{
    share::{BoundType, ShareConfig, SummandType},
    text::OovPolicy,
    WorkerId,
};

fn worker_settings() -> WorkerSettings {
    WorkerSettings {
        coordinator: "me".into(),
        data: "bob".into(),
        holders: ["alice".into(), "theo".into()],
        crypto_provider: "crypto_provider".into(),
    }
}

#[test]
fn test_settings_new() {
    let settings = Settings::new("../../configs/config.toml").unwrap();
    assert_eq!(settings.pipeline.model, "en_core_web_lg");
    assert_eq!(settings.pipeline.oov, OovPolicy::Zero);
    assert_eq!(ShareConfig::from(settings.sharing), ShareConfig::default());
    assert_eq!(settings.workers.data, "bob");
    assert!(Settings::new("").is_err());
}

#[test]
fn test_validate_workers() {
    assert!(worker_settings().validate_workers().is_ok());
    assert_eq!(
        worker_settings().workers(),
        vec![
            WorkerId::from("bob"),
            WorkerId::from("alice"),
            WorkerId::from("theo"),
            WorkerId::from("crypto_provider"),
        ]
    );

    // empty names
    assert!(WorkerSettings {
        data: "".into(),
        ..worker_settings()
    }
    .validate_workers()
    .is_err());

    // duplicate names
    assert!(WorkerSettings {
        holders: ["alice".into(), "alice".into()],
        ..worker_settings()
    }
    .validate_workers()
    .is_err());
    assert!(WorkerSettings {
        crypto_provider: "theo".into(),
        ..worker_settings()
    }
    .validate_workers()
    .is_err());
    assert!(WorkerSettings {
        coordinator: "bob".into(),
        ..worker_settings()
    }
    .validate()
    .is_err());
}

#[test]
fn test_validate_network() {
    assert!(NetworkSettings { request_timeout: 1 }.validate().is_ok());
    assert!(NetworkSettings { request_timeout: 0 }.validate().is_err());
}

#[test]
fn test_validate_sharing() {
    let sharing = SharingSettings {
        bound_type: BoundType::B2,
        precision: 12,
        summand_type: SummandType::S6,
    };
    assert!(sharing.validate().is_ok());
    let config = ShareConfig::from(sharing);
    assert_eq!(config.bound_type, BoundType::B2);
    assert_eq!(config.max_summands(), 1_000_000);

    assert!(SharingSettings {
        precision: 13,
        ..sharing
    }
    .validate()
    .is_err());
}
