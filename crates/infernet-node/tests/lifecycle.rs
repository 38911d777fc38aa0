use infernet_node::{
    ActivateOutcome, ConfigOverrides, NodeConfig, NodeError, NodeLifecycle, RegisterOutcome,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDR: &str = "0x14dc79964da2c08b23698b3d3cc7ca32193d9955";

fn config_for(server: &MockServer, dir: &tempfile::TempDir) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.apply_overrides(ConfigOverrides {
        coordinator_url: Some(server.uri()),
        api_key: None,
        address: Some(ADDR.to_string()),
    });
    config.node.state_path = Some(dir.path().join("registration.json"));
    config.validate().unwrap();
    config
}

#[tokio::test]
async fn test_register_then_activate_against_coordinator() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir);

    // Unknown before registration
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/nodes/{ADDR}")))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/nodes"))
        .and(body_partial_json(json!({"address": ADDR})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "address": ADDR,
            "registration_id": "reg-e2e",
            "registered_at": "2024-05-01T12:00:00Z",
            "cooldown_secs": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    let node = NodeLifecycle::from_config(config.coordinator.client().unwrap(), &config).unwrap();
    let outcome = node.register().await.unwrap();
    match outcome {
        RegisterOutcome::Registered(receipt) => assert_eq!(receipt.registration_id, "reg-e2e"),
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Registered, cooldown long over
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/nodes/{ADDR}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": ADDR,
            "status": "registered",
            "registration_id": "reg-e2e",
            "cooldown_start": "2024-05-01T12:00:00Z",
            "cooldown_secs": 60
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/nodes/{ADDR}/activate")))
        .and(body_partial_json(json!({"registration_id": "reg-e2e"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": ADDR,
            "status": "active",
            "activated_at": "2024-05-01T12:05:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = node.activate().await.unwrap();
    assert!(matches!(outcome, ActivateOutcome::Activated(_)));

    let record = node.store().load().unwrap().unwrap();
    assert_eq!(record.coordinator_url, server.uri());
    assert!(record.is_active());
}

#[tokio::test]
async fn test_rejected_registration_persists_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir);

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/nodes/{ADDR}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/nodes"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "address blocklisted"})),
        )
        .mount(&server)
        .await;

    let node = NodeLifecycle::from_config(config.coordinator.client().unwrap(), &config).unwrap();
    let err = node.register().await.unwrap_err();
    assert!(matches!(err, NodeError::Rejected { .. }));
    assert!(node.store().load().unwrap().is_none());
}

#[tokio::test]
async fn test_unreachable_coordinator_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = NodeConfig::default();
    config.coordinator.url = "http://127.0.0.1:9".into();
    config.coordinator.timeout_secs = 2;
    config.node.address = ADDR.into();
    config.node.state_path = Some(dir.path().join("registration.json"));

    let node = NodeLifecycle::from_config(config.coordinator.client().unwrap(), &config).unwrap();
    let err = node.register().await.unwrap_err();
    assert!(err.is_retryable(), "unexpected error: {err:?}");
}
