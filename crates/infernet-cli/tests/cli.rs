use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDR: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// Command isolated from the caller's environment
fn node_cmd() -> Command {
    let mut cmd = Command::cargo_bin("infernet-node").unwrap();
    for var in [
        "INFERNET_CONFIG_PATH",
        "INFERNET_COORDINATOR_URL",
        "INFERNET_COORDINATOR_API_KEY",
        "INFERNET_NODE_ADDRESS",
        "INFERNET_SKIP_VERSION_CHECK",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(dir: &Path, coordinator_url: &str) -> std::path::PathBuf {
    let config = json!({
        "coordinator": {"url": coordinator_url, "timeout_secs": 5},
        "node": {
            "address": ADDR,
            "state_path": dir.join("registration.json"),
        },
        "containers": [{"id": "echo", "image": "ritualnetwork/echo:latest"}],
        "version_check": {"enabled": false}
    });
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    node_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("activate"));
}

#[test]
fn test_version_lists_images() {
    let version = env!("CARGO_PKG_VERSION");
    node_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "ritualnetwork/infernet-node:{version}\n"
        )))
        .stdout(predicate::str::contains(format!(
            "ritualnetwork/infernet-node:{version}-gpu"
        )));
}

#[test]
fn test_register_without_coordinator_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    node_cmd()
        .args(["--skip-version-check", "-c"])
        .arg(&config)
        .arg("register")
        .env("INFERNET_NODE_ADDRESS", ADDR)
        .assert()
        .failure()
        .stderr(predicate::str::contains("coordinator.url"));
}

#[test]
fn test_activate_before_register_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9");

    node_cmd()
        .arg("-c")
        .arg(&config)
        .arg("activate-node")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not registered"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    node_cmd()
        .arg("-c")
        .arg(dir.path().join("typo.json"))
        .args(["config", "validate"])
        .env("INFERNET_COORDINATOR_URL", "https://coordinator.example")
        .env("INFERNET_NODE_ADDRESS", ADDR)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_register_unreachable_coordinator_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9");

    node_cmd()
        .arg("-c")
        .arg(&config)
        .arg("register-node")
        .env("INFERNET_SKIP_VERSION_CHECK", "1")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("connection failed")
                .or(predicate::str::contains("timed out")),
        );

    assert!(!dir.path().join("registration.json").exists());
}

#[test]
fn test_activate_during_cooldown_fails() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/nodes/{ADDR}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": ADDR,
                "status": "registered",
                "registration_id": "reg-wait",
                "cooldown_start": chrono::Utc::now().to_rfc3339(),
                "cooldown_secs": 3600
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/nodes/{ADDR}/activate")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri());
    let record = json!({
        "address": ADDR,
        "registration_id": "reg-wait",
        "coordinator_url": server.uri(),
        "registered_at": chrono::Utc::now().to_rfc3339()
    });
    std::fs::write(dir.path().join("registration.json"), record.to_string()).unwrap();

    node_cmd()
        .arg("-c")
        .arg(&config)
        .args(["--skip-version-check", "activate-node"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cooldown still pending"))
        .stderr(predicate::str::contains("activation possible in"));

    rt.block_on(async move { drop(server) });
}

#[test]
fn test_config_validate_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("empty.json");
    std::fs::write(&config, "{}").unwrap();

    node_cmd()
        .arg("-c")
        .arg(&config)
        .args(["config", "validate"])
        .env("INFERNET_COORDINATOR_URL", "https://coordinator.example")
        .env("INFERNET_NODE_ADDRESS", ADDR)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_config_show_masks_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "https://coordinator.example");

    node_cmd()
        .arg("-c")
        .arg(&config)
        .args(["-o", "json", "config", "show"])
        .env("INFERNET_COORDINATOR_API_KEY", "supersecretapikey")
        .assert()
        .success()
        .stdout(predicate::str::contains("supe...ikey"))
        .stdout(predicate::str::contains("supersecretapikey").not());
}

#[test]
fn test_register_then_activate() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/nodes/{ADDR}")))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/nodes/{ADDR}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": ADDR,
                "status": "registered",
                "registration_id": "reg-cli",
                "cooldown_start": "2024-05-01T12:00:00Z",
                "cooldown_secs": 0
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/nodes"))
            .and(header("authorization", "Bearer cli-token"))
            .and(body_partial_json(json!({"address": ADDR, "containers": ["echo"]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "address": ADDR,
                "registration_id": "reg-cli",
                "registered_at": "2024-05-01T12:00:00Z",
                "cooldown_secs": 0
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/nodes/{ADDR}/activate")))
            .and(body_partial_json(json!({"registration_id": "reg-cli"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": ADDR,
                "status": "active",
                "activated_at": "2024-05-01T12:01:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        server
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri());

    node_cmd()
        .arg("-c")
        .arg(&config)
        .args(["--skip-version-check", "-o", "json", "register-node"])
        .env("INFERNET_COORDINATOR_API_KEY", "cli-token")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "registered""#))
        .stdout(predicate::str::contains("reg-cli"));

    assert!(dir.path().join("registration.json").exists());

    node_cmd()
        .arg("-c")
        .arg(&config)
        .args(["--skip-version-check", "-o", "json", "activate-node"])
        .env("INFERNET_COORDINATOR_API_KEY", "cli-token")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "activated""#));

    // Dropping the server checks the `expect(1)` counts
    rt.block_on(async move { drop(server) });
}
