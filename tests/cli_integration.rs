//! Integration tests for the `nxr` binary.
//!
//! Each test isolates configuration in a temporary directory and, where the
//! store is needed, points the binary at a local mock server.

use std::path::{Path, PathBuf};

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Fixtures
// =============================================================================

/// Isolated environment: config and home directory live in a temp dir.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn nxr(&self) -> Command {
        nxr_command(self.dir.path(), &self.config_path())
    }

    /// Run `nxr` off the async runtime so the mock server keeps serving.
    async fn run(&self, args: &[&str]) -> Assert {
        let home = self.dir.path().to_path_buf();
        let config = self.config_path();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        let output = tokio::task::spawn_blocking(move || {
            nxr_command(&home, &config)
                .args(&args)
                .output()
                .expect("failed to run nxr")
        })
        .await
        .unwrap();
        output.assert()
    }
}

fn nxr_command(home: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nxr").expect("binary should build");
    cmd.env("HOME", home)
        .env("NEXUS_REPO_CONFIG", config)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("NEXUS_LOG");
    cmd
}

// =============================================================================
// Offline commands
// =============================================================================

#[test]
fn help_lists_commands() {
    TestEnv::new()
        .nxr()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("deprecate"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn completion_bash() {
    TestEnv::new()
        .nxr()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_nxr"));
}

#[test]
fn config_set_get_list_path() {
    let env = TestEnv::new();

    env.nxr()
        .args(["config", "set", "base_url", "http://localhost:8080/v0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set base_url = http://localhost:8080/v0"));
    assert!(env.config_path().exists());

    env.nxr()
        .args(["config", "get", "base_url"])
        .assert()
        .success()
        .stdout("http://localhost:8080/v0\n");

    env.nxr()
        .args(["config", "set", "token", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());

    env.nxr()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token = (set)"))
        .stdout(predicate::str::contains("timeout_secs = (not set)"))
        .stdout(predicate::str::contains("s3cret").not());

    env.nxr()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_rejects_bad_values() {
    let env = TestEnv::new();

    env.nxr()
        .args(["config", "set", "timeout_secs", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    env.nxr()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure();
    assert!(!env.config_path().exists());
}

#[test]
fn network_command_without_base_url_fails() {
    TestEnv::new()
        .nxr()
        .args(["get", "organization", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn invalid_identifier_is_rejected() {
    TestEnv::new()
        .nxr()
        .args([
            "--base-url",
            "http://127.0.0.1:9",
            "deprecate",
            "domain",
            "acme//lab",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Commands against a mock store
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn get_organization_prints_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/organizations/acme"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"rev": 3, "description": "ACME"})),
        )
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let base_url = format!("{}/v0", server.uri());
    let assert = env
        .run(&["--base-url", base_url.as_str(), "get", "organization", "acme"])
        .await;
    assert
        .success()
        .stdout(predicate::str::contains("organization acme (rev 3)"))
        .stdout(predicate::str::contains("\"description\": \"ACME\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_organization_fails() {
    let server = MockServer::start().await;

    let env = TestEnv::new();
    let base_url = server.uri();
    let assert = env
        .run(&["--base-url", base_url.as_str(), "get", "organization", "acme"])
        .await;
    assert
        .failure()
        .stderr(predicate::str::contains("organization 'acme' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_json_prints_self_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schemas/acme/lab/"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 9,
            "results": [
                {"self_link": "https://store.example.com/schemas/acme/lab/sensor/v1"},
                {"self_link": "https://store.example.com/schemas/acme/lab/sensor/v2"}
            ]
        })))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let base_url = server.uri();
    let assert = env
        .run(&[
            "--base-url",
            base_url.as_str(),
            "--json",
            "list",
            "schema",
            "--subpath",
            "acme/lab",
            "--size",
            "2",
        ])
        .await;
    let output = assert.success().get_output().stdout.clone();
    let printed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(printed["total"], json!(9));
    assert_eq!(
        printed["results"],
        json!([
            "https://store.example.com/schemas/acme/lab/sensor/v1",
            "https://store.example.com/schemas/acme/lab/sensor/v2"
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deprecate_domain_uses_current_revision() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains/acme/lab"))
        .and(query_param("rev", "6"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"rev": 6, "deprecated": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/domains/acme/lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rev": 5})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/domains/acme/lab"))
        .and(query_param("rev", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rev": 6})))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let base_url = server.uri();
    let assert = env
        .run(&["--base-url", base_url.as_str(), "deprecate", "domain", "acme/lab"])
        .await;
    assert
        .success()
        .stdout(predicate::str::contains("Deprecated domain acme/lab (rev 6)"));
}
