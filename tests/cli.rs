use serde_json::{json, Value};
use std::{io::Write, process::Stdio};
use tokio::process::Command;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const BINARY: &str = env!("CARGO_BIN_EXE_terraform-provider-fusionauth");

fn command() -> Command {
    let mut command = Command::new(BINARY);
    command
        .env_remove("FA_DOMAIN")
        .env_remove("FA_API_KEY")
        .env_remove("HTTP_PROXY")
        .env_remove("NO_PROXY")
        .env("RUST_LOG", "debug")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

#[tokio::test]
async fn test_schema_command_prints_every_type() {
    let output = command()
        .arg("schema")
        .output()
        .await
        .expect("failed to spawn");
    assert!(output.status.success());

    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["resource_schemas"]["fusionauth_application"].is_object());
    assert!(schema["resource_schemas"]["fusionauth_idp_saml_v2_idp_initiated"].is_object());
    assert!(schema["data_source_schemas"]["fusionauth_user"].is_object());
}

#[tokio::test]
async fn test_run_reads_state_file() {
    let lambda_id = "0f0d5d3c-5a3d-4d2c-8b7a-7f6b5b8d9c01";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/lambda/{lambda_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lambda": { "id": lambda_id, "name": "populate", "body": "b", "type": "JWTPopulate" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = tempfile::NamedTempFile::new().unwrap();
    write!(
        state,
        "{}",
        json!({ "id": lambda_id, "attributes": { "name": "old" } })
    )
    .unwrap();

    let output = command()
        .env("FA_DOMAIN", server.uri())
        .env("FA_API_KEY", "test-api-key")
        .args(["run", "--type", "fusionauth_lambda", "--op", "read", "--state"])
        .arg(state.path())
        .output()
        .await
        .expect("failed to spawn");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["state"]["id"], json!(lambda_id));
    assert_eq!(response["state"]["attributes"]["name"], json!("populate"));
    assert_eq!(response["diagnostics"], json!([]));
    // logs never end up on stdout
    assert!(!String::from_utf8_lossy(&output.stdout).contains("FusionAuth request"));
}

#[tokio::test]
async fn test_error_diagnostics_fail_the_process() {
    let mut state = tempfile::NamedTempFile::new().unwrap();
    write!(state, "{}", json!({ "attributes": { "name": "x" } })).unwrap();

    let output = command()
        .args([
            "run",
            "--host",
            "http://127.0.0.1:9",
            "--api-key",
            "k",
            "--type",
            "fusionauth_lambda",
            "--op",
            "validate",
            "--state",
        ])
        .arg(state.path())
        .output()
        .await
        .expect("failed to spawn");
    assert!(!output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    let diagnostics = response["diagnostics"].as_array().unwrap();
    assert!(diagnostics
        .iter()
        .any(|d| d["attribute"] == "body" && d["severity"] == "error"));
}
