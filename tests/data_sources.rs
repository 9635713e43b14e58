use fusionauth_provider::{
    client::FusionAuthClient,
    data_sources::DataSource,
    error::ProviderError,
    provider::Provider,
    state::ResourceData,
};
use reqwest::Client;
use serde_json::{json, Map, Value};
use url::Url;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client(server: &MockServer) -> FusionAuthClient {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    FusionAuthClient::new(base, "test-api-key", Client::new())
}

fn data_source(type_name: &str) -> &'static dyn DataSource {
    let provider: &'static Provider = Box::leak(Box::new(Provider::new()));
    provider.data_source(type_name).unwrap()
}

fn lookup(value: Value) -> ResourceData {
    match value {
        Value::Object(map) => ResourceData::new(map),
        _ => ResourceData::new(Map::new()),
    }
}

async fn mount_lambdas(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/lambda"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lambdas": [
                { "id": "l1", "name": "Default Google Reconcile", "type": "GoogleReconcile", "body": "a" },
                { "id": "l2", "name": "Default Apple Reconcile", "type": "AppleReconcile", "body": "b" },
                { "id": "l3", "name": "Populate", "type": "JWTPopulate", "body": "c" },
                { "id": "l4", "name": "Populate", "type": "JWTPopulate", "body": "d" }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lambda_by_name_and_type() {
    let server = MockServer::start().await;
    mount_lambdas(&server).await;

    let mut data = lookup(json!({ "name": "Default Apple Reconcile", "type": "AppleReconcile" }));
    data_source("fusionauth_lambda")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), Some("l2"));
    assert_eq!(data.attributes["body"], json!("b"));
}

#[tokio::test]
async fn test_ambiguous_lookup_fails() {
    let server = MockServer::start().await;
    mount_lambdas(&server).await;

    let mut data = lookup(json!({ "name": "Populate", "type": "JWTPopulate" }));
    let error = data_source("fusionauth_lambda")
        .read(&client(&server), &mut data)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::Ambiguous { count: 2, .. }));
}

#[tokio::test]
async fn test_missing_lookup_fails() {
    let server = MockServer::start().await;
    mount_lambdas(&server).await;

    let mut data = lookup(json!({ "name": "Nope" }));
    let error = data_source("fusionauth_lambda")
        .read(&client(&server), &mut data)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::NotFound { kind: "lambda", .. }));
    assert!(error.to_string().contains("Nope"));
}

#[tokio::test]
async fn test_lookup_without_criteria_fails() {
    let server = MockServer::start().await;
    let error = data_source("fusionauth_tenant")
        .read(&client(&server), &mut ResourceData::default())
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::InvalidAttribute { .. }));
}

#[tokio::test]
async fn test_theme_by_id() {
    let theme_id = "75a068fd-e94b-451a-9aeb-3ddb9a3b5987";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/theme/{theme_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "theme": {
                "id": theme_id,
                "name": "FusionAuth",
                "templates": { "emailSent": "[#ftl/]" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = lookup(json!({ "theme_id": theme_id }));
    data_source("fusionauth_theme")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.attributes["name"], json!("FusionAuth"));
    assert_eq!(data.attributes["email_sent"], json!("[#ftl/]"));
}

#[tokio::test]
async fn test_idp_by_name_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/identity-provider"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "identityProviders": [
                { "id": "i1", "name": "Google", "type": "Google", "enabled": true },
                { "id": "i2", "name": "Okta", "type": "OpenIDConnect", "enabled": false }
            ]
        })))
        .mount(&server)
        .await;

    let mut data = lookup(json!({ "name": "Okta", "type": "OpenIDConnect" }));
    data_source("fusionauth_idp")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.attributes["idp_id"], json!("i2"));
    assert_eq!(data.attributes["enabled"], json!(false));
}

#[tokio::test]
async fn test_user_by_username() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .and(query_param("username", "richard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u1", "username": "richard", "email": "richard@piedpiper.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = lookup(json!({ "username": "richard" }));
    data_source("fusionauth_user")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), Some("u1"));
    assert_eq!(data.attributes["email"], json!("richard@piedpiper.com"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut data = lookup(json!({ "email": "gavin@hooli.com" }));
    let error = data_source("fusionauth_user")
        .read(&client(&server), &mut data)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::NotFound { kind: "user", .. }));
}

#[tokio::test]
async fn test_application_role_by_name() {
    let application_id = "c50329fa-93e5-4618-8d9f-73d0ab069a23";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/application/{application_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "application": {
                "id": application_id,
                "roles": [{ "id": "r1", "name": "admin", "isDefault": true }]
            }
        })))
        .mount(&server)
        .await;

    let mut data = lookup(json!({ "application_id": application_id, "name": "admin" }));
    data_source("fusionauth_application_role")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), Some("r1"));
    assert_eq!(data.attributes["is_default"], json!(true));
    assert_eq!(data.attributes["application_id"], json!(application_id));
}
