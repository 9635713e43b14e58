use fusionauth_provider::{
    client::FusionAuthClient,
    config::{Kind, Operation},
    driver::{execute, Request},
    error::ProviderError,
    provider::Provider,
    resources::Resource,
    state::ResourceData,
};
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing_test::traced_test;
use url::Url;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const LAMBDA_ID: &str = "0f0d5d3c-5a3d-4d2c-8b7a-7f6b5b8d9c01";
const TENANT_ID: &str = "4bdb2b3a-6e6b-4e1f-8fa8-27b2bdd6b6bc";

fn client(server: &MockServer) -> FusionAuthClient {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    FusionAuthClient::new(base, "test-api-key", Client::new())
}

fn attributes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn resource(type_name: &str) -> &'static dyn Resource {
    let provider: &'static Provider = Box::leak(Box::new(Provider::new()));
    provider.resource(type_name).unwrap()
}

#[traced_test]
#[tokio::test]
async fn test_lambda_create_sends_envelope_and_reads_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/lambda"))
        .and(header("authorization", "test-api-key"))
        .and(body_partial_json(json!({
            "lambda": { "name": "reconcile", "type": "GoogleReconcile", "debug": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lambda": {
                "id": LAMBDA_ID,
                "name": "reconcile",
                "body": "function reconcile(user) {}",
                "type": "GoogleReconcile",
                "debug": false,
                "engineType": "GraalJS"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({
        "name": "reconcile",
        "body": "function reconcile(user) {}",
        "type": "GoogleReconcile",
        "debug": false
    })));
    resource("fusionauth_lambda")
        .create(&client(&server), &mut data)
        .await
        .unwrap();

    assert_eq!(data.id(), Some(LAMBDA_ID));
    assert_eq!(data.attributes["lambda_id"], json!(LAMBDA_ID));
    assert_eq!(data.attributes["engine_type"], json!("GraalJS"));
    assert!(logs_contain("Created"));
}

#[tokio::test]
async fn test_create_with_requested_id_posts_to_object_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lambda": { "id": LAMBDA_ID, "name": "n", "body": "b", "type": "JWTPopulate" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({
        "lambda_id": LAMBDA_ID,
        "name": "n",
        "body": "b",
        "type": "JWTPopulate"
    })));
    resource("fusionauth_lambda")
        .create(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), Some(LAMBDA_ID));
}

#[traced_test]
#[tokio::test]
async fn test_read_missing_object_clears_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut data = ResourceData::with_id(LAMBDA_ID);
    resource("fusionauth_lambda")
        .read(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), None);
    assert!(logs_contain("removing from state"));
}

#[tokio::test]
async fn test_import_of_missing_object_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = resource("fusionauth_lambda")
        .import(&client(&server), LAMBDA_ID)
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::NotFound { .. }));
}

#[tokio::test]
async fn test_import_id_cannot_leave_the_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let error = resource("fusionauth_lambda")
        .import(&client(&server), "..")
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::InvalidAttribute { .. }));
}

#[tokio::test]
async fn test_validation_errors_are_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "fieldErrors": {
                "lambda.body": [{
                    "code": "[blank]lambda.body",
                    "message": "You must specify the [lambda.body] property."
                }]
            }
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({ "name": "n", "type": "JWTPopulate" })));
    data.set_id(Some(LAMBDA_ID.to_string()));
    let error = resource("fusionauth_lambda")
        .update(&client(&server), &mut data)
        .await
        .unwrap_err();
    match &error {
        ProviderError::Api { status, errors, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert!(errors.as_ref().unwrap().field_errors.contains_key("lambda.body"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(error.to_string().contains("You must specify the [lambda.body] property."));
}

#[tokio::test]
async fn test_plain_text_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("Internal failure: database unavailable"),
        )
        .mount(&server)
        .await;

    let mut data = ResourceData::with_id(LAMBDA_ID);
    let error = resource("fusionauth_lambda")
        .read(&client(&server), &mut data)
        .await
        .unwrap_err();
    match &error {
        ProviderError::Api { status, errors, body } => {
            assert_eq!(status.as_u16(), 500);
            assert!(errors.is_none());
            assert_eq!(body, "Internal failure: database unavailable");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(error
        .to_string()
        .contains("Internal failure: database unavailable"));
    assert_eq!(data.id(), Some(LAMBDA_ID));
}

#[tokio::test]
async fn test_delete_of_missing_object_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/lambda/{LAMBDA_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    resource("fusionauth_lambda")
        .delete(&client(&server), &ResourceData::with_id(LAMBDA_ID))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_application_uses_tenant_header_and_hard_delete() {
    let application_id = "c50329fa-93e5-4618-8d9f-73d0ab069a23";
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/application/{application_id}")))
        .and(query_param("hardDelete", "true"))
        .and(header("X-FusionAuth-TenantId", TENANT_ID))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({ "tenant_id": TENANT_ID, "name": "app" })));
    data.set_id(Some(application_id.to_string()));
    resource("fusionauth_application")
        .delete(&client(&server), &data)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_create_sends_top_level_flags() {
    let user_id = "8e3f2d8d-1c8e-4f6a-9a39-4f1f0b8a4a11";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user"))
        .and(header("X-FusionAuth-TenantId", TENANT_ID))
        .and(body_partial_json(json!({
            "sendSetPasswordEmail": false,
            "skipVerification": true,
            "user": { "email": "richard@piedpiper.com", "password": "hunter22" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": user_id,
                "tenantId": TENANT_ID,
                "email": "richard@piedpiper.com",
                "verified": true,
                "active": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({
        "tenant_id": TENANT_ID,
        "email": "richard@piedpiper.com",
        "password": "hunter22",
        "skip_verification": true
    })));
    resource("fusionauth_user")
        .create(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.id(), Some(user_id));
    assert_eq!(data.attributes["password"], json!("hunter22"));
    assert_eq!(data.attributes["verified"], json!(true));
}

fn resource_request(type_name: &str, op: Operation, data: ResourceData) -> Request {
    Request {
        kind: Kind::Resource,
        type_name: type_name.to_string(),
        op,
        data,
        schema_version: 0,
        import_id: None,
    }
}

#[tokio::test]
async fn test_user_update_accepts_created_state() {
    let user_id = "8e3f2d8d-1c8e-4f6a-9a39-4f1f0b8a4a11";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": user_id,
                "tenantId": TENANT_ID,
                "email": "richard@piedpiper.com",
                "verified": true,
                "active": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/user/{user_id}")))
        .and(body_partial_json(json!({
            "user": { "email": "richard@piedpiper.com", "firstName": "Richard" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": user_id,
                "tenantId": TENANT_ID,
                "email": "richard@piedpiper.com",
                "firstName": "Richard",
                "verified": true,
                "active": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::new();
    let client = client(&server);
    let data = ResourceData::new(attributes(json!({ "email": "richard@piedpiper.com" })));
    let created = execute(
        &provider,
        &client,
        resource_request("fusionauth_user", Operation::Create, data),
    )
    .await;
    assert!(!created.diagnostics.has_errors(), "{:?}", created.diagnostics);
    let mut state = created.state.unwrap();
    assert_eq!(state.attributes["verified"], json!(true));
    assert_eq!(state.attributes["active"], json!(true));

    state.set("first_name", "Richard");
    let updated = execute(
        &provider,
        &client,
        resource_request("fusionauth_user", Operation::Update, state),
    )
    .await;
    assert!(!updated.diagnostics.has_errors(), "{:?}", updated.diagnostics);
    let state = updated.state.unwrap();
    assert_eq!(state.id(), Some(user_id));
    assert_eq!(state.attributes["first_name"], json!("Richard"));
}

#[tokio::test]
async fn test_idp_of_another_type_is_refused() {
    let idp_id = "3c0b2c6e-2a79-4e6a-8bf5-2dd2d3aa1fcb";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/identity-provider/{idp_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "identityProvider": { "id": idp_id, "type": "Apple", "name": "Apple" }
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::with_id(idp_id);
    let error = resource("fusionauth_idp_google")
        .read(&client(&server), &mut data)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ProviderError::IdentityProviderType { expected: "Google", .. }
    ));
}

#[tokio::test]
async fn test_idp_create_sends_type() {
    let idp_id = "82339786-3dff-42a6-aac6-1f1ceecb6c46";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/identity-provider"))
        .and(body_partial_json(json!({
            "identityProvider": {
                "type": "Twitter",
                "buttonText": "Login with Twitter",
                "consumerKey": "key"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "identityProvider": {
                "id": idp_id,
                "type": "Twitter",
                "buttonText": "Login with Twitter",
                "consumerKey": "key",
                "enabled": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({
        "button_text": "Login with Twitter",
        "consumer_key": "key",
        "consumer_secret": "secret"
    })));
    resource("fusionauth_idp_twitter")
        .create(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.attributes["idp_id"], json!(idp_id));
    assert_eq!(data.attributes["consumer_secret"], Value::Null);
}

#[tokio::test]
async fn test_registration_paths() {
    let user_id = "8e3f2d8d-1c8e-4f6a-9a39-4f1f0b8a4a11";
    let application_id = "c50329fa-93e5-4618-8d9f-73d0ab069a23";
    let server = MockServer::start().await;
    let registration = json!({
        "registration": {
            "id": "f2a5c1d4-8d1e-4b56-b5d0-0a1b2c3d4e5f",
            "applicationId": application_id,
            "roles": ["admin"],
            "verified": true
        }
    });
    Mock::given(method("POST"))
        .and(path(format!("/api/user/registration/{user_id}")))
        .and(body_partial_json(json!({ "skipRegistrationVerification": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(registration.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/user/registration/{user_id}/{application_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(registration))
        .expect(1)
        .mount(&server)
        .await;

    let registrations = resource("fusionauth_registration");
    let client = client(&server);
    let mut data = ResourceData::new(attributes(json!({
        "user_id": user_id,
        "application_id": application_id,
        "roles": ["admin"],
        "skip_registration_verification": true
    })));
    registrations.create(&client, &mut data).await.unwrap();
    assert_eq!(data.id(), Some("f2a5c1d4-8d1e-4b56-b5d0-0a1b2c3d4e5f"));

    let imported = registrations
        .import(&client, &format!("{user_id}:{application_id}"))
        .await
        .unwrap();
    assert_eq!(imported.attributes["roles"], json!(["admin"]));
    assert_eq!(imported.attributes["user_id"], json!(user_id));
}

#[tokio::test]
async fn test_application_role_read_finds_role_in_application() {
    let application_id = "c50329fa-93e5-4618-8d9f-73d0ab069a23";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/application/{application_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "application": {
                "id": application_id,
                "roles": [
                    { "id": "r1", "name": "admin", "isSuperRole": true },
                    { "id": "r2", "name": "viewer", "description": "Read only" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let roles = resource("fusionauth_application_role");
    let client = client(&server);

    let mut data = ResourceData::new(attributes(json!({ "application_id": application_id })));
    data.set_id(Some("r2".to_string()));
    roles.read(&client, &mut data).await.unwrap();
    assert_eq!(data.attributes["description"], json!("Read only"));

    let mut gone = ResourceData::new(attributes(json!({ "application_id": application_id })));
    gone.set_id(Some("r3".to_string()));
    roles.read(&client, &mut gone).await.unwrap();
    assert_eq!(gone.id(), None);
}

#[tokio::test]
async fn test_tenant_create_sends_source_tenant() {
    let source = "2a6e5c2b-4d8e-4c4b-a7c4-0d0a6e5d3c2b";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tenant"))
        .and(body_partial_json(json!({
            "sourceTenantId": source,
            "tenant": { "name": "Acme" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tenant": { "id": TENANT_ID, "name": "Acme", "issuer": "acme.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attributes(json!({
        "name": "Acme",
        "source_tenant_id": source
    })));
    resource("fusionauth_tenant")
        .create(&client(&server), &mut data)
        .await
        .unwrap();
    assert_eq!(data.attributes["tenant_id"], json!(TENANT_ID));
    assert_eq!(data.attributes["source_tenant_id"], json!(source));
}
