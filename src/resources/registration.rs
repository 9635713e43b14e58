use async_trait::async_trait;
use serde_json::{Map, Value};

use super::Resource;
use crate::{
    client::{unwrap_envelope, ApiPath, FusionAuthClient},
    error::ProviderError,
    mapping::{expand, flatten},
    schema::{Attribute, Schema, Validator},
    state::ResourceData,
};

const PATH: &str = "/api/user/registration";
const ENVELOPE: &str = "registration";

pub fn schema() -> Schema {
    Schema::new(
        "Registers a user with an application.",
        vec![
            Attribute::string("registration_id")
                .api("id")
                .computed()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("user_id")
                .required()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("application_id")
                .api("applicationId")
                .required()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("tenant_id")
                .validate(Validator::Uuid)
                .describe("Sent as the tenant header, required when more than one tenant exists."),
            Attribute::string("authentication_token")
                .api("authenticationToken")
                .computed()
                .sensitive(),
            Attribute::json("data").api("data"),
            Attribute::bool("generate_authentication_token")
                .default(false)
                .describe("Have FusionAuth generate an application specific authentication token."),
            Attribute::string_list("preferred_languages").api("preferredLanguages"),
            Attribute::string_set("roles").api("roles"),
            Attribute::bool("skip_registration_verification")
                .default(false)
                .describe("Mark the registration verified without sending a verification email."),
            Attribute::string("timezone").api("timezone"),
            Attribute::string("username").api("username"),
            Attribute::bool("verified").api("verified").computed_only(),
        ],
    )
}

/// `fusionauth_registration`. Registrations are addressed by user and application
/// rather than by their own id, so this does not fit [`super::RestResource`].
pub struct Registration;

impl Registration {
    fn user_path(data: &ResourceData) -> Result<ApiPath, ProviderError> {
        Ok(ApiPath::new(PATH).segment(data.require_str("user_id")?))
    }

    fn object_path(data: &ResourceData) -> Result<ApiPath, ProviderError> {
        Ok(Self::user_path(data)?.segment(data.require_str("application_id")?))
    }

    fn request_body(data: &ResourceData) -> Result<Value, ProviderError> {
        let object = expand(&schema().block, &data.attributes)?;
        let mut body = Map::new();
        body.insert(ENVELOPE.to_string(), Value::Object(object));
        for (attribute, key) in [
            ("generate_authentication_token", "generateAuthenticationToken"),
            ("skip_registration_verification", "skipRegistrationVerification"),
        ] {
            body.insert(
                key.to_string(),
                Value::Bool(data.get_bool(attribute).unwrap_or(false)),
            );
        }
        Ok(Value::Object(body))
    }

    fn apply_response(data: &mut ResourceData, response: Value) -> Result<(), ProviderError> {
        let object = unwrap_envelope(response, ENVELOPE)?;
        data.attributes = flatten(&schema().block, &object, &data.attributes);
        if let Some(id) = object.get("id").and_then(Value::as_str) {
            data.set_id(Some(id.to_string()));
            data.set("registration_id", id);
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for Registration {
    fn type_name(&self) -> &'static str {
        "fusionauth_registration"
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let path = Self::user_path(data)?;
        let body = Self::request_body(data)?;
        let response = client
            .post(path, data.get_str("tenant_id"), &body)
            .await?;
        Self::apply_response(data, response)?;
        tracing::info!(resource = self.type_name(), id = ?data.id(), "Created");
        Ok(())
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let path = Self::object_path(data)?;
        let tenant = data.get_str("tenant_id").map(str::to_string);
        match client.get(path.clone(), tenant.as_deref()).await {
            Ok(response) => Self::apply_response(data, response),
            Err(e) if e.is_not_found() => {
                tracing::warn!(resource = self.type_name(), %path, "Registration no longer exists, removing from state");
                data.set_id(None);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let path = Self::user_path(data)?;
        let body = Self::request_body(data)?;
        let response = client
            .put(path, data.get_str("tenant_id"), &body)
            .await?;
        Self::apply_response(data, response)?;
        tracing::info!(resource = self.type_name(), id = ?data.id(), "Updated");
        Ok(())
    }

    async fn delete(
        &self,
        client: &FusionAuthClient,
        data: &ResourceData,
    ) -> Result<(), ProviderError> {
        let path = Self::object_path(data)?;
        match client.delete(path.clone(), &[], data.get_str("tenant_id")).await {
            Ok(()) => {
                tracing::info!(resource = self.type_name(), %path, "Deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Imports `<user_id>:<application_id>`.
    async fn import(
        &self,
        client: &FusionAuthClient,
        id: &str,
    ) -> Result<ResourceData, ProviderError> {
        let (user, application) = id.split_once(':').ok_or_else(|| {
            ProviderError::invalid("id", "expected <user_id>:<application_id>")
        })?;
        let mut data = ResourceData::with_id(id);
        data.set("user_id", user);
        data.set("application_id", application);
        self.read(client, &mut data).await?;
        if data.id().is_none() {
            return Err(ProviderError::NotFound {
                kind: self.type_name(),
                lookup: format!("user {user} and application {application}"),
            });
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body() {
        let data = ResourceData::new(match json!({
            "user_id": "8e3f2d8d-1c8e-4f6a-9a39-4f1f0b8a4a11",
            "application_id": "c50329fa-93e5-4618-8d9f-73d0ab069a23",
            "roles": ["admin"],
            "skip_registration_verification": true
        }) {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        });
        let body = Registration::request_body(&data).unwrap();
        assert_eq!(
            body,
            json!({
                "registration": {
                    "applicationId": "c50329fa-93e5-4618-8d9f-73d0ab069a23",
                    "roles": ["admin"]
                },
                "generateAuthenticationToken": false,
                "skipRegistrationVerification": true
            })
        );
        assert_eq!(
            Registration::object_path(&data).unwrap().to_string(),
            "/api/user/registration/8e3f2d8d-1c8e-4f6a-9a39-4f1f0b8a4a11/c50329fa-93e5-4618-8d9f-73d0ab069a23"
        );
    }
}
