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

pub fn schema() -> Schema {
    Schema::new(
        "A role defined on a FusionAuth application.",
        vec![
            Attribute::string("application_id")
                .required()
                .force_new()
                .validate(Validator::Uuid),
            Attribute::string("name").api("name").required().force_new(),
            Attribute::string("description").api("description"),
            Attribute::bool("is_default").api("isDefault").default(false),
            Attribute::bool("is_super_role").api("isSuperRole").default(false),
        ],
    )
}

/// Finds a role by id or name within an application's `roles` array.
pub(crate) fn find_role<'a>(application: &'a Value, field: &str, wanted: &str) -> Option<&'a Value> {
    application
        .get("roles")
        .and_then(Value::as_array)?
        .iter()
        .find(|role| role.get(field).and_then(Value::as_str) == Some(wanted))
}

/// `fusionauth_application_role`. Roles live inside their application and are
/// only addressable through it.
pub struct ApplicationRole;

impl ApplicationRole {
    fn roles_path(data: &ResourceData) -> Result<ApiPath, ProviderError> {
        Ok(ApiPath::new("/api/application")
            .segment(data.require_str("application_id")?)
            .segment("role"))
    }

    fn request_body(data: &ResourceData) -> Result<Value, ProviderError> {
        let object = expand(&schema().block, &data.attributes)?;
        let mut body = Map::new();
        body.insert("role".to_string(), Value::Object(object));
        Ok(Value::Object(body))
    }

    fn apply_role(data: &mut ResourceData, role: &Value) {
        data.attributes = flatten(&schema().block, role, &data.attributes);
        if let Some(id) = role.get("id").and_then(Value::as_str) {
            data.set_id(Some(id.to_string()));
        }
    }
}

#[async_trait]
impl Resource for ApplicationRole {
    fn type_name(&self) -> &'static str {
        "fusionauth_application_role"
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let response = client
            .post(Self::roles_path(data)?, None, &Self::request_body(data)?)
            .await?;
        let role = unwrap_envelope(response, "role")?;
        Self::apply_role(data, &role);
        tracing::info!(resource = self.type_name(), id = ?data.id(), "Created");
        Ok(())
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let id = data.require_id()?.to_string();
        let application_id = data.require_str("application_id")?.to_string();
        let application = match client
            .get(
                ApiPath::new("/api/application").segment(application_id.as_str()),
                None,
            )
            .await
        {
            Ok(response) => unwrap_envelope(response, "application")?,
            Err(e) if e.is_not_found() => Value::Null,
            Err(e) => return Err(e),
        };
        match find_role(&application, "id", &id) {
            Some(role) => Self::apply_role(data, role),
            None => {
                tracing::warn!(resource = self.type_name(), %id, %application_id, "Role no longer exists, removing from state");
                data.set_id(None);
            }
        }
        Ok(())
    }

    async fn update(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let id = data.require_id()?.to_string();
        let path = Self::roles_path(data)?.segment(id.as_str());
        let response = client
            .put(path, None, &Self::request_body(data)?)
            .await?;
        let role = unwrap_envelope(response, "role")?;
        Self::apply_role(data, &role);
        tracing::info!(resource = self.type_name(), %id, "Updated");
        Ok(())
    }

    async fn delete(
        &self,
        client: &FusionAuthClient,
        data: &ResourceData,
    ) -> Result<(), ProviderError> {
        let id = data.require_id()?;
        let path = Self::roles_path(data)?.segment(id);
        match client.delete(path, &[], None).await {
            Ok(()) => {
                tracing::info!(resource = self.type_name(), %id, "Deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Imports `<application_id>:<role_id>`.
    async fn import(
        &self,
        client: &FusionAuthClient,
        id: &str,
    ) -> Result<ResourceData, ProviderError> {
        let (application, role) = id
            .split_once(':')
            .ok_or_else(|| ProviderError::invalid("id", "expected <application_id>:<role_id>"))?;
        let mut data = ResourceData::with_id(role);
        data.set("application_id", application);
        self.read(client, &mut data).await?;
        if data.id().is_none() {
            return Err(ProviderError::NotFound {
                kind: self.type_name(),
                lookup: format!("role {role} in application {application}"),
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
    fn test_find_role() {
        let application = json!({
            "id": "app",
            "roles": [
                { "id": "1", "name": "admin", "isSuperRole": true },
                { "id": "2", "name": "viewer" }
            ]
        });
        assert_eq!(find_role(&application, "name", "viewer").unwrap()["id"], json!("2"));
        assert_eq!(find_role(&application, "id", "1").unwrap()["name"], json!("admin"));
        assert!(find_role(&application, "name", "editor").is_none());
        assert!(find_role(&json!({}), "name", "admin").is_none());
    }

    #[test]
    fn test_apply_role_keeps_application_id() {
        let mut data = ResourceData::new(match json!({ "application_id": "app", "name": "admin" }) {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        });
        ApplicationRole::apply_role(
            &mut data,
            &json!({ "id": "1", "name": "admin", "isSuperRole": true }),
        );
        assert_eq!(data.id(), Some("1"));
        assert_eq!(data.attributes["application_id"], json!("app"));
        assert_eq!(data.attributes["is_super_role"], json!(true));
        assert_eq!(data.attributes["is_default"], json!(false));
    }
}
