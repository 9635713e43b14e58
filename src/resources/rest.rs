use async_trait::async_trait;
use serde_json::{Map, Value};

use super::Resource;
use crate::{
    client::{unwrap_envelope, ApiPath, FusionAuthClient},
    error::ProviderError,
    mapping::{expand, flatten},
    schema::Schema,
    state::ResourceData,
};

/// Per resource adjustments to the generic request/response mapping.
pub trait Hooks: Send + Sync {
    /// Called with the expanded object and the top level request body, before the
    /// object is placed into its envelope.
    fn before_send(
        &self,
        _data: &ResourceData,
        _object: &mut Map<String, Value>,
        _body: &mut Map<String, Value>,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Called with the object returned by FusionAuth before it is flattened into state.
    fn after_receive(&self, _object: &Value, _data: &ResourceData) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Migrates state from older schema versions. `version` is never the current one.
    fn upgrade_state(
        &self,
        _version: i64,
        _state: Map<String, Value>,
    ) -> Option<Map<String, Value>> {
        None
    }
}

pub struct NoHooks;

impl Hooks for NoHooks {}

/// A resource backed by one FusionAuth REST collection such as `/api/lambda`.
pub struct RestResource<H = NoHooks> {
    type_name: &'static str,
    path: &'static str,
    envelope: &'static str,
    schema: fn() -> Schema,
    id_attribute: Option<&'static str>,
    tenant_attribute: Option<&'static str>,
    delete_query: &'static [(&'static str, &'static str)],
    hooks: H,
}

impl RestResource<NoHooks> {
    pub fn new(
        type_name: &'static str,
        path: &'static str,
        envelope: &'static str,
        schema: fn() -> Schema,
    ) -> Self {
        RestResource {
            type_name,
            path,
            envelope,
            schema,
            id_attribute: None,
            tenant_attribute: None,
            delete_query: &[],
            hooks: NoHooks,
        }
    }
}

impl<H: Hooks> RestResource<H> {
    /// Attribute that may carry a caller chosen id on create.
    pub fn id_attribute(mut self, name: &'static str) -> Self {
        self.id_attribute = Some(name);
        self
    }

    /// Attribute sent as the `X-FusionAuth-TenantId` header.
    pub fn tenant_attribute(mut self, name: &'static str) -> Self {
        self.tenant_attribute = Some(name);
        self
    }

    pub fn delete_query(mut self, query: &'static [(&'static str, &'static str)]) -> Self {
        self.delete_query = query;
        self
    }

    pub fn hooks<N: Hooks>(self, hooks: N) -> RestResource<N> {
        RestResource {
            type_name: self.type_name,
            path: self.path,
            envelope: self.envelope,
            schema: self.schema,
            id_attribute: self.id_attribute,
            tenant_attribute: self.tenant_attribute,
            delete_query: self.delete_query,
            hooks,
        }
    }

    fn tenant<'a>(&self, data: &'a ResourceData) -> Option<&'a str> {
        self.tenant_attribute.and_then(|name| data.get_str(name))
    }

    fn object_path(&self, id: &str) -> ApiPath {
        ApiPath::new(self.path).segment(id)
    }

    fn request_body(&self, data: &ResourceData) -> Result<Value, ProviderError> {
        let schema = (self.schema)();
        let mut object = expand(&schema.block, &data.attributes)?;
        let mut body = Map::new();
        self.hooks.before_send(data, &mut object, &mut body)?;
        body.insert(self.envelope.to_string(), Value::Object(object));
        Ok(Value::Object(body))
    }

    fn apply_response(
        &self,
        data: &mut ResourceData,
        response: Value,
    ) -> Result<(), ProviderError> {
        let object = unwrap_envelope(response, self.envelope)?;
        self.hooks.after_receive(&object, data)?;
        let schema = (self.schema)();
        data.attributes = flatten(&schema.block, &object, &data.attributes);
        if let Some(id) = object.get("id").and_then(Value::as_str) {
            data.set_id(Some(id.to_string()));
        }
        if let (Some(name), Some(id)) = (self.id_attribute, data.id.clone()) {
            data.set(name, id);
        }
        Ok(())
    }
}

#[async_trait]
impl<H: Hooks> Resource for RestResource<H> {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn schema(&self) -> Schema {
        (self.schema)()
    }

    async fn create(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let body = self.request_body(data)?;
        let path = match self.id_attribute.and_then(|name| data.get_str(name)) {
            Some(id) => self.object_path(id),
            None => ApiPath::new(self.path),
        };
        let response = client.post(path, self.tenant(data), &body).await?;
        self.apply_response(data, response)?;
        tracing::info!(resource = self.type_name, id = ?data.id(), "Created");
        Ok(())
    }

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError> {
        let id = data.require_id()?.to_string();
        let tenant = self.tenant(data).map(str::to_string);
        match client.get(self.object_path(&id), tenant.as_deref()).await {
            Ok(response) => self.apply_response(data, response),
            Err(e) if e.is_not_found() => {
                tracing::warn!(resource = self.type_name, %id, "Object no longer exists, removing from state");
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
        let id = data.require_id()?.to_string();
        let body = self.request_body(data)?;
        let response = client
            .put(self.object_path(&id), self.tenant(data), &body)
            .await?;
        self.apply_response(data, response)?;
        tracing::info!(resource = self.type_name, %id, "Updated");
        Ok(())
    }

    async fn delete(
        &self,
        client: &FusionAuthClient,
        data: &ResourceData,
    ) -> Result<(), ProviderError> {
        let id = data.require_id()?;
        match client
            .delete(self.object_path(id), self.delete_query, self.tenant(data))
            .await
        {
            Ok(()) => {
                tracing::info!(resource = self.type_name, %id, "Deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(resource = self.type_name, %id, "Object already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn upgrade_state(
        &self,
        version: i64,
        state: Map<String, Value>,
    ) -> Result<Map<String, Value>, ProviderError> {
        if version == self.schema().version {
            return Ok(state);
        }
        self.hooks
            .upgrade_state(version, state)
            .ok_or_else(|| ProviderError::UnsupportedSchemaVersion {
                type_name: self.type_name.to_string(),
                version,
            })
    }
}
