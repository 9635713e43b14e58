pub mod application;
pub mod application_role;
pub mod form_field;
pub mod idp;
pub mod lambda;
pub mod registration;
mod rest;
pub mod tenant;
pub mod theme;
pub mod user;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{client::FusionAuthClient, error::ProviderError, schema::Schema, state::ResourceData};

pub use rest::{Hooks, NoHooks, RestResource};

/// A managed FusionAuth object.
///
/// Every operation receives the instance's state and updates it in place. A
/// `read` that finds the object gone clears the id instead of failing.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError>;

    async fn read(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError>;

    async fn update(
        &self,
        client: &FusionAuthClient,
        data: &mut ResourceData,
    ) -> Result<(), ProviderError>;

    /// Deleting an object that no longer exists is not an error
    async fn delete(
        &self,
        client: &FusionAuthClient,
        data: &ResourceData,
    ) -> Result<(), ProviderError>;

    async fn import(
        &self,
        client: &FusionAuthClient,
        id: &str,
    ) -> Result<ResourceData, ProviderError> {
        let mut data = ResourceData::with_id(id);
        self.read(client, &mut data).await?;
        if data.id().is_none() {
            return Err(ProviderError::NotFound {
                kind: self.type_name(),
                lookup: format!("id {id}"),
            });
        }
        Ok(data)
    }

    /// Migrates raw state written by an older schema version.
    fn upgrade_state(
        &self,
        version: i64,
        state: Map<String, Value>,
    ) -> Result<Map<String, Value>, ProviderError> {
        if version == self.schema().version {
            Ok(state)
        } else {
            Err(ProviderError::UnsupportedSchemaVersion {
                type_name: self.type_name().to_string(),
                version,
            })
        }
    }
}

pub fn all() -> Vec<Box<dyn Resource>> {
    let mut resources: Vec<Box<dyn Resource>> = vec![
        Box::new(application::resource()),
        Box::new(application_role::ApplicationRole),
        Box::new(form_field::resource()),
        Box::new(lambda::resource()),
        Box::new(registration::Registration),
        Box::new(tenant::resource()),
        Box::new(theme::resource()),
        Box::new(user::resource()),
    ];
    resources.extend(idp::all());
    resources
}
