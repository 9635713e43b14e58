use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    data_sources::{self, DataSource},
    error::ProviderError,
    resources::{self, Resource},
    schema::{Attribute, Schema},
};

/// Provider level configuration, filled from `FA_DOMAIN` and `FA_API_KEY` when unset.
pub fn provider_schema() -> Schema {
    Schema::new(
        "Manages FusionAuth configuration through its REST API.",
        vec![
            Attribute::string("host")
                .required()
                .describe("Base URL of the FusionAuth instance, FA_DOMAIN."),
            Attribute::string("api_key")
                .required()
                .sensitive()
                .describe("FusionAuth API key, FA_API_KEY."),
        ],
    )
}

/// Registry of every resource and data source type.
pub struct Provider {
    resources: Vec<Box<dyn Resource>>,
    data_sources: Vec<Box<dyn DataSource>>,
}

#[derive(Debug, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<&'static str, Schema>,
    pub data_source_schemas: BTreeMap<&'static str, Schema>,
}

impl Default for Provider {
    fn default() -> Self {
        Provider::new()
    }
}

impl Provider {
    pub fn new() -> Self {
        Provider {
            resources: resources::all(),
            data_sources: data_sources::all(),
        }
    }

    pub fn resource(&self, type_name: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .iter()
            .find(|r| r.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "resource",
                type_name: type_name.to_string(),
            })
    }

    pub fn data_source(&self, type_name: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownType {
                kind: "data source",
                type_name: type_name.to_string(),
            })
    }

    pub fn schemas(&self) -> ProviderSchemas {
        ProviderSchemas {
            provider: provider_schema(),
            resource_schemas: self
                .resources
                .iter()
                .map(|r| (r.type_name(), r.schema()))
                .collect(),
            data_source_schemas: self
                .data_sources
                .iter()
                .map(|d| (d.type_name(), d.schema()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        let provider = Provider::new();
        let schemas = provider.schemas();
        assert_eq!(schemas.resource_schemas.len(), 8 + 14);
        assert_eq!(schemas.data_source_schemas.len(), 8);
        assert_eq!(schemas.resource_schemas["fusionauth_theme"].version, 1);
        assert!(provider.resource("fusionauth_idp_google").is_ok());
        assert!(provider.data_source("fusionauth_idp").is_ok());
        assert!(matches!(
            provider.resource("fusionauth_webhook"),
            Err(ProviderError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_schema_serializes() {
        let json = serde_json::to_value(Provider::new().schemas()).unwrap();
        let lambda = &json["resource_schemas"]["fusionauth_lambda"];
        let attributes = lambda["block"]["attributes"].as_array().unwrap();
        let kind = attributes
            .iter()
            .find(|a| a["name"] == "type")
            .unwrap();
        assert_eq!(kind["type"], "string");
        assert_eq!(kind["required"], true);
    }
}
