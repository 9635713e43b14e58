use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// State (or configuration) of a single resource or data source instance.
///
/// `id` is the FusionAuth object id. An instance whose `id` is cleared by a read
/// no longer exists and is dropped from state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(attributes: Map<String, Value>) -> Self {
        ResourceData {
            id: None,
            attributes,
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        ResourceData {
            id: Some(id.into()),
            attributes: Map::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn require_id(&self) -> Result<&str, ProviderError> {
        self.id().ok_or(ProviderError::MissingId)
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Attribute value, treating explicit nulls as unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ProviderError> {
        self.get_str(name)
            .ok_or_else(|| ProviderError::MissingAttribute {
                attribute: name.to_string(),
            })
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Looks up a nested value by Terraform path, e.g. `oauth_configuration.0.client_secret`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.attributes.get(first)?;
        for segment in segments {
            current = match current {
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current).filter(|v| !v.is_null())
    }
}
