//! Schema model shared by every resource and data source.
//!
//! An [`Attribute`] carries both the Terraform side (name, kind, flags, validators)
//! and the FusionAuth side (`api`, a dotted path relative to the enclosing JSON
//! object). The generic mapping in [`crate::mapping`] is driven entirely by it.

mod validate;

use serde::Serialize;
use serde_json::{Map, Value};

pub use validate::{validate_key, validate_regex, Validator};

use crate::diagnostics::{Diagnostic, Diagnostics};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kind {
    String,
    Int,
    Float,
    Bool,
    /// String holding serialised JSON, sent to FusionAuth as a JSON value
    Json,
    StringList,
    StringSet,
    StringMap,
    /// List of nested objects, `max_items = 1` maps to a single JSON object
    Block {
        block: Block,
        max_items: Option<usize>,
    },
    /// Set of nested objects mapped to a JSON object keyed by the `key` attribute
    KeyedBlocks { block: Block, key: &'static str },
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: Kind,
    #[serde(skip)]
    pub api: Option<&'static str>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub force_new: bool,
    #[serde(skip)]
    pub write_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    fn new(name: &'static str, kind: Kind) -> Self {
        Attribute {
            name,
            kind,
            api: None,
            required: false,
            optional: true,
            computed: false,
            sensitive: false,
            force_new: false,
            write_only: false,
            default: None,
            deprecated: None,
            validators: Vec::new(),
            description: "",
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, Kind::String)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, Kind::Int)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, Kind::Float)
    }

    pub fn bool(name: &'static str) -> Self {
        Self::new(name, Kind::Bool)
    }

    pub fn json(name: &'static str) -> Self {
        Self::new(name, Kind::Json).validate(Validator::Json)
    }

    pub fn string_list(name: &'static str) -> Self {
        Self::new(name, Kind::StringList)
    }

    pub fn string_set(name: &'static str) -> Self {
        Self::new(name, Kind::StringSet)
    }

    pub fn string_map(name: &'static str) -> Self {
        Self::new(name, Kind::StringMap)
    }

    /// Nested block holding at most one element.
    pub fn single(name: &'static str, attributes: Vec<Attribute>) -> Self {
        Self::new(
            name,
            Kind::Block {
                block: Block::new(attributes),
                max_items: Some(1),
            },
        )
    }

    pub fn list(name: &'static str, attributes: Vec<Attribute>) -> Self {
        Self::new(
            name,
            Kind::Block {
                block: Block::new(attributes),
                max_items: None,
            },
        )
    }

    pub fn keyed(name: &'static str, key: &'static str, attributes: Vec<Attribute>) -> Self {
        Self::new(
            name,
            Kind::KeyedBlocks {
                block: Block::new(attributes),
                key,
            },
        )
    }

    pub fn api(mut self, path: &'static str) -> Self {
        self.api = Some(path);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    /// Optional, and filled in from the server when left unset.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Only ever set by the server.
    pub fn computed_only(mut self) -> Self {
        self.required = false;
        self.optional = false;
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Sent to the server but never read back.
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn one_of(self, values: &'static [&'static str]) -> Self {
        self.validate(Validator::OneOf(values))
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn nested(&self) -> Option<&Block> {
        match &self.kind {
            Kind::Block { block, .. } | Kind::KeyedBlocks { block, .. } => Some(block),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Block {
    pub attributes: Vec<Attribute>,
}

impl Block {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Block { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Rewrites a resource block for use by a data source: every attribute becomes
    /// server-computed except the lookup attributes, which become optional inputs.
    pub fn computed_view(&self, lookups: &[&str]) -> Block {
        let attributes = self
            .attributes
            .iter()
            .map(|attribute| {
                let mut attribute = attribute.clone();
                attribute.default = None;
                attribute.deprecated = None;
                attribute.force_new = false;
                attribute.write_only = false;
                if lookups.contains(&attribute.name) {
                    attribute.required = false;
                    attribute.optional = true;
                    attribute.computed = true;
                } else {
                    attribute.validators.clear();
                    attribute.required = false;
                    attribute.optional = false;
                    attribute.computed = true;
                }
                if let Kind::Block { block, .. } | Kind::KeyedBlocks { block, .. } =
                    &mut attribute.kind
                {
                    *block = block.computed_view(&[]);
                }
                attribute
            })
            .collect();
        Block { attributes }
    }

    /// Fills unset optional attributes with their defaults, recursing into present blocks.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for attribute in &self.attributes {
            let unset = config.get(attribute.name).map_or(true, Value::is_null);
            if unset {
                if let Some(default) = &attribute.default {
                    config.insert(attribute.name.to_string(), default.clone());
                }
                continue;
            }
            if let (Some(block), Some(Value::Array(items))) =
                (attribute.nested(), config.get_mut(attribute.name))
            {
                for item in items.iter_mut() {
                    if let Value::Object(item) = item {
                        block.apply_defaults(item);
                    }
                }
            }
        }
    }

    /// The part of instance state a user configures. Computed-only attributes are
    /// dropped, including inside nested blocks.
    pub fn configurable(&self, state: &Map<String, Value>) -> Map<String, Value> {
        let mut config = Map::new();
        for attribute in &self.attributes {
            if !attribute.optional && !attribute.required {
                continue;
            }
            let Some(value) = state.get(attribute.name) else {
                continue;
            };
            let value = match (attribute.nested(), value) {
                (Some(block), Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Object(item) => Value::Object(block.configurable(item)),
                            other => other.clone(),
                        })
                        .collect(),
                ),
                _ => value.clone(),
            };
            config.insert(attribute.name.to_string(), value);
        }
        config
    }

    /// Checks a configuration object against this block.
    pub fn validate(&self, prefix: &str, config: &Map<String, Value>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for attribute in &self.attributes {
            let path = if prefix.is_empty() {
                attribute.name.to_string()
            } else {
                format!("{prefix}.{}", attribute.name)
            };
            let value = config.get(attribute.name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if attribute.required {
                    diagnostics.push(
                        Diagnostic::error(format!("Missing required attribute {path}")).at(path),
                    );
                }
                continue;
            };
            if !attribute.optional && !attribute.required {
                diagnostics.push(
                    Diagnostic::error(format!("Attribute {path} is computed and cannot be set"))
                        .at(path),
                );
                continue;
            }
            if let Some(message) = attribute.deprecated {
                diagnostics.push(
                    Diagnostic::warning(format!("Attribute {path} is deprecated"))
                        .with_detail(message)
                        .at(path.clone()),
                );
            }
            diagnostics.extend(validate_value(attribute, &path, value));
        }
        diagnostics
    }
}

fn type_error(path: &str, expected: &str) -> Diagnostics {
    std::iter::once(
        Diagnostic::error(format!("Attribute {path} must be {expected}")).at(path.to_string()),
    )
    .collect()
}

fn validate_value(attribute: &Attribute, path: &str, value: &Value) -> Diagnostics {
    let shape_ok = match &attribute.kind {
        Kind::String | Kind::Json => value.is_string(),
        Kind::Int => value.is_i64() || value.is_u64(),
        Kind::Float => value.is_number(),
        Kind::Bool => value.is_boolean(),
        Kind::StringList | Kind::StringSet => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        Kind::StringMap => value
            .as_object()
            .is_some_and(|items| items.values().all(Value::is_string)),
        Kind::Block { .. } | Kind::KeyedBlocks { .. } => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_object)),
    };
    if !shape_ok {
        let expected = match &attribute.kind {
            Kind::String | Kind::Json => "a string",
            Kind::Int => "an integer",
            Kind::Float => "a number",
            Kind::Bool => "a boolean",
            Kind::StringList | Kind::StringSet => "a list of strings",
            Kind::StringMap => "a map of strings",
            Kind::Block { .. } | Kind::KeyedBlocks { .. } => "a list of blocks",
        };
        return type_error(path, expected);
    }

    let mut diagnostics = Diagnostics::new();
    let scalars: Vec<&Value> = match value {
        Value::Array(items) if attribute.nested().is_none() => items.iter().collect(),
        Value::Array(_) | Value::Object(_) => Vec::new(),
        scalar => vec![scalar],
    };
    for scalar in scalars {
        for validator in &attribute.validators {
            if let Err(reason) = validator.check(scalar) {
                diagnostics.push(
                    Diagnostic::error(format!("Invalid value for {path}"))
                        .with_detail(reason)
                        .at(path.to_string()),
                );
            }
        }
    }

    match &attribute.kind {
        Kind::Block { block, max_items } => {
            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
            if let Some(max) = max_items {
                if items.len() > *max {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "Block {path} accepts at most {max} element(s), got {}",
                            items.len()
                        ))
                        .at(path.to_string()),
                    );
                }
            }
            for (index, item) in items.iter().enumerate() {
                if let Value::Object(item) = item {
                    diagnostics.extend(block.validate(&format!("{path}.{index}"), item));
                }
            }
        }
        Kind::KeyedBlocks { block, key } => {
            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
            let mut seen = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if let Value::Object(item) = item {
                    diagnostics.extend(block.validate(&format!("{path}.{index}"), item));
                    if let Some(key_value) = item.get(*key).and_then(Value::as_str) {
                        if seen.contains(&key_value) {
                            diagnostics.push(
                                Diagnostic::error(format!(
                                    "Duplicate {key} {key_value} in {path}"
                                ))
                                .at(format!("{path}.{index}.{key}")),
                            );
                        }
                        seen.push(key_value);
                    }
                }
            }
        }
        _ => {}
    }
    diagnostics
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub version: i64,
    pub description: &'static str,
    pub block: Block,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Schema {
            version: 0,
            description,
            block: Block::new(attributes),
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn validate(&self, config: &Map<String, Value>) -> Diagnostics {
        self.block.validate("", config)
    }

    /// Checks instance state ahead of a create or update. State read back from
    /// FusionAuth carries computed-only values, which are left out.
    pub fn validate_state(&self, state: &Map<String, Value>) -> Diagnostics {
        self.block.validate("", &self.block.configurable(state))
    }

    pub fn computed_view(&self, description: &'static str, lookups: &[&str]) -> Schema {
        Schema {
            version: 0,
            description,
            block: self.block.computed_view(lookups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(
            "test",
            vec![
                Attribute::string("name").api("name").required(),
                Attribute::string("id").api("id").computed_only(),
                Attribute::bool("debug").api("debug").default(false),
                Attribute::string("engine_type")
                    .api("engineType")
                    .one_of(&["GraalJS", "Nashorn"]),
                Attribute::string("email_send").deprecated("Use email_sent instead"),
                Attribute::single(
                    "jwt_configuration",
                    vec![Attribute::int("ttl_seconds")
                        .api("timeToLiveInSeconds")
                        .default(3600)
                        .validate(Validator::IntBetween(1, 86400))],
                )
                .api("jwtConfiguration"),
                Attribute::keyed(
                    "application_configuration",
                    "application_id",
                    vec![
                        Attribute::string("application_id").required(),
                        Attribute::bool("enabled").api("enabled"),
                    ],
                )
                .api("applicationConfiguration"),
            ],
        )
    }

    fn config(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("config must be an object"),
        }
    }

    #[test]
    fn test_missing_required_attribute() {
        let diagnostics = schema().validate(&config(json!({})));
        assert!(diagnostics.has_errors());
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.attribute.as_deref(), Some("name"));
    }

    #[test]
    fn test_computed_attribute_cannot_be_set() {
        let diagnostics = schema().validate(&config(json!({ "name": "a", "id": "b" })));
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_state_may_carry_computed_values() {
        let schema = Schema::new(
            "state",
            vec![
                Attribute::string("name").api("name").required(),
                Attribute::bool("verified").api("verified").computed_only(),
                Attribute::single(
                    "oauth_configuration",
                    vec![
                        Attribute::string("client_id").api("clientId").computed_only(),
                        Attribute::bool("debug").api("debug"),
                    ],
                )
                .api("oauthConfiguration"),
            ],
        );
        let state = config(json!({
            "name": "a",
            "verified": true,
            "oauth_configuration": [{ "client_id": "c", "debug": "yes" }]
        }));

        let diagnostics = schema.validate_state(&state);
        let paths: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.clone())
            .collect();
        assert_eq!(paths, vec!["oauth_configuration.0.debug"]);
        assert!(schema.validate(&state).len() > 1);
    }

    #[test]
    fn test_enum_and_nested_validators() {
        let diagnostics = schema().validate(&config(json!({
            "name": "a",
            "engine_type": "V8",
            "jwt_configuration": [{ "ttl_seconds": 0 }]
        })));
        let paths: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.clone())
            .collect();
        assert_eq!(paths, vec!["engine_type", "jwt_configuration.0.ttl_seconds"]);
    }

    #[test]
    fn test_single_block_limit() {
        let diagnostics = schema().validate(&config(json!({
            "name": "a",
            "jwt_configuration": [{}, {}]
        })));
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let diagnostics = schema().validate(&config(json!({
            "name": "a",
            "application_configuration": [
                { "application_id": "x", "enabled": true },
                { "application_id": "x", "enabled": false }
            ]
        })));
        assert!(diagnostics
            .iter()
            .any(|d| d.summary.contains("Duplicate application_id")));
    }

    #[test]
    fn test_deprecated_attribute_warns() {
        let diagnostics = schema().validate(&config(json!({ "name": "a", "email_send": "x" })));
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_apply_defaults_recurses_into_blocks() {
        let mut config = config(json!({ "name": "a", "jwt_configuration": [{}] }));
        schema().block.apply_defaults(&mut config);
        assert_eq!(config["debug"], json!(false));
        assert_eq!(config["jwt_configuration"][0]["ttl_seconds"], json!(3600));
    }

    #[test]
    fn test_computed_view_for_data_sources() {
        let view = schema().computed_view("lookup", &["name"]);
        let name = view.block.get("name").unwrap();
        assert!(name.optional && !name.required);
        let debug = view.block.get("debug").unwrap();
        assert!(debug.computed && !debug.optional && debug.default.is_none());
    }
}
