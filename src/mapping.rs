//! Schema driven translation between Terraform state and FusionAuth JSON.

use serde_json::{Map, Value};

use crate::{
    error::ProviderError,
    schema::{Attribute, Block, Kind},
};

fn get_path<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(object, |current, segment| current.get(segment))
        .filter(|v| !v.is_null())
}

fn set_path(object: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };
    let mut current = object;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        };
    }
    current.insert(last.to_string(), value);
}

/// Converts every value of a JSON object into a string.
///
/// Terraform maps only hold strings, while FusionAuth freely returns numbers and
/// booleans inside map shaped fields. Nulls are dropped and nested values are
/// serialised as JSON.
pub fn stringify_map_values(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                nested => nested.to_string(),
            };
            Some((key.clone(), Value::String(value)))
        })
        .collect()
}

fn first_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn expand_value(
    attribute: &Attribute,
    path: &str,
    value: &Value,
) -> Result<Option<Value>, ProviderError> {
    let expanded = match &attribute.kind {
        Kind::Json => match value.as_str() {
            Some("") => return Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ProviderError::invalid(path, format!("invalid JSON: {e}")))?,
            None => value.clone(),
        },
        Kind::Block {
            block,
            max_items: Some(1),
        } => match first_object(value) {
            Some(item) => Value::Object(expand_block(block, &format!("{path}.0"), item)?),
            None => return Ok(None),
        },
        Kind::Block { block, .. } => {
            let mut items = Vec::new();
            for (index, item) in value.as_array().into_iter().flatten().enumerate() {
                if let Value::Object(item) = item {
                    items.push(Value::Object(expand_block(
                        block,
                        &format!("{path}.{index}"),
                        item,
                    )?));
                }
            }
            Value::Array(items)
        }
        Kind::KeyedBlocks { block, key } => {
            let mut keyed = Map::new();
            for (index, item) in value.as_array().into_iter().flatten().enumerate() {
                let Value::Object(item) = item else {
                    continue;
                };
                let item_path = format!("{path}.{index}");
                let key_value = item
                    .get(*key)
                    .and_then(Value::as_str)
                    .ok_or_else(|| ProviderError::MissingAttribute {
                        attribute: format!("{item_path}.{key}"),
                    })?;
                keyed.insert(
                    key_value.to_string(),
                    Value::Object(expand_block(block, &item_path, item)?),
                );
            }
            Value::Object(keyed)
        }
        _ => value.clone(),
    };
    Ok(Some(expanded))
}

/// Builds the FusionAuth JSON object for a block from Terraform state.
pub fn expand_block(
    block: &Block,
    prefix: &str,
    state: &Map<String, Value>,
) -> Result<Map<String, Value>, ProviderError> {
    let mut object = Map::new();
    for attribute in &block.attributes {
        let Some(api) = attribute.api else {
            continue;
        };
        let Some(value) = state.get(attribute.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let path = if prefix.is_empty() {
            attribute.name.to_string()
        } else {
            format!("{prefix}.{}", attribute.name)
        };
        if let Some(expanded) = expand_value(attribute, &path, value)? {
            set_path(&mut object, api, expanded);
        }
    }
    Ok(object)
}

pub fn expand(block: &Block, state: &Map<String, Value>) -> Result<Map<String, Value>, ProviderError> {
    expand_block(block, "", state)
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

fn flatten_json(value: &Value, prior: Option<&Value>) -> Value {
    if let Some(prior) = prior.and_then(Value::as_str) {
        if serde_json::from_str::<Value>(prior).ok().as_ref() == Some(value) {
            return Value::String(prior.to_string());
        }
    }
    let unset_before = prior.map_or(true, Value::is_null);
    let empty = match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty && unset_before {
        return Value::Null;
    }
    Value::String(value.to_string())
}

fn flatten_strings(value: &Value) -> Value {
    let items = value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| match item {
            Value::String(s) => Some(Value::String(s.clone())),
            Value::Null => None,
            other => Some(Value::String(other.to_string())),
        })
        .collect();
    Value::Array(items)
}

fn flatten_value(attribute: &Attribute, value: &Value, prior: Option<&Value>) -> Value {
    match &attribute.kind {
        Kind::String => match value {
            Value::String(_) => value.clone(),
            other => Value::String(other.to_string()),
        },
        Kind::Int => value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .map_or(Value::Null, Value::from),
        Kind::Float => value.as_f64().map_or(Value::Null, Value::from),
        Kind::Bool => value.as_bool().map_or(Value::Null, Value::from),
        Kind::Json => flatten_json(value, prior),
        Kind::StringList | Kind::StringSet => flatten_strings(value),
        Kind::StringMap => match value {
            Value::Object(map) => Value::Object(stringify_map_values(map)),
            _ => Value::Null,
        },
        Kind::Block {
            block,
            max_items: Some(1),
        } => match value.as_object() {
            Some(object) => {
                let prior = prior.and_then(first_object).unwrap_or(empty_map());
                if object.is_empty() && prior.is_empty() {
                    Value::Null
                } else {
                    Value::Array(vec![Value::Object(flatten(block, value, prior))])
                }
            }
            None => Value::Null,
        },
        Kind::Block { block, .. } => {
            let prior_items = prior.and_then(Value::as_array);
            let items = value
                .as_array()
                .into_iter()
                .flatten()
                .enumerate()
                .map(|(index, item)| {
                    let prior = prior_items
                        .and_then(|items| items.get(index))
                        .and_then(Value::as_object)
                        .unwrap_or(empty_map());
                    Value::Object(flatten(block, item, prior))
                })
                .collect();
            Value::Array(items)
        }
        Kind::KeyedBlocks { block, key } => {
            let prior_items = prior.and_then(Value::as_array);
            let mut entries: Vec<_> = value.as_object().into_iter().flatten().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let items = entries
                .into_iter()
                .map(|(key_value, item)| {
                    let prior = prior_items
                        .into_iter()
                        .flatten()
                        .filter_map(Value::as_object)
                        .find(|p| p.get(*key).and_then(Value::as_str) == Some(key_value.as_str()))
                        .unwrap_or(empty_map());
                    let mut flattened = flatten(block, item, prior);
                    flattened.insert(key.to_string(), Value::String(key_value.clone()));
                    Value::Object(flattened)
                })
                .collect();
            Value::Array(items)
        }
    }
}

/// Builds Terraform state for a block from a FusionAuth JSON object.
///
/// `prior` is the state (or configuration) the object is replacing; it supplies the
/// value of attributes FusionAuth never returns.
pub fn flatten(block: &Block, object: &Value, prior: &Map<String, Value>) -> Map<String, Value> {
    let mut state = Map::new();
    for attribute in &block.attributes {
        let prior_value = prior.get(attribute.name);
        let value = match attribute.api {
            Some(api) if !attribute.write_only => match get_path(object, api) {
                Some(value) => flatten_value(attribute, value, prior_value),
                None => attribute.default.clone().unwrap_or(Value::Null),
            },
            _ => prior_value.cloned().unwrap_or(Value::Null),
        };
        state.insert(attribute.name.to_string(), value);
    }
    state
}
