use std::{collections::BTreeMap, fmt};

use http::StatusCode;
use serde::Deserialize;

/// Error body returned by FusionAuth on validation failures.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Errors {
    #[serde(default)]
    pub field_errors: BTreeMap<String, Vec<ErrorMessage>>,
    #[serde(default)]
    pub general_errors: Vec<ErrorMessage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl Errors {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.general_errors.is_empty()
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.general_errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        for (field, errors) in &self.field_errors {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {error}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn format_api_error(status: &StatusCode, errors: &Option<Errors>, body: &str) -> String {
    match errors {
        Some(errors) if !errors.is_empty() => format!("status {status}: {errors}"),
        _ if !body.is_empty() => format!("status {status}: {body}"),
        _ => format!("status {status}"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("FusionAuth API request failed with {}", format_api_error(.status, .errors, .body))]
    Api {
        status: StatusCode,
        errors: Option<Errors>,
        /// Raw response body, truncated
        body: String,
    },
    #[error("Response received from FusionAuth was too large, limit of {limit} bytes reached")]
    ResponseTooLarge { limit: usize },
    #[error("HTTP error talking to FusionAuth")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    #[error("Error deserializing json response from FusionAuth")]
    Deserialization {
        #[from]
        source: serde_json::Error,
    },
    #[error("Could not build FusionAuth URL from {base} and {path}")]
    BuildUrl { base: String, path: String },
    #[error("Response from FusionAuth did not contain a {key} object")]
    MissingEnvelope { key: &'static str },
    #[error("Attribute {attribute} is required")]
    MissingAttribute { attribute: String },
    #[error("Attribute {attribute} has an invalid value: {reason}")]
    InvalidAttribute { attribute: String, reason: String },
    #[error("Identity provider {id} has type {actual}, expected {expected}")]
    IdentityProviderType {
        id: String,
        expected: &'static str,
        actual: String,
    },
    #[error("No {kind} found matching {lookup}")]
    NotFound { kind: &'static str, lookup: String },
    #[error("Found {count} {kind} objects matching {lookup}, expected exactly one")]
    Ambiguous {
        kind: &'static str,
        lookup: String,
        count: usize,
    },
    #[error("Cannot upgrade {type_name} state from schema version {version}")]
    UnsupportedSchemaVersion { type_name: String, version: i64 },
    #[error("Unknown {kind} type {type_name}")]
    UnknownType {
        kind: &'static str,
        type_name: String,
    },
    #[error("Resource has no id, it must be created or imported first")]
    MissingId,
    #[error(transparent)]
    Anyhow {
        #[from]
        source: anyhow::Error,
    },
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    pub(crate) fn invalid(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::InvalidAttribute {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}
