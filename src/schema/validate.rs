use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

lazy_static! {
    static ref FORM_FIELD_KEY: Regex =
        Regex::new(r"^(user|registration)\.(data(\.[A-Za-z0-9_\-]+)+|[A-Za-z][A-Za-z0-9]*)$")
            .expect("form field key pattern");
}

/// Static checks attached to attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Validator {
    OneOf(&'static [&'static str]),
    Uuid,
    /// Value must itself compile as a regular expression
    Regex,
    /// FusionAuth form field key
    Key,
    IntBetween(i64, i64),
    Url,
    Json,
}

impl Validator {
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Validator::OneOf(allowed) => {
                let value = expect_str(value)?;
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(format!("expected one of {allowed:?}, got {value:?}"))
                }
            }
            Validator::Uuid => {
                let value = expect_str(value)?;
                Uuid::parse_str(value)
                    .map(|_| ())
                    .map_err(|e| format!("{value:?} is not a valid UUID: {e}"))
            }
            Validator::Regex => validate_regex(expect_str(value)?),
            Validator::Key => validate_key(expect_str(value)?),
            Validator::IntBetween(min, max) => {
                let value = value
                    .as_i64()
                    .ok_or_else(|| format!("expected an integer, got {value}"))?;
                if (*min..=*max).contains(&value) {
                    Ok(())
                } else {
                    Err(format!("expected a value between {min} and {max}, got {value}"))
                }
            }
            Validator::Url => {
                let value = expect_str(value)?;
                Url::parse(value)
                    .map(|_| ())
                    .map_err(|e| format!("{value:?} is not a valid URL: {e}"))
            }
            Validator::Json => {
                let value = expect_str(value)?;
                if value.is_empty() {
                    return Ok(());
                }
                serde_json::from_str::<Value>(value)
                    .map(|_| ())
                    .map_err(|e| format!("invalid JSON: {e}"))
            }
        }
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a string, got {value}"))
}

/// Checks that `key` addresses a user or registration field the way FusionAuth
/// form fields expect, for example `user.email` or `registration.data.favoriteColor`.
pub fn validate_key(key: &str) -> Result<(), String> {
    // `data` on its own is the container, not a field
    if FORM_FIELD_KEY.is_match(key) && !matches!(key, "user.data" | "registration.data") {
        Ok(())
    } else {
        Err(format!(
            "{key:?} must be user.<field>, user.data.<name>, registration.<field> or registration.data.<name>"
        ))
    }
}

pub fn validate_regex(expression: &str) -> Result<(), String> {
    Regex::new(expression)
        .map(|_| ())
        .map_err(|e| format!("{expression:?} is not a valid regular expression: {e}"))
}
