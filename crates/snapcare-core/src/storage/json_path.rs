//! Dot-path access into serialized documents.
//!
//! Config and profile both expose `get a.b.c` / `set a.b.c value` on the
//! command line. Values are type-checked against what is already stored at
//! the path, so a bool stays a bool and unknown keys are rejected.

use serde_json::Value;
use thiserror::Error;

use crate::error::{ConfigError, ValidationError};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("cannot use '{value}' for '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::UnknownKey(key) => ConfigError::UnknownKey(key),
            PathError::InvalidValue { key, message, .. } => {
                ConfigError::InvalidValue { key, message }
            }
        }
    }
}

impl From<PathError> for ValidationError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::UnknownKey(key) => ValidationError::InvalidValue {
                field: key,
                message: "unknown key".into(),
            },
            PathError::InvalidValue { key, message, .. } => ValidationError::InvalidValue {
                field: key,
                message,
            },
        }
    }
}

pub fn get<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Render the value at `key` as plain text (strings unquoted).
pub fn get_string(root: &Value, key: &str) -> Option<String> {
    match get(root, key)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn set(root: &mut Value, key: &str, value: &str) -> Result<(), PathError> {
    let invalid = |message: String| PathError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message,
    };
    let unknown = || PathError::UnknownKey(key.to_string());

    let mut parts = key.split('.').peekable();
    if key.is_empty() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                Value::Bool(_) => Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(Value::Number)
                            .ok_or_else(|| invalid("not a finite number".into()))?
                    } else {
                        return Err(invalid("not a number".into()));
                    }
                }
                Value::Object(_) | Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "calendar": { "start_hour": 7, "label": "day" },
            "flags": { "enabled": true },
            "items": []
        })
    }

    #[test]
    fn get_walks_nested_objects() {
        let doc = doc();
        assert_eq!(get_string(&doc, "calendar.start_hour").as_deref(), Some("7"));
        assert_eq!(get_string(&doc, "calendar.label").as_deref(), Some("day"));
        assert!(get(&doc, "calendar.missing").is_none());
        assert!(get(&doc, "").is_none());
    }

    #[test]
    fn set_keeps_existing_types() {
        let mut doc = doc();
        set(&mut doc, "calendar.start_hour", "8").unwrap();
        set(&mut doc, "flags.enabled", "false").unwrap();
        set(&mut doc, "calendar.label", "week").unwrap();
        set(&mut doc, "items", "[1,2]").unwrap();
        assert_eq!(doc["calendar"]["start_hour"], json!(8));
        assert_eq!(doc["flags"]["enabled"], json!(false));
        assert_eq!(doc["calendar"]["label"], json!("week"));
        assert_eq!(doc["items"], json!([1, 2]));
    }

    #[test]
    fn set_rejects_unknown_and_mistyped() {
        let mut doc = doc();
        assert_eq!(
            set(&mut doc, "calendar.nope", "1"),
            Err(PathError::UnknownKey("calendar.nope".into()))
        );
        assert!(matches!(
            set(&mut doc, "flags.enabled", "sometimes"),
            Err(PathError::InvalidValue { .. })
        ));
        assert!(set(&mut doc, "calendar.start_hour", "seven").is_err());
        assert!(set(&mut doc, "", "x").is_err());
    }
}
