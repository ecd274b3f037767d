//! Argument helpers for handler authors.
//!
//! ```rust
//! use wtooling::{parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"path":"notes.txt"}"#).expect("object should parse");
//! let path = required_string(&args, "path").expect("path should be present");
//! assert_eq!(path, "notes.txt");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ToolArguments, ToolError};

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::validation(format!("invalid JSON arguments: {err}")))
}

/// Parses raw call arguments. An empty or whitespace-only string is an empty
/// mapping.
pub fn parse_json_object(args_json: &str) -> Result<ToolArguments, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(ToolArguments::new());
    }

    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::validation("expected JSON object arguments")),
    }
}

pub fn required_string(args: &ToolArguments, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::validation(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &ToolArguments, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(ToString::to_string)
}

pub fn required_f64(args: &ToolArguments, key: &str) -> Result<f64, ToolError> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::validation(format!("missing required number: '{key}'")))
}

/// Deserializes the whole mapping into a typed argument struct.
pub fn typed_arguments<T: DeserializeOwned>(args: &ToolArguments) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|err| ToolError::validation(format!("arguments do not match: {err}")))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn parse_object_and_extract_fields() {
        let args = parse_json_object(r#"{"query":"rust","limit":5}"#).expect("args should parse");
        assert_eq!(required_string(&args, "query").expect("query"), "rust");
        assert_eq!(required_f64(&args, "limit").expect("limit"), 5.0);
        assert_eq!(optional_string(&args, "missing"), None);

        let error = required_string(&args, "limit").expect_err("limit is not a string");
        assert_eq!(error.kind, ToolErrorKind::Validation);
    }

    #[test]
    fn blank_arguments_are_an_empty_mapping() {
        assert!(parse_json_object("  ").expect("blank").is_empty());
    }

    #[test]
    fn invalid_or_non_object_json_is_a_validation_error() {
        let error = parse_json_value("{").expect_err("json should fail");
        assert_eq!(error.kind, ToolErrorKind::Validation);

        let error = parse_json_object("[1, 2]").expect_err("array should fail");
        assert!(error.message.contains("expected JSON object"));
    }

    #[test]
    fn typed_arguments_deserialize_into_structs() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Search {
            query: String,
            limit: Option<u32>,
        }

        let args = parse_json_object(r#"{"query":"tokio"}"#).expect("args");
        let search: Search = typed_arguments(&args).expect("typed");
        assert_eq!(
            search,
            Search {
                query: "tokio".to_string(),
                limit: None
            }
        );

        let args = parse_json_object(r#"{"limit":3}"#).expect("args");
        assert!(typed_arguments::<Search>(&args).is_err());
    }
}
