//! Small convenience constructors for common types.

use serde_json::{Map, Value, json};

use crate::{CallRequest, ToolArguments};

/// Converts a JSON value into call arguments. Anything other than an object
/// yields an empty mapping.
pub fn arguments(value: Value) -> ToolArguments {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn call(id: impl Into<String>, name: impl Into<String>, arguments_json: Value) -> CallRequest {
    CallRequest::new(id, name, arguments(arguments_json))
}

/// Parameter schema of `type: object` with the given properties.
pub fn object_schema(properties: Value, required: &[&str]) -> Value {
    let properties = match properties {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    if required.is_empty() {
        json!({"type": "object", "properties": properties})
    } else {
        json!({"type": "object", "properties": properties, "required": required})
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{arguments, call, object_schema};
    use crate::ToolContract;

    #[test]
    fn call_helper_keeps_object_arguments() {
        let request = call("toolu_1", "echo", json!({"message": "hi"}));
        assert_eq!(request.id, "toolu_1");
        assert_eq!(request.arguments.get("message"), Some(&json!("hi")));

        assert!(arguments(json!(["not", "an", "object"])).is_empty());
    }

    #[test]
    fn object_schema_produces_valid_contracts() {
        let schema = object_schema(json!({"path": {"type": "string"}}), &["path"]);
        assert_eq!(schema["required"], json!(["path"]));

        let contract = ToolContract::new("read_file", "Read a file", schema);
        assert!(contract.validate().is_ok());

        let bare = object_schema(json!(null), &[]);
        assert_eq!(bare, json!({"type": "object", "properties": {}}));
    }
}
