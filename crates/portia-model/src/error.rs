//! Error types for entity models

/// Errors raised while building or editing an entity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Wire representation was not a JSON object
    #[error("cannot build {type_id} from a JSON {found}")]
    NotAnObject {
        type_id: &'static str,
        found: &'static str,
    },

    /// List operation on a field that holds a non-list value
    #[error("field '{field}' does not hold a list")]
    NotAList { field: String },

    /// Login credential written while `init_requests` is empty
    #[error("init_requests is empty; enable login before setting credentials")]
    EmptyInitRequests,

    /// List element was expected to be an object
    #[error("element {index} of '{field}' is not an object")]
    MalformedElement { field: String, index: usize },
}

/// JSON type name used in error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        let err = ModelError::NotAList {
            field: "start_urls".to_string(),
        };
        assert!(err.to_string().contains("start_urls"));

        let err = ModelError::NotAnObject {
            type_id: "spider",
            found: json_type_name(&serde_json::json!([1, 2])),
        };
        assert_eq!(err.to_string(), "cannot build spider from a JSON array");
    }
}
