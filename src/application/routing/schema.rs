//! Schema validation seam
//!
//! The router validates raw payloads against a named schema before decoding
//! and after encoding. Schema content is supplied by the embedding
//! application through [`SchemaValidator`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    #[error("{0}")]
    Invalid(String),
}

pub trait SchemaValidator: Send + Sync {
    fn validate(&self, payload: &[u8], schema: &str) -> Result<(), SchemaError>;
}

/// Accepts every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveValidator;

impl SchemaValidator for PermissiveValidator {
    fn validate(&self, _payload: &[u8], _schema: &str) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Requires the payload to be a JSON object. Structure beyond that is not
/// checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct WellFormedJsonValidator;

impl SchemaValidator for WellFormedJsonValidator {
    fn validate(&self, payload: &[u8], _schema: &str) -> Result<(), SchemaError> {
        match serde_json::from_slice::<serde_json::Value>(payload) {
            Ok(serde_json::Value::Object(_)) => Ok(()),
            Ok(other) => Err(SchemaError::Invalid(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(SchemaError::Invalid(e.to_string())),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
