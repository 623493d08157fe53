//! OCPP-J message framing
//!
//! - **Call**       `[2, "<uniqueId>", "<action>", {<payload>}]`
//! - **CallResult** `[3, "<uniqueId>", {<payload>}]`
//! - **CallError**  `[4, "<uniqueId>", "<errorCode>", "<errorDescription>", {<errorDetails>}]`
//!
//! The router works on raw payload bytes, so frames convert their payload
//! to and from bytes at the edge. A `null` or missing payload becomes an
//! empty byte slice ("no body").

use serde_json::Value;
use thiserror::Error;

const MSG_TYPE_CALL: u64 = 2;
const MSG_TYPE_CALL_RESULT: u64 = 3;
const MSG_TYPE_CALL_ERROR: u64 = 4;

/// A parsed OCPP-J frame.
#[derive(Debug, Clone, PartialEq)]
pub enum OcppFrame {
    Call {
        unique_id: String,
        action: String,
        payload: Value,
    },
    CallResult {
        unique_id: String,
        payload: Value,
    },
    CallError {
        unique_id: String,
        error_code: String,
        error_description: String,
        error_details: Value,
    },
}

/// Errors that can occur when parsing an OCPP-J frame.
#[derive(Debug, Error)]
pub enum OcppFrameError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Frame is not a JSON array")]
    NotAnArray,
    #[error("Empty OCPP message array")]
    EmptyArray,
    #[error("Message type is not a number")]
    InvalidMessageType,
    #[error("Unknown message type: {0}")]
    UnknownMessageType(u64),
    #[error("Expected at least {expected} fields, got {got}")]
    MissingFields { expected: usize, got: usize },
    #[error("Field type mismatch: {0}")]
    FieldTypeMismatch(&'static str),
}

impl OcppFrame {
    /// Parse raw JSON text into an `OcppFrame`.
    pub fn parse(text: &str) -> Result<Self, OcppFrameError> {
        let value: Value = serde_json::from_str(text)?;
        let arr = value.as_array().ok_or(OcppFrameError::NotAnArray)?;
        let msg_type = arr
            .first()
            .ok_or(OcppFrameError::EmptyArray)?
            .as_u64()
            .ok_or(OcppFrameError::InvalidMessageType)?;

        match msg_type {
            MSG_TYPE_CALL => {
                require_len(arr, 4)?;
                Ok(Self::Call {
                    unique_id: string_at(arr, 1, "uniqueId must be a string")?,
                    action: string_at(arr, 2, "action must be a string")?,
                    payload: arr[3].clone(),
                })
            }
            MSG_TYPE_CALL_RESULT => {
                require_len(arr, 2)?;
                Ok(Self::CallResult {
                    unique_id: string_at(arr, 1, "uniqueId must be a string")?,
                    payload: arr.get(2).cloned().unwrap_or(Value::Null),
                })
            }
            MSG_TYPE_CALL_ERROR => {
                require_len(arr, 3)?;
                Ok(Self::CallError {
                    unique_id: string_at(arr, 1, "uniqueId must be a string")?,
                    error_code: string_at(arr, 2, "errorCode must be a string")?,
                    error_description: arr
                        .get(3)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    error_details: arr.get(4).cloned().unwrap_or_else(empty_object),
                })
            }
            other => Err(OcppFrameError::UnknownMessageType(other)),
        }
    }

    /// Serialize this frame to a JSON string.
    pub fn serialize(&self) -> String {
        let arr = match self {
            Self::Call {
                unique_id,
                action,
                payload,
            } => Value::Array(vec![
                MSG_TYPE_CALL.into(),
                unique_id.as_str().into(),
                action.as_str().into(),
                payload.clone(),
            ]),
            Self::CallResult { unique_id, payload } => Value::Array(vec![
                MSG_TYPE_CALL_RESULT.into(),
                unique_id.as_str().into(),
                payload.clone(),
            ]),
            Self::CallError {
                unique_id,
                error_code,
                error_description,
                error_details,
            } => Value::Array(vec![
                MSG_TYPE_CALL_ERROR.into(),
                unique_id.as_str().into(),
                error_code.as_str().into(),
                error_description.as_str().into(),
                error_details.clone(),
            ]),
        };
        arr.to_string()
    }

    /// Build a `Call` frame from already-encoded payload bytes.
    pub fn call(
        unique_id: impl Into<String>,
        action: impl Into<String>,
        payload: &[u8],
    ) -> Result<Self, OcppFrameError> {
        Ok(Self::Call {
            unique_id: unique_id.into(),
            action: action.into(),
            payload: value_from_bytes(payload)?,
        })
    }

    /// Build a `CallResult` frame. `None` (handler produced no response)
    /// is sent as an empty object, since every Call must be answered.
    pub fn call_result(
        unique_id: impl Into<String>,
        payload: Option<&[u8]>,
    ) -> Result<Self, OcppFrameError> {
        let payload = match payload {
            Some(bytes) if !bytes.is_empty() => serde_json::from_slice(bytes)?,
            _ => empty_object(),
        };
        Ok(Self::CallResult {
            unique_id: unique_id.into(),
            payload,
        })
    }

    /// Create a `CallError` response for a given unique ID.
    pub fn error_response(
        unique_id: impl Into<String>,
        error_code: impl Into<String>,
        error_description: impl Into<String>,
    ) -> Self {
        Self::CallError {
            unique_id: unique_id.into(),
            error_code: error_code.into(),
            error_description: error_description.into(),
            error_details: empty_object(),
        }
    }

    pub fn unique_id(&self) -> &str {
        match self {
            Self::Call { unique_id, .. }
            | Self::CallResult { unique_id, .. }
            | Self::CallError { unique_id, .. } => unique_id,
        }
    }
}

/// Convert a frame payload into router bytes. `null` means no body.
pub fn payload_bytes(payload: &Value) -> Vec<u8> {
    if payload.is_null() {
        return Vec::new();
    }
    payload.to_string().into_bytes()
}

fn value_from_bytes(bytes: &[u8]) -> Result<Value, OcppFrameError> {
    if bytes.is_empty() {
        return Ok(empty_object());
    }
    Ok(serde_json::from_slice(bytes)?)
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn require_len(arr: &[Value], expected: usize) -> Result<(), OcppFrameError> {
    if arr.len() < expected {
        return Err(OcppFrameError::MissingFields {
            expected,
            got: arr.len(),
        });
    }
    Ok(())
}

fn string_at(arr: &[Value], index: usize, msg: &'static str) -> Result<String, OcppFrameError> {
    arr.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(OcppFrameError::FieldTypeMismatch(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_call() {
        let text = r#"[2,"abc123","MeterValues",{"connectorId":1,"meterValue":[]}]"#;
        match OcppFrame::parse(text).unwrap() {
            OcppFrame::Call {
                unique_id,
                action,
                payload,
            } => {
                assert_eq!(unique_id, "abc123");
                assert_eq!(action, "MeterValues");
                assert_eq!(payload["connectorId"], 1);
            }
            other => panic!("Expected Call frame, got {:?}", other),
        }
    }

    #[test]
    fn parse_call_result_without_payload() {
        let frame = OcppFrame::parse(r#"[3,"abc123"]"#).unwrap();
        match frame {
            OcppFrame::CallResult { unique_id, payload } => {
                assert_eq!(unique_id, "abc123");
                assert!(payload_bytes(&payload).is_empty());
            }
            other => panic!("Expected CallResult frame, got {:?}", other),
        }
    }

    #[test]
    fn parse_call_error() {
        let text = r#"[4,"abc123","NotImplemented","Action not supported",{}]"#;
        match OcppFrame::parse(text).unwrap() {
            OcppFrame::CallError {
                error_code,
                error_description,
                ..
            } => {
                assert_eq!(error_code, "NotImplemented");
                assert_eq!(error_description, "Action not supported");
            }
            other => panic!("Expected CallError frame, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(
            OcppFrame::parse("{}"),
            Err(OcppFrameError::NotAnArray)
        ));
        assert!(matches!(
            OcppFrame::parse("[]"),
            Err(OcppFrameError::EmptyArray)
        ));
        assert!(matches!(
            OcppFrame::parse(r#"[9,"x"]"#),
            Err(OcppFrameError::UnknownMessageType(9))
        ));
        assert!(matches!(
            OcppFrame::parse(r#"[2,"x","Heartbeat"]"#),
            Err(OcppFrameError::MissingFields { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn call_result_without_response_is_empty_object() {
        let frame = OcppFrame::call_result("id1", None).unwrap();
        assert_eq!(frame.serialize(), r#"[3,"id1",{}]"#);
    }

    #[test]
    fn call_from_bytes_serializes_action() {
        let frame = OcppFrame::call("id2", "GetLocalListVersion", b"").unwrap();
        assert_eq!(frame.serialize(), r#"[2,"id2","GetLocalListVersion",{}]"#);
    }
}
