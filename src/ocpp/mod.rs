//! OCPP wire payloads
//!
//! Only OCPP 1.6-J is spoken. Payload structs are plain serde types with
//! camelCase field names; every request type implements `Default` so an
//! empty payload can be dispatched without decoding.

pub mod v16;

/// Binds a request payload type to its OCPP action name.
pub trait Action {
    const NAME: &'static str;
}

/// Schema name of an action's request payload.
pub fn request_schema(action: &str) -> String {
    format!("ocpp16/{}Request.json", action)
}

/// Schema name of an action's response payload.
pub fn response_schema(action: &str) -> String {
    format!("ocpp16/{}Response.json", action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_follow_action() {
        assert_eq!(request_schema("Heartbeat"), "ocpp16/HeartbeatRequest.json");
        assert_eq!(
            response_schema("SendLocalList"),
            "ocpp16/SendLocalListResponse.json"
        );
    }
}
