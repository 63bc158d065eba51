/*---------- Imports ----------*/
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Inbound gateway event. The gateway is free to send more fields than these;
/// only the ones the adapter consumes are modeled, and every mapping defaults
/// to empty when the gateway omits it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayEvent {
    pub body: Option<String>,
    pub path_parameters: HashMap<String, String>,
    pub query_string_parameters: HashMap<String, String>,
    pub identity: Map<String, Value>,
    pub headers: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_mappings_deserialize_as_empty() {
        let event: GatewayEvent = serde_json::from_value(json!({})).unwrap();

        assert!(event.body.is_none());
        assert!(event.path_parameters.is_empty());
        assert!(event.query_string_parameters.is_empty());
        assert!(event.identity.is_empty());
        assert!(event.headers.is_empty());
    }

    #[test]
    fn gateway_fields_are_picked_up() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "body": "{\"a\":1}",
            "pathParameters": { "id": "123" },
            "queryStringParameters": { "page": "2" },
            "identity": { "sub": "user-1" },
            "headers": { "authorization": "Bearer abc" },
            "httpMethod": "POST"
        }))
        .unwrap();

        assert_eq!(event.body.as_deref(), Some("{\"a\":1}"));
        assert_eq!(event.path_parameters.get("id").unwrap(), "123");
        assert_eq!(event.query_string_parameters.get("page").unwrap(), "2");
        assert_eq!(event.identity.get("sub").unwrap(), "user-1");
        assert_eq!(event.headers.get("authorization").unwrap(), "Bearer abc");
    }
}
