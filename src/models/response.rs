/*---------- Imports ----------*/
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// What a handler resolves with. Every field is optional; the adapter fills
/// in the status code and merges the instance defaults when it shapes the
/// final envelope.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerResponse {
    pub status_code: Option<u16>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HandlerResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Instance-level fields merged into every envelope, under whatever the
/// handler produced. Headers are the exception: they merge key by key, the
/// handler winning on conflict.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ResponseDefaults {
    pub headers: HashMap<String, String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// The envelope handed back to the gateway. Exactly one is produced per
/// invocation, on the success and the failure path alike.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseEnvelope {
    /// Merges handler output over the instance defaults. `default_status`
    /// applies only when the handler did not set a status code itself; the
    /// defaults never override the computed status.
    pub fn build(
        output: HandlerResponse,
        default_status: u16,
        defaults: &ResponseDefaults,
    ) -> Self {
        let mut extra = defaults.fields.clone();
        let default_body = extra.remove("body");
        extra.remove("statusCode");
        for (name, value) in output.extra {
            extra.insert(name, value);
        }

        let mut headers = defaults.headers.clone();
        headers.extend(output.headers);

        Self {
            status_code: output.status_code.unwrap_or(default_status),
            body: output.body.or(default_body).map(stringify_body),
            headers,
            extra,
        }
    }
}

fn stringify_body(body: Value) -> Value {
    if body.is_string() {
        return body;
    }

    match serde_json::to_string(&body) {
        Ok(serialized) => Value::String(serialized),
        Err(err) => {
            error!("could not stringify body: {}", err);
            body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults_from(value: Value) -> ResponseDefaults {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn object_body_is_serialized_to_a_json_string() {
        let output = HandlerResponse::new().body(json!({ "a": 1 }));

        let envelope = ResponseEnvelope::build(output, 200, &ResponseDefaults::default());

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body, Some(Value::String("{\"a\":1}".to_owned())));
    }

    #[test]
    fn string_body_is_left_untouched() {
        let output = HandlerResponse::new().body("DONE!");

        let envelope = ResponseEnvelope::build(output, 200, &ResponseDefaults::default());

        assert_eq!(envelope.body, Some(Value::String("DONE!".to_owned())));
    }

    #[test]
    fn handler_status_overrides_the_default() {
        let output = HandlerResponse::new().status(201);

        let envelope = ResponseEnvelope::build(output, 200, &ResponseDefaults::default());

        assert_eq!(envelope.status_code, 201);
    }

    #[test]
    fn headers_merge_key_by_key() {
        let defaults = defaults_from(json!({ "headers": { "X-A": "1" } }));
        let output = HandlerResponse::new().header("X-B", "2");

        let envelope = ResponseEnvelope::build(output, 200, &defaults);

        assert_eq!(envelope.headers.get("X-A").unwrap(), "1");
        assert_eq!(envelope.headers.get("X-B").unwrap(), "2");
    }

    #[test]
    fn handler_headers_win_on_conflict() {
        let defaults = defaults_from(json!({ "headers": { "X-A": "default" } }));
        let output = HandlerResponse::new().header("X-A", "handler");

        let envelope = ResponseEnvelope::build(output, 200, &defaults);

        assert_eq!(envelope.headers.get("X-A").unwrap(), "handler");
    }

    #[test]
    fn default_fields_sit_under_handler_fields() {
        let defaults = defaults_from(json!({ "isBase64Encoded": false, "tag": "default" }));
        let output = HandlerResponse::new().field("tag", "handler");

        let envelope = ResponseEnvelope::build(output, 200, &defaults);

        assert_eq!(envelope.extra.get("isBase64Encoded").unwrap(), &json!(false));
        assert_eq!(envelope.extra.get("tag").unwrap(), &json!("handler"));
    }

    #[test]
    fn default_body_applies_when_handler_sets_none() {
        let defaults = defaults_from(json!({ "body": { "fallback": true } }));

        let envelope =
            ResponseEnvelope::build(HandlerResponse::new(), 200, &defaults);

        assert_eq!(
            envelope.body,
            Some(Value::String("{\"fallback\":true}".to_owned()))
        );
    }

    #[test]
    fn envelope_serializes_with_camel_case_and_flattened_extras() {
        let defaults = defaults_from(json!({ "isBase64Encoded": false }));
        let output = HandlerResponse::new().body("ok").header("X-A", "1");

        let envelope = ResponseEnvelope::build(output, 200, &defaults);
        let serialized = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            serialized,
            json!({
                "statusCode": 200,
                "body": "ok",
                "headers": { "X-A": "1" },
                "isBase64Encoded": false
            })
        );
    }
}
