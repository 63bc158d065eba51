/*---------- Imports ----------*/
use crate::models::event::GatewayEvent;
use lambda_runtime::Context;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Normalized request handed to handler code. Built once per invocation from
/// the inbound event and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub path: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub identity: Map<String, Value>,
    pub headers: HashMap<String, String>,
    /// Parsed JSON body when the raw body parses, the raw string otherwise,
    /// absent when the event carried no body.
    pub body: Option<Value>,
    pub context: Context,
}

impl HandlerRequest {
    pub fn from_event(event: GatewayEvent, context: Context) -> Self {
        Self {
            path: event.path_parameters,
            query: event.query_string_parameters,
            identity: event.identity,
            headers: event.headers,
            body: event.body.map(parse_body),
            context,
        }
    }
}

fn parse_body(raw: String) -> Value {
    match serde_json::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("body parse failed: {}", err);
            Value::String(raw)
        }
    }
}
