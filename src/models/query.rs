/*---------- Imports ----------*/
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for a one-shot database read. A bare path string converts into the
/// record form via `From`, so `get_db("sites/123")` and
/// `get_db(QueryOptions::at("sites/123"))` describe the same query.
///
/// When several operators are set they are applied in a fixed order:
/// orderByChild, orderByKey, orderByValue, limitToLast, limitToFirst, equalTo.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    #[serde(rename = "ref")]
    pub path: String,
    pub order_by_child: Option<String>,
    pub order_by_key: bool,
    pub order_by_value: bool,
    pub limit_to_last: Option<u32>,
    pub limit_to_first: Option<u32>,
    pub equal_to: Option<Value>,
}

impl QueryOptions {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn order_by_child(mut self, field: impl Into<String>) -> Self {
        self.order_by_child = Some(field.into());
        self
    }

    pub fn order_by_key(mut self) -> Self {
        self.order_by_key = true;
        self
    }

    pub fn order_by_value(mut self) -> Self {
        self.order_by_value = true;
        self
    }

    pub fn limit_to_last(mut self, count: u32) -> Self {
        self.limit_to_last = Some(count);
        self
    }

    pub fn limit_to_first(mut self, count: u32) -> Self {
        self.limit_to_first = Some(count);
        self
    }

    pub fn equal_to(mut self, value: impl Into<Value>) -> Self {
        self.equal_to = Some(value.into());
        self
    }
}

impl From<&str> for QueryOptions {
    fn from(path: &str) -> Self {
        Self::at(path)
    }
}

impl From<String> for QueryOptions {
    fn from(path: String) -> Self {
        Self::at(path)
    }
}
