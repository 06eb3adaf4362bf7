use serde_json::{Map, Value};

/// One fetched tuple, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Map<String, Value>);

impl Row {
    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }
    pub fn into_value(self) -> Value { Value::Object(self.0) }
}

pub type RowSet = Vec<Row>;
