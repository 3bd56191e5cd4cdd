//! Schema-less attribute bag attached to every catalog product.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub type Attributes = BTreeMap<String, AttributeValue>;

/// A scalar attribute value. Formulas validate the specific fields they need.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
	Bool(bool),
	Number(f64),
	Text(String),
}
impl From<f64> for AttributeValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}
impl From<i64> for AttributeValue {
	fn from(value: i64) -> Self {
		Self::Number(value as f64)
	}
}
impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<String> for AttributeValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<bool> for AttributeValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// Converts a JSON object into an attribute bag, skipping nulls, arrays and nested objects.
pub fn from_json_object(object: &serde_json::Map<String, Value>) -> Attributes {
	object.iter().filter_map(|(key, value)| scalar(value).map(|value| (key.clone(), value))).collect()
}

/// Serde adapter for attribute maps that may carry non-scalar values on the wire.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Attributes, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<serde_json::Map<String, Value>>::deserialize(deserializer)?;

	Ok(raw.as_ref().map(from_json_object).unwrap_or_default())
}

fn scalar(value: &Value) -> Option<AttributeValue> {
	match value {
		Value::Bool(flag) => Some(AttributeValue::Bool(*flag)),
		Value::Number(number) => number.as_f64().map(AttributeValue::Number),
		Value::String(text) => Some(AttributeValue::Text(text.clone())),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}
