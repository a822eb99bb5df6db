use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// A column value passed through from the database without coercion.
///
/// Serialized untagged, so `Number(12)` is written as `12` and `Null` as
/// `null`. Numbers keep the exact digits they were built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// Build a numeric value from a float. Returns `None` for NaN and
    /// infinities, which JSON cannot represent.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(FieldValue::Number)
    }

    /// Parse a decimal literal (e.g. `"24.50"`) into a numeric value that
    /// serializes digit for digit, scale included.
    pub fn from_decimal_str(value: &str) -> Option<Self> {
        value.parse::<Number>().ok().map(FieldValue::Number)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as text, the way a text column would hold it.
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::Text(text) => Some(text),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(FieldValue::Null),
            Value::Number(number) => Ok(FieldValue::Number(number)),
            Value::String(text) => Ok(FieldValue::Text(text)),
            other => Err(D::Error::custom(format!(
                "expected a scalar column value, found {other}"
            ))),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One wine with its resolved category name, as written to the snapshot.
///
/// Field order is the key order of each JSON object in `wines.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub price: FieldValue,
    pub vintage: FieldValue,
    /// Empty when the wine has no matching category row.
    pub category: String,
    pub region: Option<String>,
    pub variety: Option<String>,
    pub stock: FieldValue,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub status: FieldValue,
}
