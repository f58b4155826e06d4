//! Bound value types.
//!
//! A [`Value`] is anything a binding can carry. Each variant is normalized by
//! tag (see [`crate::sync::normalize`]); there is no probing of capabilities at
//! runtime, so a date is a date because it is a [`Value::Date`], not because it
//! happens to format itself.
//!
//! ## JSON mapping
//!
//! | JSON                      | Value              |
//! |---------------------------|--------------------|
//! | `null`                    | `Empty`            |
//! | string / number / bool    | scalar variants    |
//! | array                     | `Sequence`         |
//! | `{"$date": "<rfc3339>"}`  | `Date`             |
//! | any other object          | `Record`           |

use crate::error::{DatattrError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

/// Object key marking a date in JSON input.
pub const DATE_TAG: &str = "$date";

/// Runtime representation of a bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The undefined sentinel. Never written when the `empty` option is off.
    Empty,

    String(String),

    Number(Number),

    Bool(bool),

    /// Array-like value, joined with spaces on normalization.
    Sequence(Vec<Value>),

    /// Date-like value, rendered as ISO-8601.
    Date(DateTime<Utc>),

    /// Plain object with keys in insertion order.
    Record(IndexMap<String, Value>),
}

impl Value {
    /// True for the undefined sentinel and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Convert parsed JSON into a value, recognizing tagged dates.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::Empty,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(map) => {
                if map.len() == 1 {
                    if let Some(Json::String(raw)) = map.get(DATE_TAG) {
                        return parse_date(raw).map(Value::Date);
                    }
                }
                let mut record = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    record.insert(key, Value::from_json(value)?);
                }
                Value::Record(record)
            }
        })
    }

    /// Convert into plain JSON the way a browser's `JSON.stringify` sees it:
    /// dates become ISO strings, empty record fields are dropped and empty
    /// sequence items become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Empty => Json::Null,
            Value::String(s) => Json::String(s.clone()),
            Value::Number(n) => Json::Number(n.clone()),
            Value::Bool(b) => Json::Bool(*b),
            Value::Sequence(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Date(date) => Json::String(format_date(date)),
            Value::Record(fields) => Json::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Empty))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::from_json(json).map_err(serde::de::Error::custom)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shortest decimal rendering: `1`, `-3`, `1.5`.
pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
}

// Browser number spelling: exponent form below 1e-6 and from 1e21 up,
// always with a signed exponent ("1e+21", "1.5e-7").
fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let exponent_form = format!("{f:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponent_form,
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| DatattrError::InvalidDate(format!("{raw}: {e}")))
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        match Number::from_f64(f) {
            Some(n) => Value::Number(n),
            None if f.is_nan() => Value::String("NaN".to_string()),
            None if f > 0.0 => Value::String("Infinity".to_string()),
            None => Value::String("-Infinity".to_string()),
        }
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Empty)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Record(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn null_becomes_empty() {
        assert_eq!(Value::from_json(json!(null)).unwrap(), Value::Empty);
    }

    #[test]
    fn tagged_object_becomes_date() {
        let value = Value::from_json(json!({"$date": "2024-03-05T10:20:30Z"})).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap();
        assert_eq!(value, Value::Date(expected));
    }

    #[test]
    fn tagged_object_with_offset_is_converted_to_utc() {
        let value = Value::from_json(json!({"$date": "2024-03-05T12:20:30+02:00"})).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap();
        assert_eq!(value, Value::Date(expected));
    }

    #[test]
    fn bad_date_is_an_error() {
        let err = Value::from_json(json!({"$date": "yesterday"})).unwrap_err();
        assert!(matches!(err, DatattrError::InvalidDate(_)));
    }

    #[test]
    fn date_tag_with_other_keys_is_a_record() {
        let value = Value::from_json(json!({"$date": "2024-03-05T10:20:30Z", "x": 1})).unwrap();
        assert!(matches!(value, Value::Record(_)));
    }

    #[test]
    fn records_keep_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        match value {
            Value::Record(fields) => {
                let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["z", "a", "m"]);
            }
            _ => panic!("Expected Record"),
        }
    }

    #[test]
    fn is_blank_for_empty_and_empty_string() {
        assert!(Value::Empty.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" ").is_blank());
        assert!(!Value::from(0).is_blank());
        assert!(!Value::from(false).is_blank());
    }

    #[test]
    fn to_json_drops_empty_record_fields() {
        let mut fields = IndexMap::new();
        fields.insert("a".to_string(), Value::from(1));
        fields.insert("gone".to_string(), Value::Empty);
        assert_eq!(Value::Record(fields).to_json(), json!({"a": 1}));
    }

    #[test]
    fn to_json_keeps_empty_sequence_items_as_null() {
        let seq = Value::Sequence(vec![Value::from(1), Value::Empty]);
        assert_eq!(seq.to_json(), json!([1, null]));
    }

    #[test]
    fn format_date_uses_millis_and_z() {
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_date(&date), "2020-01-02T03:04:05.000Z");
    }

    #[test]
    fn format_number_is_shortest_form() {
        assert_eq!(format_number(&Number::from(42)), "42");
        assert_eq!(format_number(&Number::from(-3)), "-3");
        assert_eq!(format_number(&Number::from_f64(1.5).unwrap()), "1.5");
        assert_eq!(format_number(&Number::from_f64(2.0).unwrap()), "2");
        assert_eq!(format_number(&Number::from_f64(123456.0).unwrap()), "123456");
    }

    #[test]
    fn format_number_uses_exponent_at_the_extremes() {
        let f = |x: f64| format_number(&Number::from_f64(x).unwrap());
        assert_eq!(f(1e21), "1e+21");
        assert_eq!(f(-2.5e30), "-2.5e+30");
        assert_eq!(f(1.5e-7), "1.5e-7");
        assert_eq!(f(1e-6), "0.000001");
        assert_eq!(f(1e20), "100000000000000000000");
        assert_eq!(f(-0.0), "0");
    }

    #[test]
    fn non_finite_floats_use_browser_spelling() {
        assert_eq!(Value::from(f64::NAN), Value::from("NaN"));
        assert_eq!(Value::from(f64::INFINITY), Value::from("Infinity"));
        assert_eq!(Value::from(f64::NEG_INFINITY), Value::from("-Infinity"));
    }

    #[test]
    fn option_none_is_empty() {
        assert_eq!(Value::from(None::<&str>), Value::Empty);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
