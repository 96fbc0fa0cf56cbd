//! Conversion between JSON payloads and snapshot types.

use serde_json::Value as JsonValue;
use snapshot_core::{Error, Record, Result, Value};
use snapshot_view::ContentUpdate;

/// Converts a JSON scalar to a `Value`.
///
/// Integral numbers become `Int64`, other numbers `Float64`. Arrays and
/// objects are rejected.
pub fn json_to_value(json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => Ok(match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
        }),
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(_) => Err(Error::not_scalar("array")),
        JsonValue::Object(_) => Err(Error::not_scalar("object")),
    }
}

/// Converts a JSON array of scalars.
pub fn json_to_values(json: &JsonValue) -> Result<Vec<Value>> {
    match json {
        JsonValue::Array(items) => items.iter().map(json_to_value).collect(),
        other => Ok(vec![json_to_value(other)?]),
    }
}

/// Converts a JSON object of scalars to a `Record`, keeping field order.
pub fn json_to_record(json: &JsonValue) -> Result<Record> {
    let JsonValue::Object(map) = json else {
        return Err(Error::not_scalar("non-object record"));
    };
    let mut record = Record::with_capacity(map.len());
    for (key, value) in map {
        record.insert(key.as_str(), json_to_value(value)?);
    }
    Ok(record)
}

/// Converts a JSON array of objects to records.
pub fn json_to_records(json: &JsonValue) -> Result<Vec<Record>> {
    match json {
        JsonValue::Array(items) => items.iter().map(json_to_record).collect(),
        _ => Err(Error::not_scalar("non-array collection")),
    }
}

/// Encodes an update as the `[page, statistics]` argument pair.
pub fn update_to_json(update: &ContentUpdate) -> serde_json::Result<JsonValue> {
    Ok(JsonValue::Array(vec![
        serde_json::to_value(&update.page)?,
        serde_json::to_value(&update.statistics)?,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_value() {
        assert_eq!(json_to_value(&json!(null)).unwrap(), Value::Null);
        assert_eq!(json_to_value(&json!(true)).unwrap(), Value::Boolean(true));
        assert_eq!(json_to_value(&json!(12)).unwrap(), Value::Int64(12));
        assert_eq!(json_to_value(&json!(1.5)).unwrap(), Value::Float64(1.5));
        assert_eq!(json_to_value(&json!("Karl")).unwrap(), Value::from("Karl"));
        assert!(matches!(json_to_value(&json!([1])), Err(Error::NotScalar { .. })));
        assert!(matches!(json_to_value(&json!({"a": 1})), Err(Error::NotScalar { .. })));
    }

    #[test]
    fn test_json_to_values() {
        assert_eq!(
            json_to_values(&json!(["a", 2])).unwrap(),
            vec![Value::from("a"), Value::from(2)]
        );
        assert_eq!(json_to_values(&json!("a")).unwrap(), vec![Value::from("a")]);
        assert!(json_to_values(&json!([[1]])).is_err());
    }

    #[test]
    fn test_json_to_records() {
        let records = json_to_records(&json!([{"id": 1, "name": "Adam"}, {"id": 2}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&Value::from("Adam")));
        assert!(json_to_records(&json!({"id": 1})).is_err());
        assert!(json_to_records(&json!([{"id": [1]}])).is_err());
    }
}
