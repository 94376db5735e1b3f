//! Typed value encoding used by the document service
//!
//! Every field travels wrapped in an object naming its type, e.g.
//! `{"stringValue": "Asha"}` or `{"integerValue": "42"}`.

use serde_json::{json, Map, Value};

use crate::error::Error;

/// Fields of a document as plain JSON
pub type Fields = Map<String, Value>;

/// Wrap a plain JSON value in its typed form
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode every field of a map
pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode(v)))
            .collect(),
    )
}

/// A timestamp field; plain JSON has no timestamp type of its own
pub fn timestamp(value: chrono::DateTime<chrono::Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true) })
}

/// Unwrap a typed value back to plain JSON. Timestamps become RFC 3339 strings.
pub fn decode(value: &Value) -> Result<Value, Error> {
    let (kind, inner) = value
        .as_object()
        .and_then(|o| o.iter().next())
        .ok_or_else(|| Error::document(format!("untyped value {}", value)))?;

    Ok(match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue"
        | "referenceValue" | "bytesValue" | "geoPointValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| Error::document(format!("integerValue {:?}: {}", s, e)))?,
            other => other.clone(),
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default(),
        ),
        other => return Err(Error::document(format!("unsupported value type {}", other))),
    })
}

/// Decode a `fields` object
pub fn decode_fields(fields: &Value) -> Result<Fields, Error> {
    let object = fields
        .as_object()
        .ok_or_else(|| Error::document("fields is not an object"))?;
    object
        .iter()
        .map(|(k, v)| decode(v).map(|decoded| (k.clone(), decoded)))
        .collect()
}
