//! JSON text output: sorted keys, four-space indentation, non-ASCII verbatim

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

/// Serialize `value` the way every qypi command prints JSON
pub fn dumps<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let value = sort_keys(serde_json::to_value(value)?);

    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Rebuild every object with its keys in sorted order
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
