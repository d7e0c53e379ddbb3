use crate::{
    bindings::{MutableBinding, ObjectBinding},
    value::Value,
};
use serde_json::{Number, Value as Json};

/// Converts host JSON into a runtime value.
///
/// Objects become mutable bindings, so a JSON document handed to the CLI
/// as `context` behaves like any other namespace: case-insensitive
/// property reads, writes visible to later statements.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::from(*b),
        Json::Number(n) => Value::number(n.as_f64().unwrap_or(0.0)),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        Json::Object(map) => {
            let binding = MutableBinding::new();
            for (key, value) in map {
                binding.set(key, from_json(value));
            }
            Value::object(binding)
        }
    }
}

/// Converts a runtime value back to JSON. Functions have no JSON form and
/// come out as null; non-finite numbers cannot occur in a [`Value`].
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Number(n) => Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Object(binding) => Json::Object(
            binding
                .entries()
                .into_iter()
                .map(|(key, value)| (key, to_json(&value)))
                .collect(),
        ),
        Value::Function(_) => Json::Null,
    }
}
