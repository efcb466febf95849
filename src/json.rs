//! JSON import and export.
//!
//! Export is best-effort by nature: JSON has fewer shapes than the tag
//! model, so tags and ownership don't survive the trip. The mapping:
//!
//! | Container state                  | JSON                                |
//! |----------------------------------|-------------------------------------|
//! | fully keyed list / tree / map    | object (keys rendered as text)      |
//! | any keyless node, queue, stack   | array                               |
//! | array                            | array                               |
//! | i128 / u128                      | string (JSON numbers are doubles)   |
//! | non-finite float                 | null                                |
//! | opaque pointer                   | null                                |
//!
//! Import builds a string-keyed list from a JSON object: booleans become
//! `bool`, integral numbers `i64` (or `u64` above `i64::MAX`), other
//! numbers `f64`, strings `string`, objects nested lists, arrays dynamic
//! arrays, and `null` the null pointer.

use std::fmt;

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::list::List;
use crate::types::{Kind, Tag};
use crate::value::Value;

/// Failure while building a list from JSON text.
#[derive(Debug)]
pub enum JsonError {
    /// The text is not valid JSON.
    Parse(serde_json::Error),
    /// The JSON is valid but the wrong shape.
    Shape(String),
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Parse(error) => write!(f, "invalid JSON: {}", error),
            JsonError::Shape(message) => write!(f, "unexpected JSON shape: {}", message),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::Parse(error) => Some(error),
            JsonError::Shape(_) => None,
        }
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(error: serde_json::Error) -> Self {
        JsonError::Parse(error)
    }
}

fn float_to_json(value: f64) -> Json {
    match Number::from_f64(value) {
        Some(number) => Json::Number(number),
        None => Json::Null,
    }
}

fn entries_to_json<'a>(entries: impl Iterator<Item = (&'a Value, &'a Value)>) -> Json {
    let mut object = JsonMap::new();
    for (key, value) in entries {
        object.insert(key.to_string(), value.to_json());
    }
    Json::Object(object)
}

impl Value {
    /// Render this value as JSON. Lossy where JSON is poorer than the tag
    /// model; see the module docs for the exact mapping.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Bool(v) => Json::Bool(*v.get()),
            Value::I8(v) => Json::Number(Number::from(*v.get())),
            Value::U8(v) => Json::Number(Number::from(*v.get())),
            Value::I16(v) => Json::Number(Number::from(*v.get())),
            Value::U16(v) => Json::Number(Number::from(*v.get())),
            Value::I32(v) => Json::Number(Number::from(*v.get())),
            Value::U32(v) => Json::Number(Number::from(*v.get())),
            Value::I64(v) => Json::Number(Number::from(*v.get())),
            Value::U64(v) => Json::Number(Number::from(*v.get())),
            Value::I128(v) => Json::String(v.get().to_string()),
            Value::U128(v) => Json::String(v.get().to_string()),
            Value::F32(v) => float_to_json(f64::from(*v.get())),
            Value::F64(v) | Value::LongDouble(v) => float_to_json(*v.get()),
            Value::Str(v) => Json::String(v.get().clone()),
            Value::Bytes(v) => Json::String(v.get().to_string()),
            Value::List(v) => v.get().to_json(),
            Value::Queue(v) => v.get().inner().to_json(),
            Value::Stack(v) => v.get().inner().to_json(),
            Value::Tree(v) => entries_to_json(v.get().iter()),
            Value::Map(v) => entries_to_json(v.get().iter()),
            Value::Array(v) => Json::Array(v.get().iter().map(Value::to_json).collect()),
            Value::Pointer(_) => Json::Null,
        }
    }
}

impl List {
    /// Render this list as JSON: an object when every node is keyed, an
    /// array of values otherwise.
    pub fn to_json(&self) -> Json {
        let fully_keyed = self.iter().all(|node| node.key().is_some());
        if fully_keyed {
            let mut object = JsonMap::new();
            for node in self.iter() {
                if let Some(key) = node.key() {
                    object.insert(key.to_string(), node.value().to_json());
                }
            }
            Json::Object(object)
        } else {
            Json::Array(self.values().map(Value::to_json).collect())
        }
    }

    /// Build a string-keyed list from a JSON object.
    pub fn from_json(text: &str) -> Result<List, JsonError> {
        let parsed: Json = serde_json::from_str(text)?;
        match parsed {
            Json::Object(object) => Ok(list_from_object(object)),
            other => Err(JsonError::Shape(format!(
                "expected a top-level object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

fn list_from_object(object: JsonMap<String, Json>) -> List {
    let mut list = List::new(Tag::owned(Kind::Str));
    for (key, value) in object {
        // String keys always pass the gate of a string-keyed list.
        let _ = list.add_back(key.as_str(), json_to_value(value));
    }
    list
}

fn json_to_value(json: Json) -> Value {
    match json {
        Json::Null => Value::null(),
        Json::Bool(value) => Value::from(value),
        Json::Number(number) => {
            if let Some(value) = number.as_i64() {
                Value::from(value)
            } else if let Some(value) = number.as_u64() {
                Value::from(value)
            } else {
                Value::from(number.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(value) => Value::from(value),
        Json::Array(items) => {
            let mut array = crate::Array::new();
            for item in items {
                array.push(json_to_value(item));
            }
            Value::from(array)
        }
        Json::Object(object) => Value::from(list_from_object(object)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyed_list_renders_as_object() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("name", "motley").unwrap();
        list.add_back("count", 3i32).unwrap();
        list.add_back("exact", true).unwrap();

        assert_eq!(
            list.to_json(),
            json!({"name": "motley", "count": 3, "exact": true})
        );
    }

    #[test]
    fn keyless_nodes_force_array_rendering() {
        let mut queue = crate::Queue::new(Tag::owned(Kind::Str));
        queue.push(1i32);
        queue.push("two");

        assert_eq!(Value::from(queue).to_json(), json!([1, "two"]));
    }

    #[test]
    fn wide_integers_render_as_strings() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("wide", 170_141_183_460_469_231_731_687_303_715_884_105_727i128)
            .unwrap();
        assert_eq!(
            list.to_json(),
            json!({"wide": "170141183460469231731687303715884105727"})
        );
    }

    #[test]
    fn non_finite_floats_render_as_null() {
        let mut list = List::new(Tag::owned(Kind::Str));
        list.add_back("nan", f64::NAN).unwrap();
        assert_eq!(list.to_json(), json!({"nan": null}));
    }

    #[test]
    fn from_json_maps_shapes_to_kinds() {
        let list = List::from_json(
            r#"{"flag": true, "small": 7, "big": 18446744073709551615,
                "ratio": 0.5, "name": "x", "items": [1, "a"],
                "nested": {"inner": 1}, "nothing": null}"#,
        )
        .unwrap();

        assert_eq!(list.key_tag(), Tag::owned(Kind::Str));
        let get = |key: &str| {
            let id = list.find_forward(&Value::from(key)).unwrap();
            list.node(id).unwrap().value().clone()
        };

        assert_eq!(get("flag").kind(), Kind::Bool);
        assert_eq!(get("small").kind(), Kind::I64);
        assert_eq!(get("big").kind(), Kind::U64);
        assert_eq!(get("ratio").kind(), Kind::F64);
        assert_eq!(get("name").kind(), Kind::Str);
        assert_eq!(get("items").kind(), Kind::Array);
        assert_eq!(get("nested").kind(), Kind::List);
        assert!(get("nothing").is_null());
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            List::from_json("[1, 2]"),
            Err(JsonError::Shape(_))
        ));
        assert!(matches!(List::from_json("not json"), Err(JsonError::Parse(_))));
    }

    #[test]
    fn object_round_trip_preserves_structure() {
        let text = r#"{"a": 1, "b": {"c": [true, null]}}"#;
        let list = List::from_json(text).unwrap();
        let rendered = list.to_json();
        assert_eq!(rendered, serde_json::from_str::<Json>(text).unwrap());
    }
}
