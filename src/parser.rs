use crate::filter::{value_number, value_text};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;

mod entities;

pub use entities::{DecodedRecord, Field, FieldType, Level};

/// Keys holding the record message; the last one present wins
pub const MESSAGE_KEYS: [&str; 2] = ["msg", "log"];
pub const LEVEL_KEY: &str = "level";
pub const CALLER_KEY: &str = "caller";
pub const TIMESTAMP_KEY: &str = "ts";

/// Decodes a single input line
///
/// Lines that are not JSON objects keep only their raw text. For objects the
/// well-known keys are extracted and every other key becomes a display field
/// in source order.
pub fn decode_line(raw_line: &str) -> DecodedRecord {
    let mut record = DecodedRecord {
        raw_line: raw_line.to_string(),
        ..DecodedRecord::default()
    };

    let Ok(Members(members)) = serde_json::from_str::<Members>(raw_line) else {
        return record;
    };

    let mut object = Map::new();
    for (key, value) in members {
        match key.as_str() {
            k if MESSAGE_KEYS.contains(&k) => record.message = value_text(&value).into_owned(),
            LEVEL_KEY => record.level = value_text(&value).into_owned(),
            CALLER_KEY => record.caller = value_text(&value).into_owned(),
            TIMESTAMP_KEY => record.timestamp = value_number(&value),
            _ => record.fields.push(to_field(&key, &value)),
        }
        // Filters see the first occurrence of a repeated key
        object.entry(key).or_insert(value);
    }

    record.object = Some(object);
    record
}

/// Members of a JSON object in source order, repeated keys included
struct Members(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = Members;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Members, A::Error> {
                let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(member) = map.next_entry::<String, Value>()? {
                    members.push(member);
                }
                Ok(Members(members))
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}

/// Converts a JSON value into a typed display field
fn to_field(name: &str, value: &Value) -> Field {
    match value {
        Value::String(text) => Field::new(name, format!("\"{text}\""), FieldType::String),
        Value::Bool(flag) => Field::new(name, flag.to_string(), FieldType::Bool),
        Value::Null => Field::new(name, "nil", FieldType::Nil),
        Value::Number(number) => Field::new(name, number.to_string(), FieldType::Number),
        other => Field::new(name, other.to_string(), FieldType::Unknown),
    }
}
