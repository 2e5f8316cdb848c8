use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{Deserialize, Deserializer, Error, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use super::{Object, Value};

/// Integral numbers below this magnitude are written as integers.
const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

// -----------------------------------------------------------------------------
// Serialize

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(v) => serialize_number(*v, serializer),
            Value::String(v) => serializer.serialize_str(v),
            Value::Timestamp(v) if v.is_valid() => serializer.collect_str(v),
            Value::Timestamp(_) => serializer.serialize_unit(),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(&key.to_text(), value)?;
                }
                state.end()
            }
            Value::Object(object) => serializer.collect_map(object.iter()),
            Value::Record(record) => crate::ops::to_tree(record.as_ref()).serialize(serializer),
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a tree value")
    }

    #[inline]
    fn visit_bool<E: Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn visit_i64<E: Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[inline]
    fn visit_u64<E: Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[inline]
    fn visit_f64<E: Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    #[inline]
    fn visit_str<E: Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(String::from(v)))
    }

    #[inline]
    fn visit_string<E: Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Object::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Reads any self-describing tree: maps become [`Object`]s, never records.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::value::{KeyedMap, Object, Timestamp, Value};

    #[test]
    fn write_tree() {
        let mut map = KeyedMap::new();
        map.insert(1, "one");
        map.insert(true, 1.5);

        let object: Object = [
            ("n", Value::from(100)),
            ("f", Value::from(0.25)),
            ("t", Value::from(Timestamp::from_millis(0).unwrap())),
            ("bad", Value::from(Timestamp::INVALID)),
            ("s", Value::Seq(vec![Value::Null, "x".into()])),
            ("m", Value::Map(map)),
        ]
        .into_iter()
        .collect();

        let text = serde_json::to_string(&Value::Object(object)).unwrap();
        assert_eq!(
            text,
            r#"{"n":100,"f":0.25,"t":"1970-01-01T00:00:00.000Z","bad":null,"s":[null,"x"],"m":{"1":"one","true":1.5}}"#
        );
    }

    #[test]
    fn read_tree() {
        let value: Value = serde_json::from_str(r#"{"a":[1,"2",null],"b":{"c":false}}"#).unwrap();

        let b: Object = [("c", false)].into_iter().collect();
        let expected: Object = [
            ("a", Value::Seq(vec![1.into(), "2".into(), Value::Null])),
            ("b", Value::Object(b)),
        ]
        .into_iter()
        .collect();
        assert_eq!(value, Value::Object(expected));
    }
}
