use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::path::join_path;
use crate::ContractError;
use crate::info::{PrimitiveKind, ValueKind};
use crate::record::Record;
use crate::registry::{FieldKey, RecordType, effective_descriptors};
use crate::value::{KeyedMap, Timestamp, Value};

// -----------------------------------------------------------------------------
// Record

fn deserialize_record(
    ty: RecordType,
    tree: &Value,
    path: &str,
) -> Result<Box<dyn Record>, ContractError> {
    let Value::Object(object) = tree else {
        return Err(ContractError::invalid_value(path, tree.clone()));
    };

    let resolved = ty.resolve(tree);
    let mut record = resolved.construct();
    let fields = effective_descriptors(resolved, FieldKey::ExposedName);

    if fields.is_empty() {
        log::debug!("record type `{resolved}` declares no fields, copying the tree as-is");
        for (key, value) in object.iter() {
            if record.set_field(key, value.clone()).is_err() {
                log::trace!("record type `{resolved}` cannot hold key `{key}`, ignored");
            }
        }
        return Ok(record);
    }

    for (key, raw) in object.iter() {
        let Some(descriptor) = fields.get(key) else {
            log::trace!("unknown key `{key}` for record type `{resolved}`, ignored");
            continue;
        };
        if !descriptor.direction().deserializes() {
            log::trace!("key `{key}` of record type `{resolved}` is not deserialized, skipped");
            continue;
        }

        let path = join_path(path, key);
        let value = match descriptor.deserializer() {
            Some(hook) => hook(raw),
            None => coerce(descriptor.kind(), raw, &path)?,
        };
        let collection = matches!(value, Value::Seq(_) | Value::Map(_)).then(|| value.clone());
        if let Err(rejected) = record.set_field(descriptor.internal_name(), value) {
            let path = match &collection {
                Some(collection) => rejected_path(&path, collection, &rejected),
                None => path,
            };
            return Err(ContractError::invalid_value(path, rejected));
        }
    }

    Ok(record)
}

/// Points at the element of `collection` a typed field rejected.
fn rejected_path(path: &str, collection: &Value, rejected: &Value) -> String {
    match collection {
        _ if collection == rejected => String::from(path),
        Value::Seq(_) => join_path(path, "item"),
        Value::Map(map) if map.keys().any(|key| key == rejected) => join_path(path, "key"),
        Value::Map(_) => join_path(path, "value"),
        _ => String::from(path),
    }
}

// -----------------------------------------------------------------------------
// Coercion

fn coerce_timestamp(raw: &Value) -> Timestamp {
    match raw {
        Value::Timestamp(ts) => *ts,
        Value::String(text) => Timestamp::parse_lossy(text),
        other => Timestamp::from_millis_lossy(other.to_number()),
    }
}

#[inline]
fn coerce_element(
    kind: Option<&ValueKind>,
    raw: &Value,
    path: &str,
) -> Result<Value, ContractError> {
    match kind {
        Some(kind) => coerce(kind, raw, path),
        None => Ok(raw.clone()),
    }
}

/// Coerces a raw tree value to `kind`.
///
/// Null passes through for every kind.
fn coerce(kind: &ValueKind, raw: &Value, path: &str) -> Result<Value, ContractError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let invalid = || ContractError::invalid_value(path, raw.clone());

    match kind {
        ValueKind::Unspecified | ValueKind::Primitive(PrimitiveKind::Opaque) => Ok(raw.clone()),
        ValueKind::Primitive(PrimitiveKind::Number) => {
            let n = raw.to_number();
            if n.is_finite() {
                Ok(Value::Number(n))
            } else {
                Err(invalid())
            }
        }
        ValueKind::Primitive(PrimitiveKind::String) => Ok(Value::String(raw.to_text())),
        ValueKind::Primitive(PrimitiveKind::Boolean) => Ok(Value::Bool(raw.is_truthy())),
        ValueKind::Primitive(PrimitiveKind::Timestamp) => Ok(Value::Timestamp(coerce_timestamp(raw))),
        ValueKind::Sequence(item) => {
            let Value::Seq(items) = raw else {
                return Err(invalid());
            };
            let Some(item) = item.as_deref() else {
                return Ok(raw.clone());
            };
            let path = join_path(path, "item");
            items
                .iter()
                .map(|v| coerce(item, v, &path))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq)
        }
        ValueKind::KeyedMap { key, value } => {
            let key_path = join_path(path, "key");
            let value_path = join_path(path, "value");
            let mut map = KeyedMap::new();
            match raw {
                Value::Object(object) => {
                    for (k, v) in object.iter() {
                        map.insert(
                            coerce_element(key.as_deref(), &Value::from(k), &key_path)?,
                            coerce_element(value.as_deref(), v, &value_path)?,
                        );
                    }
                }
                Value::Map(source) => {
                    for (k, v) in source {
                        map.insert(
                            coerce_element(key.as_deref(), k, &key_path)?,
                            coerce_element(value.as_deref(), v, &value_path)?,
                        );
                    }
                }
                _ => return Err(invalid()),
            }
            Ok(Value::Map(map))
        }
        ValueKind::Record(target) => deserialize_record(target.get(), raw, path).map(Value::Record),
    }
}

// -----------------------------------------------------------------------------
// Entry point

/// Builds a record of type `ty` (or of the type its resolve hook picks) from `tree`.
///
/// - `tree` must be an [`Object`](crate::value::Object);
/// - keys without a descriptor and keys not deserialized by direction are ignored;
/// - keys missing from `tree` leave the field as constructed;
/// - a type without any declared field copies every key as-is.
///
/// The first value that cannot be coerced fails the whole call with
/// [`ContractError::InvalidValue`], carrying the dotted path to it.
///
/// # Examples
///
/// ```
/// use vc_contract::info::{FieldDescriptor, ValueKind};
/// use vc_contract::registry::{self, TypeDecl};
/// use vc_contract::{ops, Record, Value};
///
/// let ty = registry::declare(TypeDecl::dynamic("doc::Takes"));
/// registry::register_field(ty, FieldDescriptor::new("takes").with_item(ValueKind::NUMBER));
///
/// let tree: Value = serde_json::from_str(r#"{"takes":["1",2]}"#).unwrap();
/// let record = ops::from_tree(ty, &tree).unwrap();
/// assert_eq!(record.field("takes"), Some(Value::Seq(vec![1.into(), 2.into()])));
///
/// let tree: Value = serde_json::from_str(r#"{"takes":["x"]}"#).unwrap();
/// let err = ops::from_tree(ty, &tree).unwrap_err();
/// assert_eq!(err.path(), Some("takes.item"));
/// ```
pub fn from_tree(ty: RecordType, tree: &Value) -> Result<Box<dyn Record>, ContractError> {
    deserialize_record(ty, tree, "")
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::from_tree;
    use crate::info::{Direction, FieldDescriptor, ValueKind};
    use crate::registry::{RecordType, TypeDecl, declare, register_field};
    use crate::value::{KeyedMap, Object, Timestamp, Value};

    fn tree(entries: &[(&str, Value)]) -> Value {
        Value::Object(entries.iter().cloned().collect())
    }

    #[test]
    fn primitives() {
        let ty = declare(TypeDecl::dynamic("de::primitives"));
        register_field(ty, FieldDescriptor::new("n").with_kind(ValueKind::NUMBER));
        register_field(ty, FieldDescriptor::new("s").with_kind(ValueKind::STRING));
        register_field(ty, FieldDescriptor::new("b").with_kind(ValueKind::BOOLEAN));
        register_field(ty, FieldDescriptor::new("t").with_kind(ValueKind::TIMESTAMP));
        register_field(ty, FieldDescriptor::new("any"));
        register_field(ty, FieldDescriptor::new("o").with_kind(ValueKind::OPAQUE));

        let record = from_tree(
            ty,
            &tree(&[
                ("n", "100".into()),
                ("s", 1.5.into()),
                ("b", "".into()),
                ("t", 0.into()),
                ("any", Value::Seq(vec!["x".into()])),
                ("o", tree(&[("k", "100".into())])),
                ("unknown", 1.into()),
            ]),
        )
        .unwrap();

        assert_eq!(record.field("n"), Some(Value::from(100)));
        assert_eq!(record.field("s"), Some(Value::from("1.5")));
        assert_eq!(record.field("b"), Some(Value::from(false)));
        assert_eq!(
            record.field("t"),
            Some(Value::from(Timestamp::from_millis(0).unwrap()))
        );
        assert_eq!(record.field("any"), Some(Value::Seq(vec!["x".into()])));
        assert_eq!(record.field("o"), Some(tree(&[("k", "100".into())])));
        assert_eq!(record.field("unknown"), None);
    }

    #[test]
    fn unreadable_timestamps() {
        let ty = declare(TypeDecl::dynamic("de::unreadable_timestamps"));
        register_field(ty, FieldDescriptor::new("t").with_kind(ValueKind::TIMESTAMP));
        register_field(ty, FieldDescriptor::new("l").with_item(ValueKind::TIMESTAMP));

        let record = from_tree(
            ty,
            &tree(&[
                ("t", "not a date".into()),
                ("l", Value::Seq(vec![f64::NAN.into(), "2020-01-02".into()])),
            ]),
        )
        .unwrap();

        assert_eq!(record.field("t"), Some(Value::from(Timestamp::INVALID)));
        assert_eq!(
            record.field("l"),
            Some(Value::Seq(vec![
                Timestamp::INVALID.into(),
                Timestamp::parse("2020-01-02").unwrap().into(),
            ]))
        );
        assert!(record.field("t").unwrap().to_number().is_nan());
    }

    #[test]
    fn null_passes_through() {
        let ty = declare(TypeDecl::dynamic("de::null_passes_through"));
        register_field(ty, FieldDescriptor::new("n").with_kind(ValueKind::NUMBER));
        register_field(ty, FieldDescriptor::new("l").with_item(ValueKind::NUMBER));

        let record = from_tree(ty, &tree(&[("n", Value::Null), ("l", Value::Null)])).unwrap();
        assert_eq!(record.field("n"), Some(Value::Null));
        assert_eq!(record.field("l"), Some(Value::Null));
    }

    #[test]
    fn invalid_values() {
        let ty = declare(TypeDecl::dynamic("de::invalid_values"));
        register_field(ty, FieldDescriptor::new("n").with_name("num").with_kind(ValueKind::NUMBER));
        register_field(ty, FieldDescriptor::new("l").with_item(ValueKind::Unspecified));
        register_field(ty, FieldDescriptor::new("m").with_value(ValueKind::NUMBER));

        let cases = [
            ("num", Value::from("abc"), "num"),
            ("l", Value::from(1), "l"),
            ("m", Value::Seq(vec![]), "m"),
        ];
        for (key, raw, path) in cases {
            let err = from_tree(ty, &tree(&[(key, raw.clone())])).unwrap_err();
            assert_eq!(err.path(), Some(path));
            assert_eq!(err.value(), Some(&raw));
        }

        let err = from_tree(ty, &Value::from(1)).unwrap_err();
        assert_eq!(err.path(), Some(""));
    }

    #[test]
    fn keyed_maps() {
        let ty = declare(TypeDecl::dynamic("de::keyed_maps"));
        register_field(
            ty,
            FieldDescriptor::new("m")
                .with_key(ValueKind::NUMBER)
                .with_value(ValueKind::STRING),
        );

        let source: Object = [("1", Value::from(10)), ("2", Value::from(true))]
            .into_iter()
            .collect();
        let record = from_tree(ty, &tree(&[("m", Value::Object(source))])).unwrap();

        let expected: KeyedMap = [(1, "10"), (2, "true")].into_iter().collect();
        assert_eq!(record.field("m"), Some(Value::Map(expected)));

        let source: Object = [("x", Value::from(1))].into_iter().collect();
        let err = from_tree(ty, &tree(&[("m", Value::Object(source))])).unwrap_err();
        assert_eq!(err.path(), Some("m.key"));
        assert_eq!(err.value(), Some(&Value::from("x")));
    }

    #[test]
    fn direction_and_hooks() {
        let ty = declare(TypeDecl::dynamic("de::direction_and_hooks"));
        register_field(
            ty,
            FieldDescriptor::new("sonly").with_direction(Direction::SERIALIZE_ONLY),
        );
        register_field(
            ty,
            FieldDescriptor::new("k")
                .with_kind(ValueKind::NUMBER)
                .with_deserializer(|v| Value::from(v.to_number() / 10.0)),
        );

        let record = from_tree(ty, &tree(&[("sonly", 2.into()), ("k", 50.into())])).unwrap();
        assert_eq!(record.field("sonly"), None);
        assert_eq!(record.field("k"), Some(Value::from(5)));
    }

    #[test]
    fn nested_paths() {
        let inner = declare(TypeDecl::dynamic("de::nested_paths::Inner"));
        register_field(inner, FieldDescriptor::new("y").with_kind(ValueKind::NUMBER));

        let outer = declare(TypeDecl::dynamic("de::nested_paths::Outer"));
        register_field(
            outer,
            FieldDescriptor::new("nested").with_kind(ValueKind::record(inner)),
        );
        register_field(
            outer,
            FieldDescriptor::new("list").with_item(ValueKind::record(inner)),
        );

        let bad = tree(&[("y", "abc".into())]);

        let err = from_tree(outer, &tree(&[("nested", bad.clone())])).unwrap_err();
        assert_eq!(err.path(), Some("nested.y"));

        let err = from_tree(outer, &tree(&[("list", Value::Seq(vec![bad]))])).unwrap_err();
        assert_eq!(err.path(), Some("list.item.y"));

        let good = tree(&[("y", "1".into())]);
        let record = from_tree(outer, &tree(&[("nested", good)])).unwrap();
        let nested = record.field("nested").unwrap();
        let nested = nested.as_record().unwrap();
        assert_eq!(nested.record_type(), inner);
        assert_eq!(nested.field("y"), Some(Value::from(1)));
    }

    #[test]
    fn passthrough_without_fields() {
        let ty = declare(TypeDecl::dynamic("de::passthrough"));
        let record = from_tree(ty, &tree(&[("a", 1.into()), ("b", "x".into())])).unwrap();
        assert_eq!(record.record_type(), ty);
        assert_eq!(record.field("a"), Some(Value::from(1)));
        assert_eq!(record.field("b"), Some(Value::from("x")));

        let base = from_tree(RecordType::base(), &tree(&[("c", true.into())])).unwrap();
        assert_eq!(base.field("c"), Some(Value::from(true)));
    }

    #[test]
    fn resolve_hook() {
        let base = declare(
            TypeDecl::dynamic("de::resolve_hook::Base").with_resolver(|requested, tree| {
                match tree.get("kind").and_then(Value::as_str) {
                    Some("a") => crate::registry::find_type("de::resolve_hook::A").unwrap_or(requested),
                    _ => requested,
                }
            }),
        );
        register_field(base, FieldDescriptor::new("kind"));
        let a = declare(TypeDecl::dynamic("de::resolve_hook::A").extends(base));
        register_field(a, FieldDescriptor::new("x").with_kind(ValueKind::NUMBER));

        let record = from_tree(base, &tree(&[("kind", "a".into()), ("x", "3".into())])).unwrap();
        assert_eq!(record.record_type(), a);
        assert_eq!(record.field("x"), Some(Value::from(3)));

        let record = from_tree(base, &tree(&[("kind", "b".into())])).unwrap();
        assert_eq!(record.record_type(), base);
    }
}
