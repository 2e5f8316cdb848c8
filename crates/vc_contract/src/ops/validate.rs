use alloc::string::String;

use super::path::join_path;
use crate::ContractError;
use crate::info::{PrimitiveKind, Validator, ValueKind};
use crate::record::Record;
use crate::registry::{FieldKey, effective_descriptors};
use crate::value::Value;

/// The first failing field, as `(dotted path, offending value)`.
type Invalid = Option<(String, Value)>;

#[inline]
fn invalid(path: &str, value: &Value) -> Invalid {
    Some((String::from(path), value.clone()))
}

/// Checks one value against a kind, then runs the validators.
///
/// Validators also run for null values that passed the required check.
fn check(
    kind: &ValueKind,
    required: bool,
    validators: &[Validator],
    value: &Value,
    path: &str,
) -> Invalid {
    if value.is_null() {
        if required {
            return invalid(path, value);
        }
    } else if let Some(found) = check_kind(kind, value, path) {
        return Some(found);
    }

    if validators.iter().all(|f| f(value)) {
        None
    } else {
        invalid(path, value)
    }
}

/// Element checks carry no requiredness and no validators.
#[inline]
fn check_element(kind: &ValueKind, value: &Value, path: &str) -> Invalid {
    check(kind, false, &[], value, path)
}

fn check_kind(kind: &ValueKind, value: &Value, path: &str) -> Invalid {
    match (kind, value) {
        (ValueKind::Unspecified, _) | (ValueKind::Primitive(PrimitiveKind::Opaque), _) => None,
        (ValueKind::Primitive(PrimitiveKind::Number), Value::Number(n)) if n.is_finite() => None,
        (ValueKind::Primitive(PrimitiveKind::String), Value::String(_)) => None,
        (ValueKind::Primitive(PrimitiveKind::Boolean), Value::Bool(_)) => None,
        (ValueKind::Primitive(PrimitiveKind::Timestamp), Value::Timestamp(_)) => None,
        (ValueKind::Sequence(item), Value::Seq(items)) => {
            let item = item.as_deref()?;
            let path = join_path(path, "item");
            items.iter().find_map(|v| check_element(item, v, &path))
        }
        (ValueKind::KeyedMap { key, value: entry }, Value::Map(map)) => {
            // Every key is checked before any value.
            if let Some(key) = key.as_deref() {
                let path = join_path(path, "key");
                if let Some(found) = map.keys().find_map(|k| check_element(key, k, &path)) {
                    return Some(found);
                }
            }
            let entry = entry.as_deref()?;
            let path = join_path(path, "value");
            map.values().find_map(|v| check_element(entry, v, &path))
        }
        (ValueKind::Record(_), Value::Record(record)) => find_first_invalid_field(record.as_ref())
            .map(|(inner, found)| (join_path(path, &inner), found)),
        _ => invalid(path, value),
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Finds the first field of `record` that fails its descriptor.
///
/// Fields are checked in effective order. The path is the field's exposed name,
/// extended with `.item`, `.key`, `.value` or the nested field path when the
/// failure is inside a collection or a nested record.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, Record, Value};
///
/// #[derive(Contract, Default, Clone)]
/// struct Inner {
///     #[member(required)]
///     y: Option<f64>,
/// }
///
/// #[derive(Contract, Default, Clone)]
/// struct Outer {
///     #[member(item = Inner)]
///     list: Vec<Inner>,
/// }
///
/// let outer = Outer { list: vec![Inner { y: Some(1.0) }, Inner { y: None }] };
/// assert_eq!(
///     outer.find_first_invalid_field(),
///     Some(("list.item.y".to_string(), Value::Null)),
/// );
/// ```
pub fn find_first_invalid_field(record: &dyn Record) -> Option<(String, Value)> {
    let fields = effective_descriptors(record.record_type(), FieldKey::InternalName);
    fields.iter().find_map(|descriptor| {
        let value = record.field(descriptor.internal_name()).unwrap_or_default();
        check(
            descriptor.kind(),
            descriptor.is_required(),
            descriptor.validators(),
            &value,
            descriptor.exposed_name(),
        )
    })
}

/// Like [`find_first_invalid_field`], but fails with [`ContractError::InvalidValue`].
pub fn validate(record: &dyn Record) -> Result<(), ContractError> {
    match find_first_invalid_field(record) {
        Some((path, value)) => Err(ContractError::InvalidValue { path, value }),
        None => Ok(()),
    }
}

// -----------------------------------------------------------------------------
// Tests
