use crate::info::ValueKind;
use crate::record::Record;
use crate::registry::{FieldKey, effective_descriptors};
use crate::value::{Object, Value};

static UNSPECIFIED: ValueKind = ValueKind::Unspecified;

#[inline]
fn or_unspecified(kind: Option<&ValueKind>) -> &ValueKind {
    kind.unwrap_or(&UNSPECIFIED)
}

/// Exports a live value, dispatching on its runtime kind.
///
/// `kind` only supplies the element kinds of sequences and keyed maps.
fn export(kind: &ValueKind, value: &Value) -> Value {
    match value {
        Value::Seq(items) => {
            let item = match kind {
                ValueKind::Sequence(item) => or_unspecified(item.as_deref()),
                _ => &UNSPECIFIED,
            };
            Value::Seq(items.iter().map(|v| export(item, v)).collect())
        }
        Value::Map(map) => {
            let (key, entry) = match kind {
                ValueKind::KeyedMap { key, value } => (
                    or_unspecified(key.as_deref()),
                    or_unspecified(value.as_deref()),
                ),
                _ => (&UNSPECIFIED, &UNSPECIFIED),
            };
            let object: Object = map
                .iter()
                .map(|(k, v)| (export(key, k).to_text(), export(entry, v)))
                .collect();
            Value::Object(object)
        }
        Value::Record(record) => to_tree(record.as_ref()),
        other => other.clone(),
    }
}

/// Converts `record` into a plain tree.
///
/// Only fields with a descriptor whose direction serializes are written, under
/// their exposed names, in effective order. Absent fields are omitted, present
/// nulls are written. Keyed maps become [`Object`]s with stringified keys.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, Record, Value};
///
/// #[derive(Contract, Default, Clone)]
/// struct Flags {
///     #[member(direction = deserialize_only)]
///     donly: Option<f64>,
///     #[member(direction = serialize_only)]
///     sonly: Option<f64>,
/// }
///
/// let flags = Flags { donly: Some(1.0), sonly: Some(2.0) };
/// assert_eq!(flags.to_json().unwrap(), r#"{"sonly":2}"#);
/// ```
pub fn to_tree(record: &dyn Record) -> Value {
    let fields = effective_descriptors(record.record_type(), FieldKey::InternalName);
    let mut object = Object::with_capacity(fields.len());

    for descriptor in fields.iter() {
        if !descriptor.direction().serializes() {
            continue;
        }
        let Some(value) = record.field(descriptor.internal_name()) else {
            continue;
        };
        let exported = match descriptor.serializer() {
            Some(hook) => hook(&value),
            None => export(descriptor.kind(), &value),
        };
        object.insert(descriptor.exposed_name(), exported);
    }

    Value::Object(object)
}

// -----------------------------------------------------------------------------
// Tests
