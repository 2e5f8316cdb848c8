use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use super::{KeyedMap, Object, Timestamp, Value};
use crate::info::ValueKind;
use crate::record::Record;

// -----------------------------------------------------------------------------
// Traits

/// The ambient [`ValueKind`] of a Rust field type.
///
/// `#[derive(Contract)]` uses it to fill in the kind of a `#[member]` that does
/// not spell one out, and every derived contract implements it as a nested record.
///
/// # Examples
///
/// ```
/// use vc_contract::info::ValueKind;
/// use vc_contract::value::FieldKind;
///
/// assert_eq!(<Option<f64>>::value_kind(), ValueKind::NUMBER);
/// assert_eq!(<Vec<String>>::value_kind(), ValueKind::sequence(ValueKind::STRING));
/// ```
pub trait FieldKind {
    fn value_kind() -> ValueKind;
}

/// Moves a Rust field value into and out of the tree.
///
/// - `to_value` returns `None` when the field is absent.
/// - `from_value` hands the rejected value back when the field cannot hold it.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Option<Value>;

    fn from_value(value: Value) -> Result<Self, Value>;
}

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl FieldKind for $ty {
                #[inline]
                fn value_kind() -> ValueKind {
                    ValueKind::NUMBER
                }
            }

            impl FieldValue for $ty {
                #[inline]
                fn to_value(&self) -> Option<Value> {
                    Some(Value::Number(*self as f64))
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Number(n) => Ok(n as $ty),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FieldKind for $ty {
                #[inline]
                fn value_kind() -> ValueKind {
                    ValueKind::NUMBER
                }
            }

            impl FieldValue for $ty {
                #[inline]
                fn to_value(&self) -> Option<Value> {
                    Some(Value::Number(*self as f64))
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Number(n)
                            if n.fract() == 0.0
                                && n >= <$ty>::MIN as f64
                                && n <= <$ty>::MAX as f64 =>
                        {
                            Ok(n as $ty)
                        }
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_float!(f32, f64);
impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldKind for bool {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::BOOLEAN
    }
}

impl FieldValue for bool {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldKind for String {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::STRING
    }
}

impl FieldValue for String {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::String(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldKind for Timestamp {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::TIMESTAMP
    }
}

impl FieldValue for Timestamp {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::Timestamp(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(other),
        }
    }
}

// -----------------------------------------------------------------------------
// Untyped containers

impl FieldKind for Value {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::Unspecified
    }
}

/// A `Value` field holds anything, `Null` included.
impl FieldValue for Value {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(self.clone())
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FieldKind for Object {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::Unspecified
    }
}

impl FieldValue for Object {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::Object(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldKind for KeyedMap {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::keyed_map(ValueKind::Unspecified, ValueKind::Unspecified)
    }
}

impl FieldValue for KeyedMap {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::Map(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Map(v) => Ok(v),
            other => Err(other),
        }
    }
}

/// The concrete record type is unknown here, a `#[member(kind = ..)]` or
/// `#[member(item = ..)]` supplies it.
impl FieldKind for Box<dyn Record> {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::Unspecified
    }
}

impl FieldValue for Box<dyn Record> {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        Some(Value::Record(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Record(v) => Ok(v),
            other => Err(other),
        }
    }
}

// -----------------------------------------------------------------------------
// Generic containers

impl<T: FieldKind> FieldKind for Option<T> {
    #[inline]
    fn value_kind() -> ValueKind {
        T::value_kind()
    }
}

/// `None` is absent, `Null` is read back as `None`.
impl<T: FieldValue> FieldValue for Option<T> {
    #[inline]
    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(T::to_value)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FieldKind> FieldKind for Vec<T> {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::sequence(T::value_kind())
    }
}

/// Absent elements are written as `Null`. On failure the first rejected element
/// is handed back.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Option<Value> {
        let items = self
            .iter()
            .map(|item| item.to_value().unwrap_or(Value::Null))
            .collect();
        Some(Value::Seq(items))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other),
        }
    }
}

/// Reads the entries of a keyed map, or of an object whose text keys
/// become `Value::String`.
fn map_entries(value: Value) -> Result<Vec<(Value, Value)>, Value> {
    match value {
        Value::Map(map) => Ok(map.into_iter().collect()),
        Value::Object(object) => Ok(object
            .into_iter()
            .map(|(k, v)| (Value::String(k), v))
            .collect()),
        other => Err(other),
    }
}

fn convert_entry<K: FieldValue, V: FieldValue>(
    (key, value): (Value, Value),
) -> Result<(K, V), Value> {
    Ok((K::from_value(key)?, V::from_value(value)?))
}

impl<K: FieldKind, V: FieldKind, S> FieldKind for HashMap<K, V, S> {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::keyed_map(K::value_kind(), V::value_kind())
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S>
where
    K: FieldValue + Eq + Hash,
    V: FieldValue,
    S: BuildHasher + Default,
{
    fn to_value(&self) -> Option<Value> {
        let map = self
            .iter()
            .map(|(k, v)| {
                (
                    k.to_value().unwrap_or(Value::Null),
                    v.to_value().unwrap_or(Value::Null),
                )
            })
            .collect::<KeyedMap>();
        Some(Value::Map(map))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        map_entries(value)?.into_iter().map(convert_entry).collect()
    }
}

impl<K: FieldKind, V: FieldKind> FieldKind for BTreeMap<K, V> {
    #[inline]
    fn value_kind() -> ValueKind {
        ValueKind::keyed_map(K::value_kind(), V::value_kind())
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn to_value(&self) -> Option<Value> {
        let map = self
            .iter()
            .map(|(k, v)| {
                (
                    k.to_value().unwrap_or(Value::Null),
                    v.to_value().unwrap_or(Value::Null),
                )
            })
            .collect::<KeyedMap>();
        Some(Value::Map(map))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        map_entries(value)?.into_iter().map(convert_entry).collect()
    }
}

// -----------------------------------------------------------------------------
// Tests
