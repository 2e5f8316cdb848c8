//! The tree exchanged at the serialization boundary.
//!
//! ## Menu
//!
//! - [`Value`]: a parsed, language-native tree node.
//! - [`Object`]: a plain key/value structure keyed by text, the external shape of a record.
//! - [`KeyedMap`]: an in-memory keyed map, keys may be any [`Value`].
//! - [`Timestamp`]: a UTC instant, or the invalid timestamp.
//! - [`FieldKind`] / [`FieldValue`]: how a Rust field type maps onto the tree.
//!
//! The textual codec (JSON) is not part of this module, `Value` only implements
//! `serde_core`'s `Serialize` and `Deserialize` so that any serde format can carry it.

// -----------------------------------------------------------------------------
// Modules

mod field;
mod map;
mod number;
mod serde;
mod timestamp;

// -----------------------------------------------------------------------------
// Exports

pub use field::{FieldKind, FieldValue};
pub use map::{KeyedMap, Object};
pub use timestamp::Timestamp;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::record::Record;

// -----------------------------------------------------------------------------
// Value

/// A node of the key/value tree.
///
/// Instances of this enum are both the input of [`from_tree`] and the output of
/// [`to_tree`], and they are also the currency in which records expose their field
/// values to the engines.
///
/// # Examples
///
/// ```
/// use vc_contract::value::{Object, Value};
///
/// let mut object = Object::new();
/// object.insert("version", "4.0");
/// object.insert("takes", 100);
///
/// let tree = Value::Object(object);
/// assert_eq!(tree.to_text(), r#"{"version":"4.0","takes":100}"#);
/// ```
///
/// [`from_tree`]: crate::ops::from_tree
/// [`to_tree`]: crate::ops::to_tree
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Null or absent.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(Timestamp),
    /// An ordered sequence.
    Seq(Vec<Value>),
    /// A keyed map with arbitrary keys.
    Map(KeyedMap),
    /// A plain key/value structure keyed by text.
    Object(Object),
    /// A nested record instance.
    Record(Box<dyn Record>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if this is a [`Value::Bool`].
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a [`Value::Number`].
    #[inline]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a [`Value::String`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&KeyedMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&dyn Record> {
        match self {
            Self::Record(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Looks up `key` when this is an [`Object`], returns `None` otherwise.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// A short name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Record(_) => "record",
        }
    }

    /// Numeric conversion.
    ///
    /// - numbers are returned as-is, booleans become `1` / `0`;
    /// - text is trimmed, empty text is `0`, decimal and `0x` / `0o` / `0b`
    ///   literals are parsed, anything else is NaN;
    /// - timestamps give their epoch milliseconds, the invalid timestamp is NaN;
    /// - an empty sequence is `0`, a one-element sequence converts its element;
    /// - null is `0`, every other value is NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_contract::Value;
    ///
    /// assert_eq!(Value::from(" 100 ").to_number(), 100.0);
    /// assert_eq!(Value::from(true).to_number(), 1.0);
    /// assert!(Value::from("100px").to_number().is_nan());
    /// ```
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(v) => f64::from(u8::from(*v)),
            Self::Number(v) => *v,
            Self::String(v) => number::parse_number(v),
            Self::Timestamp(v) => v.millis().map_or(f64::NAN, |ms| ms as f64),
            Self::Seq(items) => match items.as_slice() {
                [] | [Self::Null] => 0.0,
                [item] => number::parse_number(&item.to_text()),
                _ => f64::NAN,
            },
            Self::Map(_) | Self::Object(_) | Self::Record(_) => f64::NAN,
        }
    }

    /// String conversion.
    ///
    /// Text is returned as-is, numbers use their shortest form (`100`, `1.5`,
    /// `NaN`, `Infinity`), timestamps use RFC 3339, composite values use the same
    /// compact text as [`Display`](fmt::Display).
    pub fn to_text(&self) -> String {
        match self {
            Self::String(v) => v.clone(),
            Self::Number(v) => number::number_text(*v),
            Self::Timestamp(v) => v.to_string(),
            other => other.to_string(),
        }
    }

    /// Truthiness conversion.
    ///
    /// `null`, `false`, `0`, NaN and empty text are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::Number(v) => *v != 0.0 && !v.is_nan(),
            Self::String(v) => !v.is_empty(),
            _ => true,
        }
    }
}

// -----------------------------------------------------------------------------
// Display

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            ch if ch.is_control() => write!(f, "\\u{:04x}", ch as u32)?,
            ch => fmt::Write::write_char(f, ch)?,
        }
    }
    f.write_str("\"")
}

/// Compact, JSON-like text.
///
/// Keyed maps print their keys through [`Value::to_text`], records print the
/// tree they serialize to.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => f.write_str(&number::number_text(*v)),
            Self::String(v) => write_quoted(f, v),
            Self::Timestamp(v) if v.is_valid() => write_quoted(f, &v.to_string()),
            Self::Timestamp(_) => f.write_str("null"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (index, (key, value)) in map.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, &key.to_text())?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Self::Object(object) => {
                f.write_str("{")?;
                for (index, (key, value)) in object.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Self::Record(record) => write!(f, "{}", crate::ops::to_tree(record.as_ref())),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Timestamp> for Value {
    #[inline]
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

impl From<KeyedMap> for Value {
    #[inline]
    fn from(value: KeyedMap) -> Self {
        Self::Map(value)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Box<dyn Record>> for Value {
    #[inline]
    fn from(value: Box<dyn Record>) -> Self {
        Self::Record(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// -----------------------------------------------------------------------------
// Tests
