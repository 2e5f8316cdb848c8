use alloc::boxed::Box;
use core::fmt;

use crate::registry::RecordType;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// Scalar kinds of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    Timestamp,
    /// A scalar the engines pass through untouched.
    Opaque,
}

// -----------------------------------------------------------------------------
// RecordRef

/// A reference to a record type, resolved on first use.
///
/// Derived contracts refer to each other through `fn() -> RecordType`, so a type
/// can name itself (or a type that names it back) in a field without declaring
/// the whole graph up front.
#[derive(Clone, Copy)]
pub enum RecordRef {
    Lazy(fn() -> RecordType),
    Resolved(RecordType),
}

impl RecordRef {
    /// Returns the referenced type, declaring it if needed.
    #[inline]
    pub fn get(&self) -> RecordType {
        match self {
            Self::Lazy(f) => f(),
            Self::Resolved(ty) => *ty,
        }
    }
}

impl From<RecordType> for RecordRef {
    #[inline]
    fn from(value: RecordType) -> Self {
        Self::Resolved(value)
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for RecordRef {}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Not resolved here, `Debug` must not declare types.
            Self::Lazy(_) => f.write_str("RecordRef::Lazy(..)"),
            Self::Resolved(ty) => write!(f, "RecordRef::Resolved({ty})"),
        }
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// How the engines treat the value of a field.
///
/// Element kinds of sequences and keyed maps are optional, an absent element
/// kind means elements are used as-is. [`ValueKind::sequence`] and
/// [`ValueKind::keyed_map`] turn an `Unspecified` element into an absent one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ValueKind {
    Primitive(PrimitiveKind),
    Sequence(Option<Box<ValueKind>>),
    KeyedMap {
        key: Option<Box<ValueKind>>,
        value: Option<Box<ValueKind>>,
    },
    Record(RecordRef),
    /// No kind information, no kind check and no coercion.
    #[default]
    Unspecified,
}

impl ValueKind {
    pub const NUMBER: Self = Self::Primitive(PrimitiveKind::Number);
    pub const STRING: Self = Self::Primitive(PrimitiveKind::String);
    pub const BOOLEAN: Self = Self::Primitive(PrimitiveKind::Boolean);
    pub const TIMESTAMP: Self = Self::Primitive(PrimitiveKind::Timestamp);
    pub const OPAQUE: Self = Self::Primitive(PrimitiveKind::Opaque);

    /// A sequence whose elements have kind `item`.
    #[inline]
    pub fn sequence(item: ValueKind) -> Self {
        Self::Sequence(item.into_element())
    }

    /// A keyed map whose keys and values have the given kinds.
    #[inline]
    pub fn keyed_map(key: ValueKind, value: ValueKind) -> Self {
        Self::KeyedMap {
            key: key.into_element(),
            value: value.into_element(),
        }
    }

    /// A nested record of type `ty`.
    #[inline]
    pub fn record(ty: RecordType) -> Self {
        Self::Record(RecordRef::Resolved(ty))
    }

    /// `None` for `Unspecified`, the boxed kind otherwise.
    #[inline]
    pub fn into_element(self) -> Option<Box<Self>> {
        match self {
            Self::Unspecified => None,
            kind => Some(Box::new(kind)),
        }
    }

    #[inline]
    pub const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}
