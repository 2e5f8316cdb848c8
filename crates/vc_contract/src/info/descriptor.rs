use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{Direction, ValueKind};
use crate::value::Value;

/// A predicate over a candidate value.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A total replacement of the default coercion or export of a field value.
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

// -----------------------------------------------------------------------------
// FieldDescriptor

/// Metadata of one declared field.
///
/// Descriptors are immutable once registered, the `with_*` methods are only
/// meant for building one.
///
/// # Examples
///
/// ```
/// use vc_contract::info::{Direction, FieldDescriptor, ValueKind};
///
/// let descriptor = FieldDescriptor::new("takes")
///     .with_name("t")
///     .with_item(ValueKind::NUMBER)
///     .with_validator(|v| !v.is_null())
///     .with_direction(Direction::DESERIALIZE_ONLY);
///
/// assert_eq!(descriptor.internal_name(), "takes");
/// assert_eq!(descriptor.exposed_name(), "t");
/// assert_eq!(descriptor.item_kind(), Some(&ValueKind::NUMBER));
/// assert_eq!(descriptor.validators().len(), 1);
/// assert!(!descriptor.direction().serializes());
/// ```
#[derive(Clone)]
pub struct FieldDescriptor {
    internal_name: Cow<'static, str>,
    exposed_name: Cow<'static, str>,
    kind: ValueKind,
    validators: Vec<Validator>,
    serializer: Option<Transform>,
    deserializer: Option<Transform>,
    required: bool,
    direction: Direction,
}

impl FieldDescriptor {
    /// Creates a descriptor exposed under its internal name, with no kind,
    /// no validators, not required, in both directions.
    pub fn new(internal_name: impl Into<Cow<'static, str>>) -> Self {
        let internal_name = internal_name.into();
        Self {
            exposed_name: internal_name.clone(),
            internal_name,
            kind: ValueKind::Unspecified,
            validators: Vec::new(),
            serializer: None,
            deserializer: None,
            required: false,
            direction: Direction::BOTH,
        }
    }

    /// Sets the key used in the external tree.
    #[inline]
    pub fn with_name(mut self, exposed_name: impl Into<Cow<'static, str>>) -> Self {
        self.exposed_name = exposed_name.into();
        self
    }

    #[inline]
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Makes the field a sequence whose elements have kind `item`.
    #[inline]
    pub fn with_item(mut self, item: ValueKind) -> Self {
        self.kind = ValueKind::sequence(item);
        self
    }

    /// Makes the field a keyed map whose keys have kind `key`.
    ///
    /// The value kind is kept if the field already is a keyed map.
    pub fn with_key(mut self, key: ValueKind) -> Self {
        self.kind = match self.kind {
            ValueKind::KeyedMap { value, .. } => ValueKind::KeyedMap {
                key: key.into_element(),
                value,
            },
            _ => ValueKind::keyed_map(key, ValueKind::Unspecified),
        };
        self
    }

    /// Makes the field a keyed map whose values have kind `value`.
    ///
    /// The key kind is kept if the field already is a keyed map.
    pub fn with_value(mut self, value: ValueKind) -> Self {
        self.kind = match self.kind {
            ValueKind::KeyedMap { key, .. } => ValueKind::KeyedMap {
                key,
                value: value.into_element(),
            },
            _ => ValueKind::keyed_map(ValueKind::Unspecified, value),
        };
        self
    }

    /// Appends a validator, validators run in insertion order.
    #[inline]
    pub fn with_validator(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validators.push(Arc::new(f));
        self
    }

    /// Appends several validators.
    #[inline]
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Replaces default export of the field value during serialization.
    #[inline]
    pub fn with_serializer(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.serializer = Some(Arc::new(f));
        self
    }

    /// Replaces default coercion of the raw value during deserialization.
    #[inline]
    pub fn with_deserializer(
        mut self,
        f: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.deserializer = Some(Arc::new(f));
        self
    }

    /// Shorthand for `with_required(true)`.
    #[inline]
    pub fn required(self) -> Self {
        self.with_required(true)
    }

    #[inline]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[inline]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors

    /// The field's identifier within its record type.
    #[inline]
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// The key used in the external tree.
    #[inline]
    pub fn exposed_name(&self) -> &str {
        &self.exposed_name
    }

    #[inline]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// The element kind, if this is a sequence with one.
    pub fn item_kind(&self) -> Option<&ValueKind> {
        match &self.kind {
            ValueKind::Sequence(item) => item.as_deref(),
            _ => None,
        }
    }

    /// The key kind, if this is a keyed map with one.
    pub fn key_kind(&self) -> Option<&ValueKind> {
        match &self.kind {
            ValueKind::KeyedMap { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    /// The value kind, if this is a keyed map with one.
    pub fn value_kind(&self) -> Option<&ValueKind> {
        match &self.kind {
            ValueKind::KeyedMap { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    #[inline]
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    #[inline]
    pub fn serializer(&self) -> Option<&Transform> {
        self.serializer.as_ref()
    }

    #[inline]
    pub fn deserializer(&self) -> Option<&Transform> {
        self.deserializer.as_ref()
    }

    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("internal_name", &self.internal_name)
            .field("exposed_name", &self.exposed_name)
            .field("kind", &self.kind)
            .field("validators", &self.validators.len())
            .field("serializer", &self.serializer.is_some())
            .field("deserializer", &self.deserializer.is_some())
            .field("required", &self.required)
            .field("direction", &self.direction)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
