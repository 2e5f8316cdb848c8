//! Record instances.
//!
//! ## Menu
//!
//! - [`Record`]: an object-safe view of a record instance, by internal field name.
//! - [`Contract`]: a concrete record type with a declared [`RecordType`].
//! - [`DynamicRecord`]: a schema-less record holding an ordered [`Object`](crate::value::Object).
//!
//! Both traits are normally implemented by `#[derive(Contract)]`.

// -----------------------------------------------------------------------------
// Modules

mod dynamic;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::DynamicRecord;

use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use crate::ContractError;
use crate::registry::{FieldKey, RecordType, effective_descriptors};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Record

/// A record instance whose fields are reachable by internal name.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, Record, Value};
///
/// #[derive(Contract, Default, Clone)]
/// struct Point {
///     #[member]
///     x: f64,
///     #[member(name = "why")]
///     y: Option<f64>,
/// }
///
/// let mut point = Point::default();
/// point.set_field("x", Value::from(1)).unwrap();
/// assert_eq!(point.x, 1.0);
/// assert_eq!(point.field("y"), None);
///
/// // The rejected value is handed back.
/// assert_eq!(point.set_field("x", Value::from("1")), Err(Value::from("1")));
///
/// let tree = point.to_tree();
/// assert_eq!(tree.get("x"), Some(&Value::from(1)));
/// assert_eq!(tree.get("why"), None);
/// ```
pub trait Record: Any + Send + Sync {
    /// The runtime record type of this instance.
    fn record_type(&self) -> RecordType;

    /// Reads a field, `None` if it is absent or unknown.
    fn field(&self, name: &str) -> Option<Value>;

    /// Writes a field, handing `value` back if the field cannot hold it.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), Value>;

    fn clone_record(&self) -> Box<dyn Record>;

    fn as_record(&self) -> &dyn Record;

    fn as_record_mut(&mut self) -> &mut dyn Record;

    /// See [`ops::to_tree`](crate::ops::to_tree).
    #[inline]
    fn to_tree(&self) -> Value {
        crate::ops::to_tree(self.as_record())
    }

    /// See [`json::to_json`](crate::json::to_json).
    #[cfg(feature = "json")]
    #[inline]
    fn to_json(&self) -> Result<String, ContractError> {
        crate::json::to_json(self.as_record())
    }

    /// See [`ops::validate`](crate::ops::validate).
    #[inline]
    fn validate(&self) -> Result<(), ContractError> {
        crate::ops::validate(self.as_record())
    }

    /// See [`ops::find_first_invalid_field`](crate::ops::find_first_invalid_field).
    #[inline]
    fn find_first_invalid_field(&self) -> Option<(String, Value)> {
        crate::ops::find_first_invalid_field(self.as_record())
    }
}

impl dyn Record {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Record>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    #[inline]
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts to `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Record>(self: Box<dyn Record>) -> Result<Box<T>, Box<dyn Record>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }
}

impl Clone for Box<dyn Record> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

/// Prints the type name and the present effective fields.
impl fmt::Debug for dyn Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dynamic) = self.downcast_ref::<DynamicRecord>() {
            return fmt::Debug::fmt(dynamic, f);
        }

        let ty = self.record_type();
        let mut state = f.debug_struct(ty.name());
        for descriptor in effective_descriptors(ty, FieldKey::InternalName).iter() {
            if let Some(value) = self.field(descriptor.internal_name()) {
                state.field(descriptor.internal_name(), &value);
            }
        }
        state.finish()
    }
}

/// Records are equal when they share a record type and every effective field
/// is equal. Dynamic records compare all of their entries.
impl PartialEq for dyn Record {
    fn eq(&self, other: &Self) -> bool {
        if self.record_type() != other.record_type() {
            return false;
        }
        if let (Some(a), Some(b)) = (
            self.downcast_ref::<DynamicRecord>(),
            other.downcast_ref::<DynamicRecord>(),
        ) {
            return a == b;
        }
        effective_descriptors(self.record_type(), FieldKey::InternalName)
            .iter()
            .all(|d| self.field(d.internal_name()) == other.field(d.internal_name()))
    }
}

// -----------------------------------------------------------------------------
// Contract

/// A concrete record type.
///
/// `contract_type` declares the type (and registers its fields) on first call.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, Value};
///
/// #[derive(Contract, Default, Clone, Debug, PartialEq)]
/// struct Release {
///     #[member]
///     version: String,
///     #[member]
///     takes: f64,
/// }
///
/// let tree: Value = serde_json::from_str(r#"{"version":"4.0","takes":"100"}"#).unwrap();
/// let release = Release::decode(&tree).unwrap();
/// assert_eq!(release, Release { version: "4.0".into(), takes: 100.0 });
/// ```
pub trait Contract: Record + Default + Clone {
    fn contract_type() -> RecordType;

    /// Deserializes `tree`, the result may be a subtype picked by the resolve hook.
    #[inline]
    fn from_tree(tree: &Value) -> Result<Box<dyn Record>, ContractError> {
        crate::ops::from_tree(Self::contract_type(), tree)
    }

    /// Parses JSON text and deserializes it like [`from_tree`](Contract::from_tree).
    #[cfg(feature = "json")]
    #[inline]
    fn from_json(text: &str) -> Result<Box<dyn Record>, ContractError> {
        crate::json::from_json(Self::contract_type(), text)
    }

    /// Deserializes `tree` into exactly `Self`.
    ///
    /// Fails with [`ContractError::TypeMismatch`] if the resolve hook picked another type.
    fn decode(tree: &Value) -> Result<Self, ContractError> {
        let record = Self::from_tree(tree)?;
        let found = record.record_type();
        match record.downcast::<Self>() {
            Ok(this) => Ok(*this),
            Err(_) => Err(ContractError::TypeMismatch {
                expected: Self::contract_type(),
                found,
            }),
        }
    }
}
