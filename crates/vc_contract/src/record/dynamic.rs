use alloc::boxed::Box;
use alloc::string::String;

use crate::record::{Contract, Record};
use crate::registry::RecordType;
use crate::value::{Object, Value};

// -----------------------------------------------------------------------------
// DynamicRecord

/// A record without a Rust schema, its fields live in an ordered [`Object`].
///
/// It is what runtime-declared types (`TypeDecl::dynamic`) construct, and its
/// own contract type is [`RecordType::base`], which declares no fields: every
/// key of a tree is copied onto it as-is and it serializes to an empty tree.
///
/// # Examples
///
/// ```
/// use vc_contract::{Contract, DynamicRecord, Record, Value};
///
/// let tree: Value = serde_json::from_str(r#"{"a":1,"b":[true]}"#).unwrap();
/// let record = DynamicRecord::from_tree(&tree).unwrap();
///
/// let record = record.downcast_ref::<DynamicRecord>().unwrap();
/// assert_eq!(record.get("a"), Some(&Value::from(1)));
/// assert_eq!(record.to_tree(), Value::Object(Default::default()));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicRecord {
    ty: RecordType,
    fields: Object,
}

impl DynamicRecord {
    #[inline]
    pub fn new(ty: RecordType) -> Self {
        Self {
            ty,
            fields: Object::new(),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name, value)
    }

    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    #[inline]
    pub const fn fields(&self) -> &Object {
        &self.fields
    }

    #[inline]
    pub fn into_fields(self) -> Object {
        self.fields
    }
}

impl Default for DynamicRecord {
    #[inline]
    fn default() -> Self {
        Self::new(RecordType::base())
    }
}

impl Record for DynamicRecord {
    #[inline]
    fn record_type(&self) -> RecordType {
        self.ty
    }

    #[inline]
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    #[inline]
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), Value> {
        self.fields.insert(name, value);
        Ok(())
    }

    #[inline]
    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    #[inline]
    fn as_record(&self) -> &dyn Record {
        self
    }

    #[inline]
    fn as_record_mut(&mut self) -> &mut dyn Record {
        self
    }
}

impl Contract for DynamicRecord {
    #[inline]
    fn contract_type() -> RecordType {
        RecordType::base()
    }
}

// -----------------------------------------------------------------------------
// Tests
