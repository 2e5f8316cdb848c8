//! JSON entry points, backed by `serde_json`.
//!
//! The engines only see [`Value`] trees, these functions add the text step
//! on either side.

use alloc::boxed::Box;
use alloc::string::String;

use crate::ContractError;
use crate::record::Record;
use crate::registry::RecordType;
use crate::value::Value;

/// Parses `text` and deserializes it as a record of type `ty`.
///
/// Malformed text fails with [`ContractError::Json`].
pub fn from_json(ty: RecordType, text: &str) -> Result<Box<dyn Record>, ContractError> {
    let tree: Value = serde_json::from_str(text)?;
    crate::ops::from_tree(ty, &tree)
}

/// Serializes `record` and writes the tree as compact JSON.
pub fn to_json(record: &dyn Record) -> Result<String, ContractError> {
    serde_json::to_string(&crate::ops::to_tree(record)).map_err(ContractError::from)
}
