use alloc::string::String;

use thiserror::Error;

use crate::registry::RecordType;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Error

/// Errors raised by validation, deserialization and the JSON entry points.
///
/// # Examples
///
/// ```
/// use vc_contract::{ContractError, Value};
///
/// let err = ContractError::invalid_value("nested.y", Value::from("abc"));
/// assert_eq!(err.to_string(), r#"Value "abc" is not valid for member "nested.y""#);
/// assert_eq!(err.path(), Some("nested.y"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContractError {
    /// A field value did not satisfy its descriptor, or could not be coerced to it.
    #[error("Value \"{text}\" is not valid for member \"{path}\"", text = .value.to_text())]
    InvalidValue { path: String, value: Value },

    /// The resolve hook picked a type other than the one being decoded.
    #[error("Record type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: RecordType,
        found: RecordType,
    },

    #[cfg(feature = "json")]
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContractError {
    #[inline]
    pub fn invalid_value(path: impl Into<String>, value: Value) -> Self {
        Self::InvalidValue {
            path: path.into(),
            value,
        }
    }

    /// The dotted field path of an [`InvalidValue`](Self::InvalidValue).
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The offending value of an [`InvalidValue`](Self::InvalidValue).
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::InvalidValue { value, .. } => Some(value),
            _ => None,
        }
    }
}
