//! Items referenced by the code `#[derive(Contract)]` emits.

pub use alloc::boxed::Box;
pub use std::sync::OnceLock;

pub use crate::info::{Direction, FieldDescriptor, RecordRef, ValueKind};
pub use crate::record::{Contract, Record};
pub use crate::registry::{RecordType, TypeDecl, declare, register_field};
pub use crate::value::{FieldKind, FieldValue, Value};

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use crate::registry::AutoRegister;
    pub use inventory;
}
