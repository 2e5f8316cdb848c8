//! Field descriptors and the kinds they carry.
//!
//! ## Menu
//!
//! - [`FieldDescriptor`]: per-field metadata, built with `with_*` methods.
//! - [`ValueKind`] / [`PrimitiveKind`]: the closed set of kinds the engines dispatch on.
//! - [`RecordRef`]: a lazily resolved reference to a nested record type.
//! - [`Direction`]: serialization / deserialization participation flags.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod direction;
mod kind;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{FieldDescriptor, Transform, Validator};
pub use direction::Direction;
pub use kind::{PrimitiveKind, RecordRef, ValueKind};
