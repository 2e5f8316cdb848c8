//! The validation, deserialization and serialization engines.
//!
//! All three walk the effective descriptor set of a record's type, see
//! [`effective_descriptors`](crate::registry::effective_descriptors), and
//! recurse into nested records, sequences and keyed maps.
//!
//! - [`find_first_invalid_field`] / [`validate`]: check live field values.
//! - [`from_tree`]: build a record from a tree, coercing values to their kinds.
//! - [`to_tree`]: export a record into a plain tree.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod path;
mod ser;
mod validate;

// -----------------------------------------------------------------------------
// Exports

pub use de::from_tree;
pub use ser::to_tree;
pub use validate::{find_first_invalid_field, validate};
