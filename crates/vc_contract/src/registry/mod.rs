//! The Metadata Registry, the type table and the Descriptor Resolver.
//!
//! ## Menu
//!
//! - [`RecordType`]: a handle to a declared type, with its parent chain,
//!   constructor and polymorphic [`resolve`](RecordType::resolve) hook.
//! - [`TypeDecl`] / [`declare`]: add a type to the type table.
//! - [`register_field`]: store a field descriptor on a type.
//! - [`lookup_by_internal_name`] / [`lookup_by_exposed_name`]: a type's own descriptors.
//! - [`effective_descriptors`]: descriptors merged along the ancestor chain.
//!
//! ## Concurrency
//!
//! The registry is process-wide and guarded by a `RwLock`. Declarations write it,
//! the engines only read it, and no lock is held while user code (constructors,
//! hooks, validators, resolvers) runs.
//!
//! Derived contracts declare themselves on first use. With the `auto_register`
//! feature, [`auto_register`] declares all annotated contracts up front.

// -----------------------------------------------------------------------------
// Modules

mod record_type;
mod resolver;
mod store;

#[cfg(feature = "auto_register")]
mod auto_register;

// -----------------------------------------------------------------------------
// Exports

pub use record_type::{Ancestors, Constructor, RecordType, RecordTypeInfo};
pub use record_type::{ResolveHook, TypeDecl};
pub use resolver::{EffectiveFields, FieldKey, effective_descriptors};
pub use store::{declare, find_type, lookup_by_exposed_name, lookup_by_internal_name};
pub use store::register_field;

#[cfg(feature = "auto_register")]
pub use auto_register::{AutoRegister, auto_register};
