#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::vc_contract::...` paths. Inside this crate (unit tests
// and doctests) that path must resolve too, so `vc_contract` is an alias for `crate`.
extern crate self as vc_contract;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod info;
pub mod ops;
pub mod record;
pub mod registry;
pub mod value;

#[cfg(feature = "json")]
pub mod json;

#[cfg(all(test, feature = "json"))]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::ContractError;
pub use record::{Contract, DynamicRecord, Record};
pub use value::Value;
pub use vc_contract_derive as derive;
pub use vc_contract_derive::Contract;
