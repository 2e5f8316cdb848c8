//! The `#[derive(Contract)]` macro of `vc_contract`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static CONTRACT_ATTRIBUTE_NAME: &str = "contract";
static MEMBER_ATTRIBUTE_NAME: &str = "member";

// -----------------------------------------------------------------------------
// Modules

mod attrs;
mod expand;
mod kind;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Data Contract Derivation
///
/// `#[derive(Contract)]` turns a struct with named fields into a record type
/// and implements:
///
/// - `Contract`: the type is declared, and its members registered, on the first
///   call to `contract_type`.
/// - `Record`: field access by internal name.
/// - `FieldKind` and `FieldValue`: the struct can be a member of another contract.
///
/// The struct must also implement `Default` and `Clone`. Generic types are rejected.
///
/// ## Members
///
/// Only fields marked with `#[member]` belong to the contract, other fields are
/// invisible to validation and (de)serialization.
///
/// ```rust, ignore
/// #[derive(Contract, Default, Clone)]
/// struct Release {
///     #[member]
///     version: String,
///     #[member(name = "alias", validate = positive, required)]
///     takes: Option<f64>,
///     cache: Vec<u8>,
/// }
/// ```
///
/// Available options:
///
/// - `name = ".."`: the exposed name, defaults to the field name.
/// - `kind = K`: overrides the kind derived from the field type.
/// - `item = K`: the element kind of a sequence.
/// - `key = K`, `value = K`: the key and value kinds of a keyed map.
/// - `validate = f` or `validate = [f, g]`: `Fn(&Value) -> bool` checks.
/// - `serialize = f`, `deserialize = f`: `Fn(&Value) -> Value` hooks.
/// - `required`: null or absent values fail validation.
/// - `direction = ignore | serialize_only | deserialize_only | both`.
///
/// `K` is one of `number`, `string`, `boolean`, `timestamp`, `opaque`, `any`, or
/// a type whose `FieldKind` supplies the kind, e.g. `item = Nested`.
///
/// ## Inheritance
///
/// A contract extends another by embedding an instance of it. Names the
/// contract does not declare are read and written on that field.
///
/// ```rust, ignore
/// #[derive(Contract, Default, Clone)]
/// #[contract(extends = Base)]
/// struct Derived {
///     #[contract(base)]
///     base: Base,
///     #[member]
///     version: String,
/// }
/// ```
///
/// `extends` may be omitted, the type of the `#[contract(base)]` field is used.
///
/// ## Type attributes
///
/// - `name = ".."`: the registered type name, defaults to `module_path!()::Ident`.
/// - `resolve = f`: a `Fn(RecordType, &Value) -> RecordType` hook picking the
///   concrete type to deserialize, inherited by descendants.
/// - `auto_register`: see `vc_contract::registry::auto_register`. A no-op when
///   the `auto_register` feature is disabled.
#[proc_macro_derive(Contract, attributes(contract, member))]
pub fn derive_contract(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match expand::ContractStruct::parse(&ast) {
        Ok(data) => data.expand().into(),
        Err(err) => err.into_compile_error().into(),
    }
}
