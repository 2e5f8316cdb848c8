//! Paths of the items the emitted code refers to.
//!
//! Everything goes through `vc_contract::__macro_exports`, so that moving an item
//! inside `vc_contract` only touches that module and this one.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_contract` crate.
///
/// 1. For crates that depend on `vc_contract`, `::vc_contract` is returned.
/// 2. For crates that depend on `vc_data`, `::vc_data::contract` is returned.
/// 3. Otherwise `::vc_contract` is returned, which may be incorrect.
///
/// The manifest is read on every call, pass the result around instead.
pub(crate) fn vc_contract() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_contract"))
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_contract_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_contract_path::__macro_exports
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_contract_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_contract_path::__macro_exports::auto_register
    }
}
