use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, Type};

/// Keywords accepted where a kind is expected.
const KEYWORDS: &[&str] = &["number", "string", "boolean", "timestamp", "opaque", "any"];

/// The right-hand side of `kind = ..`, `item = ..`, `key = ..` or `value = ..`.
///
/// Either one of [`KEYWORDS`], or a type whose `FieldKind` supplies the kind,
/// e.g. `item = Nested` or `kind = Vec<String>`.
pub(crate) enum KindExpr {
    Keyword(Ident),
    Type(Box<Type>),
}

impl Parse for KindExpr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ty: Type = input.parse()?;
        if let Type::Path(path) = &ty
            && path.qself.is_none()
            && let Some(ident) = path.path.get_ident()
            && KEYWORDS.iter().any(|k| ident == k)
        {
            return Ok(Self::Keyword(ident.clone()));
        }
        Ok(Self::Type(Box::new(ty)))
    }
}

impl KindExpr {
    /// An expression of type `ValueKind`.
    pub fn expression(&self, exports: &TokenStream) -> TokenStream {
        match self {
            Self::Keyword(ident) => match ident.to_string().as_str() {
                "number" => quote! { #exports::ValueKind::NUMBER },
                "string" => quote! { #exports::ValueKind::STRING },
                "boolean" => quote! { #exports::ValueKind::BOOLEAN },
                "timestamp" => quote! { #exports::ValueKind::TIMESTAMP },
                "opaque" => quote! { #exports::ValueKind::OPAQUE },
                _ => quote! { #exports::ValueKind::Unspecified },
            },
            Self::Type(ty) => quote! {
                <#ty as #exports::FieldKind>::value_kind()
            },
        }
    }
}
