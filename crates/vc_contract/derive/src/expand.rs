//! Code generation for `#[derive(Contract)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DataStruct, DeriveInput, Fields, Ident, LitStr, Type};

use crate::attrs::{Direction, FieldRole, MemberAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// Parsed input

struct MemberField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    attrs: MemberAttributes,
}

impl MemberField<'_> {
    /// The internal name, `r#type` is `"type"`.
    fn internal_name(&self) -> LitStr {
        LitStr::new(&self.ident.unraw().to_string(), self.ident.span())
    }
}

struct BaseField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

pub(crate) struct ContractStruct<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    base: Option<BaseField<'a>>,
    members: Vec<MemberField<'a>>,
    vc_contract_path: syn::Path,
}

impl<'a> ContractStruct<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "`#[derive(Contract)]` does not support generic types",
            ));
        }

        let Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) = &ast.data
        else {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`#[derive(Contract)]` only supports structs with named fields",
            ));
        };

        let attrs = TypeAttributes::parse(&ast.attrs)?;
        let mut base = None;
        let mut members = Vec::new();

        for field in &fields.named {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            match FieldRole::parse(&field.attrs)? {
                FieldRole::Skip => {}
                FieldRole::Base(span) => {
                    if base.is_some() {
                        return Err(syn::Error::new(span, "duplicate `#[contract(base)]` field"));
                    }
                    base = Some(BaseField {
                        ident,
                        ty: &field.ty,
                    });
                }
                FieldRole::Member(attrs) => members.push(MemberField {
                    ident,
                    ty: &field.ty,
                    attrs: *attrs,
                }),
            }
        }

        if attrs.extends.is_some() && base.is_none() {
            return Err(syn::Error::new(
                ast.ident.span(),
                "`#[contract(extends = ..)]` requires a `#[contract(base)]` field",
            ));
        }

        Ok(Self {
            ident: &ast.ident,
            attrs,
            base,
            members,
            vc_contract_path: crate::path::vc_contract(),
        })
    }
}

// -----------------------------------------------------------------------------
// Expansion

impl ContractStruct<'_> {
    /// `TypeDecl` expression, parent and resolve hook included.
    fn type_decl(&self, exports: &TokenStream) -> TokenStream {
        let ident = self.ident;
        let name = match &self.attrs.name {
            Some(name) => quote! { #name },
            None => quote! { ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)) },
        };

        // Without `extends`, the base field's type is the parent.
        let parent = match (&self.attrs.extends, &self.base) {
            (Some(path), _) => Some(quote! { #path }),
            (None, Some(base)) => {
                let ty = base.ty;
                Some(quote! { #ty })
            }
            (None, None) => None,
        };
        let extends = parent.map(|parent| {
            quote! { .extends(<#parent as #exports::Contract>::contract_type()) }
        });
        let resolver = self.attrs.resolve.as_ref().map(|resolve| {
            quote! { .with_resolver(#resolve) }
        });

        quote! {
            #exports::TypeDecl::native::<Self>(#name)
                #extends
                #resolver
        }
    }

    /// `FieldDescriptor` expression of one member.
    fn descriptor(field: &MemberField, exports: &TokenStream) -> TokenStream {
        let attrs = &field.attrs;
        let internal = field.internal_name();

        let kind = match &attrs.kind {
            Some(kind) => kind.expression(exports),
            None => {
                let ty = field.ty;
                quote! { <#ty as #exports::FieldKind>::value_kind() }
            }
        };

        let name = attrs.name.as_ref().map(|name| quote! { .with_name(#name) });
        let item = attrs.item.as_ref().map(|item| {
            let item = item.expression(exports);
            quote! { .with_item(#item) }
        });
        let key = attrs.key.as_ref().map(|key| {
            let key = key.expression(exports);
            quote! { .with_key(#key) }
        });
        let value = attrs.value.as_ref().map(|value| {
            let value = value.expression(exports);
            quote! { .with_value(#value) }
        });
        let validators = attrs.validators.iter().map(|f| {
            quote! { .with_validator(#f) }
        });
        let serializer = attrs.serialize.as_ref().map(|f| quote! { .with_serializer(#f) });
        let deserializer = attrs.deserialize.as_ref().map(|f| quote! { .with_deserializer(#f) });
        let required = attrs.required.then(|| quote! { .required() });
        let direction = attrs.direction.map(|direction| {
            let direction = match direction {
                Direction::Ignore => quote! { IGNORE },
                Direction::SerializeOnly => quote! { SERIALIZE_ONLY },
                Direction::DeserializeOnly => quote! { DESERIALIZE_ONLY },
                Direction::Both => quote! { BOTH },
            };
            quote! { .with_direction(#exports::Direction::#direction) }
        });

        quote! {
            #exports::FieldDescriptor::new(#internal)
                .with_kind(#kind)
                #name
                #item
                #key
                #value
                #(#validators)*
                #serializer
                #deserializer
                #required
                #direction
        }
    }

    fn impl_contract(&self, exports: &TokenStream) -> TokenStream {
        let ident = self.ident;
        let type_decl = self.type_decl(exports);
        let descriptors = self.members.iter().map(|f| Self::descriptor(f, exports));

        quote! {
            impl #exports::Contract for #ident {
                fn contract_type() -> #exports::RecordType {
                    static TYPE: #exports::OnceLock<#exports::RecordType> = #exports::OnceLock::new();
                    *TYPE.get_or_init(|| {
                        let ty = #exports::declare(#type_decl);
                        #( #exports::register_field(ty, #descriptors); )*
                        ty
                    })
                }
            }
        }
    }

    fn impl_record(&self, exports: &TokenStream) -> TokenStream {
        let ident = self.ident;

        let get_arms = self.members.iter().map(|field| {
            let internal = field.internal_name();
            let member = field.ident;
            quote! {
                #internal => #exports::FieldValue::to_value(&self.#member),
            }
        });
        let set_arms = self.members.iter().map(|field| {
            let internal = field.internal_name();
            let member = field.ident;
            quote! {
                #internal => {
                    self.#member = #exports::FieldValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        });

        // Names this type does not declare go to the ancestor instance.
        let (get_fallback, set_fallback) = match &self.base {
            Some(base) => {
                let base = base.ident;
                (
                    quote! { #exports::Record::field(&self.#base, name) },
                    quote! { #exports::Record::set_field(&mut self.#base, name, value) },
                )
            }
            None => (
                quote! { ::core::option::Option::None },
                quote! { ::core::result::Result::Err(value) },
            ),
        };

        quote! {
            impl #exports::Record for #ident {
                #[inline]
                fn record_type(&self) -> #exports::RecordType {
                    <Self as #exports::Contract>::contract_type()
                }

                fn field(&self, name: &str) -> ::core::option::Option<#exports::Value> {
                    match name {
                        #(#get_arms)*
                        _ => #get_fallback,
                    }
                }

                fn set_field(
                    &mut self,
                    name: &str,
                    value: #exports::Value,
                ) -> ::core::result::Result<(), #exports::Value> {
                    match name {
                        #(#set_arms)*
                        _ => #set_fallback,
                    }
                }

                #[inline]
                fn clone_record(&self) -> #exports::Box<dyn #exports::Record> {
                    #exports::Box::new(::core::clone::Clone::clone(self))
                }

                #[inline]
                fn as_record(&self) -> &dyn #exports::Record {
                    self
                }

                #[inline]
                fn as_record_mut(&mut self) -> &mut dyn #exports::Record {
                    self
                }
            }
        }
    }

    /// A contract used as a field type is a nested record.
    fn impl_field_value(&self, exports: &TokenStream) -> TokenStream {
        let ident = self.ident;

        quote! {
            impl #exports::FieldKind for #ident {
                #[inline]
                fn value_kind() -> #exports::ValueKind {
                    #exports::ValueKind::Record(#exports::RecordRef::Lazy(
                        <Self as #exports::Contract>::contract_type,
                    ))
                }
            }

            impl #exports::FieldValue for #ident {
                #[inline]
                fn to_value(&self) -> ::core::option::Option<#exports::Value> {
                    ::core::option::Option::Some(#exports::Value::Record(
                        #exports::Box::new(::core::clone::Clone::clone(self)),
                    ))
                }

                fn from_value(value: #exports::Value) -> ::core::result::Result<Self, #exports::Value> {
                    match value {
                        #exports::Value::Record(record) => match record.downcast::<Self>() {
                            ::core::result::Result::Ok(this) => ::core::result::Result::Ok(*this),
                            ::core::result::Result::Err(record) => {
                                ::core::result::Result::Err(#exports::Value::Record(record))
                            }
                        },
                        other => ::core::result::Result::Err(other),
                    }
                }
            }
        }
    }

    #[cfg(feature = "auto_register")]
    fn auto_register(&self, exports: &TokenStream) -> TokenStream {
        let Some(span) = self.attrs.auto_register else {
            return TokenStream::new();
        };
        let ident = self.ident;
        let auto_register_ = crate::path::auto_register_(&self.vc_contract_path);

        quote::quote_spanned! { span =>
            #auto_register_::inventory::submit! {
                #auto_register_::AutoRegister(<#ident as #exports::Contract>::contract_type)
            }
        }
    }

    #[cfg(not(feature = "auto_register"))]
    fn auto_register(&self, _: &TokenStream) -> TokenStream {
        TokenStream::new()
    }

    pub fn expand(&self) -> TokenStream {
        let exports = crate::path::macro_exports_(&self.vc_contract_path);

        let contract = self.impl_contract(&exports);
        let record = self.impl_record(&exports);
        let field_value = self.impl_field_value(&exports);
        let auto_register = self.auto_register(&exports);

        quote! {
            const _: () = {
                #contract
                #record
                #field_value
            };

            #auto_register
        }
    }
}
