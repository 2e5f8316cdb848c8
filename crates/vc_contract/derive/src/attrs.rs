//! Parsers for `#[contract(..)]` and `#[member(..)]`.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, LitStr, Meta, Path};

use crate::kind::KindExpr;
use crate::{CONTRACT_ATTRIBUTE_NAME, MEMBER_ATTRIBUTE_NAME};

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

// -----------------------------------------------------------------------------
// Type attributes

/// `#[contract(extends = Base, resolve = path, name = "..", auto_register)]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub extends: Option<Path>,
    pub resolve: Option<Expr>,
    pub name: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(CONTRACT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("extends") {
                    let value = meta.value()?.parse()?;
                    set_once(&mut this.extends, value, &meta)
                } else if meta.path.is_ident("resolve") {
                    let value = meta.value()?.parse()?;
                    set_once(&mut this.resolve, value, &meta)
                } else if meta.path.is_ident("name") {
                    let value = meta.value()?.parse()?;
                    set_once(&mut this.name, value, &meta)
                } else if meta.path.is_ident("auto_register") {
                    set_once(&mut this.auto_register, meta.path.span(), &meta)
                } else {
                    Err(meta.error(
                        "expected one of `extends`, `resolve`, `name`, `auto_register`",
                    ))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// `direction = ignore | serialize_only | deserialize_only | both`
#[derive(Clone, Copy)]
pub(crate) enum Direction {
    Ignore,
    SerializeOnly,
    DeserializeOnly,
    Both,
}

impl Direction {
    fn parse(ident: &Ident) -> syn::Result<Self> {
        match ident.to_string().as_str() {
            "ignore" => Ok(Self::Ignore),
            "serialize_only" => Ok(Self::SerializeOnly),
            "deserialize_only" => Ok(Self::DeserializeOnly),
            "both" => Ok(Self::Both),
            _ => Err(syn::Error::new(
                ident.span(),
                "expected one of `ignore`, `serialize_only`, `deserialize_only`, `both`",
            )),
        }
    }
}

/// Everything `#[member(..)]` can say about a field.
#[derive(Default)]
pub(crate) struct MemberAttributes {
    pub name: Option<LitStr>,
    pub kind: Option<KindExpr>,
    pub item: Option<KindExpr>,
    pub key: Option<KindExpr>,
    pub value: Option<KindExpr>,
    pub validators: Vec<Expr>,
    pub serialize: Option<Expr>,
    pub deserialize: Option<Expr>,
    pub required: bool,
    pub direction: Option<Direction>,
}

impl MemberAttributes {
    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.name, value, &meta)
        } else if meta.path.is_ident("kind") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.kind, value, &meta)
        } else if meta.path.is_ident("item") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.item, value, &meta)
        } else if meta.path.is_ident("key") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.key, value, &meta)
        } else if meta.path.is_ident("value") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.value, value, &meta)
        } else if meta.path.is_ident("validate") {
            // `validate = f` or `validate = [f, g]`
            match meta.value()?.parse()? {
                Expr::Array(array) => self.validators.extend(array.elems),
                other => self.validators.push(other),
            }
            Ok(())
        } else if meta.path.is_ident("serialize") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.serialize, value, &meta)
        } else if meta.path.is_ident("deserialize") {
            let value = meta.value()?.parse()?;
            set_once(&mut self.deserialize, value, &meta)
        } else if meta.path.is_ident("required") {
            if self.required {
                return Err(meta.error("duplicate attribute"));
            }
            self.required = true;
            Ok(())
        } else if meta.path.is_ident("direction") {
            let ident: Ident = meta.value()?.parse()?;
            let value = Direction::parse(&ident)?;
            set_once(&mut self.direction, value, &meta)
        } else {
            Err(meta.error(
                "expected one of `name`, `kind`, `item`, `key`, `value`, `validate`, \
                 `serialize`, `deserialize`, `required`, `direction`",
            ))
        }
    }
}

const CONFLICT: &str = "a field takes a single `#[member]` or `#[contract(base)]`";

/// What a struct field is to the contract.
pub(crate) enum FieldRole {
    /// Not part of the contract.
    Skip,
    /// `#[contract(base)]`, the embedded ancestor instance.
    Base(Span),
    /// `#[member]` or `#[member(..)]`.
    Member(Box<MemberAttributes>),
}

impl FieldRole {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut role = Self::Skip;
        for attr in attrs {
            if attr.path().is_ident(MEMBER_ATTRIBUTE_NAME) {
                if !matches!(role, Self::Skip) {
                    return Err(syn::Error::new(attr.span(), CONFLICT));
                }
                let mut member = MemberAttributes::default();
                if !matches!(attr.meta, Meta::Path(_)) {
                    attr.parse_nested_meta(|meta| member.parse_meta(meta))?;
                }
                role = Self::Member(Box::new(member));
            } else if attr.path().is_ident(CONTRACT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("base") {
                        Ok(())
                    } else {
                        Err(meta.error("expected `base`"))
                    }
                })?;
                if !matches!(role, Self::Skip) {
                    return Err(syn::Error::new(attr.span(), CONFLICT));
                }
                role = Self::Base(attr.span());
            }
        }
        Ok(role)
    }
}
