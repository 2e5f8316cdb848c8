use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::record::{DynamicRecord, Record};
use crate::value::Value;

/// The polymorphic type selection hook, called with the requested type and the raw tree.
pub type ResolveHook = Arc<dyn Fn(RecordType, &Value) -> RecordType + Send + Sync>;

/// Builds an empty instance of the given type.
pub type Constructor = fn(RecordType) -> Box<dyn Record>;

fn construct_native<T: Record + Default>(_: RecordType) -> Box<dyn Record> {
    Box::new(T::default())
}

fn construct_dynamic(ty: RecordType) -> Box<dyn Record> {
    Box::new(DynamicRecord::new(ty))
}

// -----------------------------------------------------------------------------
// RecordTypeInfo

/// The immutable header of a declared record type.
///
/// Headers are created by [`declare`](crate::registry::declare) and live for the
/// rest of the process.
pub struct RecordTypeInfo {
    index: usize,
    name: Cow<'static, str>,
    parent: Option<RecordType>,
    construct: Constructor,
    resolver: Option<ResolveHook>,
}

impl RecordTypeInfo {
    pub(super) fn new(index: usize, decl: TypeDecl) -> Self {
        Self {
            index,
            name: decl.name,
            parent: decl.parent,
            construct: decl.construct,
            resolver: decl.resolver,
        }
    }
}

// -----------------------------------------------------------------------------
// RecordType

/// A handle to a declared record type.
///
/// `RecordType` is `Copy`, two handles are equal iff they were returned by the
/// same [`declare`](crate::registry::declare) call.
///
/// # Examples
///
/// ```
/// use vc_contract::registry::{self, RecordType, TypeDecl};
///
/// let base = registry::declare(TypeDecl::dynamic("doc::Shape"));
/// let circle = registry::declare(TypeDecl::dynamic("doc::Circle").extends(base));
///
/// assert_eq!(circle.parent(), Some(base));
/// assert!(circle.is_subtype_of(base));
/// assert!(circle.is_subtype_of(RecordType::base()));
/// assert_eq!(circle.to_string(), "doc::Circle");
/// ```
#[derive(Clone, Copy)]
pub struct RecordType(&'static RecordTypeInfo);

impl RecordType {
    #[inline]
    pub(super) const fn from_info(info: &'static RecordTypeInfo) -> Self {
        Self(info)
    }

    /// The built-in root of every record type hierarchy.
    ///
    /// It declares no fields, instances are [`DynamicRecord`]s.
    pub fn base() -> Self {
        static BASE: OnceLock<RecordType> = OnceLock::new();
        *BASE.get_or_init(|| super::declare(TypeDecl::root("vc_contract::DynamicRecord")))
    }

    /// Position in the type table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0.index
    }

    #[inline]
    pub fn name(self) -> &'static str {
        &self.0.name
    }

    #[inline]
    pub const fn parent(self) -> Option<RecordType> {
        self.0.parent
    }

    /// Iterates `self`, its parent, its parent's parent, up to the base type.
    #[inline]
    pub fn ancestors(self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// Returns `true` if `other` is `self` or one of its ancestors.
    pub fn is_subtype_of(self, other: RecordType) -> bool {
        self.ancestors().any(|ty| ty == other)
    }

    /// Builds an empty instance of this type.
    #[inline]
    pub fn construct(self) -> Box<dyn Record> {
        (self.0.construct)(self)
    }

    /// Selects the concrete type to build from `tree`.
    ///
    /// The nearest resolve hook on the ancestor chain is called with `(self, tree)`,
    /// without one `self` is returned.
    pub fn resolve(self, tree: &Value) -> RecordType {
        match self.ancestors().find_map(|ty| ty.0.resolver.as_ref()) {
            Some(hook) => hook(self, tree),
            None => self,
        }
    }
}

impl PartialEq for RecordType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.index.hash(state);
    }
}

impl fmt::Display for RecordType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name())
            .field("parent", &self.parent().map(RecordType::name))
            .field("resolver", &self.0.resolver.is_some())
            .finish()
    }
}

/// See [`RecordType::ancestors`].
#[derive(Clone)]
pub struct Ancestors {
    next: Option<RecordType>,
}

impl Iterator for Ancestors {
    type Item = RecordType;

    #[inline]
    fn next(&mut self) -> Option<RecordType> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// TypeDecl

/// A record type declaration, consumed by [`declare`](crate::registry::declare).
///
/// Unless [`extends`](TypeDecl::extends) is called, the parent is
/// [`RecordType::base`].
pub struct TypeDecl {
    name: Cow<'static, str>,
    parent: Option<RecordType>,
    construct: Constructor,
    resolver: Option<ResolveHook>,
}

impl TypeDecl {
    fn root(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            parent: None,
            construct: construct_dynamic,
            resolver: None,
        }
    }

    /// A type whose instances are `T::default()`.
    pub fn native<T: Record + Default>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parent: Some(RecordType::base()),
            construct: construct_native::<T>,
            resolver: None,
        }
    }

    /// A type whose instances are [`DynamicRecord`]s.
    pub fn dynamic(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parent: Some(RecordType::base()),
            construct: construct_dynamic,
            resolver: None,
        }
    }

    #[inline]
    pub fn extends(mut self, parent: RecordType) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the polymorphic type selection hook of this type and its descendants.
    #[inline]
    pub fn with_resolver(
        mut self,
        f: impl Fn(RecordType, &Value) -> RecordType + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(f));
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
