use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use super::RecordType;
use super::store::{self, FIXED_STATE, NameMap};
use crate::info::FieldDescriptor;

// -----------------------------------------------------------------------------
// FieldKey

/// Which name de-duplicates the effective descriptor set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    InternalName,
    ExposedName,
}

impl FieldKey {
    #[inline]
    fn of(self, descriptor: &FieldDescriptor) -> &str {
        match self {
            Self::InternalName => descriptor.internal_name(),
            Self::ExposedName => descriptor.exposed_name(),
        }
    }
}

// -----------------------------------------------------------------------------
// EffectiveFields

/// The descriptors a record type exposes, ancestors included.
///
/// Iteration order is the walk order: the type's own fields in declaration
/// order, then every ancestor's fields not yet seen, nearest ancestor first.
#[derive(Clone)]
pub struct EffectiveFields {
    key: FieldKey,
    fields: Vec<Arc<FieldDescriptor>>,
    index: NameMap,
}

impl EffectiveFields {
    fn new(key: FieldKey) -> Self {
        Self {
            key,
            fields: Vec::new(),
            index: HashMap::with_hasher(FIXED_STATE),
        }
    }

    /// Keeps the first descriptor seen for each name.
    fn insert_absent(&mut self, descriptor: &Arc<FieldDescriptor>) {
        let name = self.key.of(descriptor);
        if !self.index.contains_key(name) {
            self.index.insert(name.into(), self.fields.len());
            self.fields.push(descriptor.clone());
        }
    }

    #[inline]
    pub const fn key(&self) -> FieldKey {
        self.key
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a descriptor by the name this set is keyed by.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&index| &*self.fields[index])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|d| &**d)
    }
}

impl fmt::Debug for EffectiveFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|d| self.key.of(d)))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Resolver

/// Merges the local descriptors of `ty` and its ancestors.
///
/// Walking from `ty` up to the base type, every local descriptor whose name
/// (by `key`) is not in the result yet is appended, so a redeclared field
/// fully shadows the ancestor's descriptor.
///
/// # Examples
///
/// ```
/// use vc_contract::info::FieldDescriptor;
/// use vc_contract::registry::{self, FieldKey, TypeDecl};
///
/// let parent = registry::declare(TypeDecl::dynamic("doc::Parent"));
/// registry::register_field(parent, FieldDescriptor::new("x"));
/// registry::register_field(parent, FieldDescriptor::new("y"));
///
/// let child = registry::declare(TypeDecl::dynamic("doc::Child").extends(parent));
/// registry::register_field(child, FieldDescriptor::new("y").with_name("ay"));
///
/// let fields = registry::effective_descriptors(child, FieldKey::InternalName);
/// let exposed: Vec<&str> = fields.iter().map(|d| d.exposed_name()).collect();
/// assert_eq!(exposed, ["ay", "x"]);
/// ```
pub fn effective_descriptors(ty: RecordType, key: FieldKey) -> EffectiveFields {
    let registry = store::read();
    let mut result = EffectiveFields::new(key);

    for ancestor in ty.ancestors() {
        let local = registry.local(ancestor);
        match key {
            FieldKey::InternalName => local
                .by_internal_name()
                .for_each(|d| result.insert_absent(d)),
            FieldKey::ExposedName => local
                .by_exposed_name()
                .for_each(|d| result.insert_absent(d)),
        }
    }

    result
}

// -----------------------------------------------------------------------------
// Tests
