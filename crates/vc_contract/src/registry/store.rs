use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use super::{RecordType, RecordTypeInfo, TypeDecl};
use crate::info::FieldDescriptor;

/// A fixed hash seed, lookups must not depend on process randomness.
pub(super) const FIXED_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

/// Name to position in the declaration order of a type.
pub(super) type NameMap = HashMap<String, usize, FixedState>;

// -----------------------------------------------------------------------------
// LocalFields

/// The descriptors declared on one type, without its ancestors.
pub(super) struct LocalFields {
    order: Vec<Arc<FieldDescriptor>>,
    by_internal: NameMap,
    by_exposed: NameMap,
}

impl LocalFields {
    const fn new() -> Self {
        Self {
            order: Vec::new(),
            by_internal: HashMap::with_hasher(FIXED_STATE),
            by_exposed: HashMap::with_hasher(FIXED_STATE),
        }
    }

    /// Inserts or replaces a descriptor, returning the replaced one.
    ///
    /// A replacement keeps the declaration position. If its exposed name
    /// changed, the old alias is dropped unless another field took it over.
    fn insert(&mut self, descriptor: Arc<FieldDescriptor>) -> Option<Arc<FieldDescriptor>> {
        match self.by_internal.get(descriptor.internal_name()).copied() {
            Some(index) => {
                let old = core::mem::replace(&mut self.order[index], descriptor);
                let new = &self.order[index];
                if old.exposed_name() != new.exposed_name()
                    && self.by_exposed.get(old.exposed_name()) == Some(&index)
                {
                    self.by_exposed.remove(old.exposed_name());
                }
                self.by_exposed.insert(new.exposed_name().into(), index);
                Some(old)
            }
            None => {
                let index = self.order.len();
                self.by_internal
                    .insert(descriptor.internal_name().into(), index);
                self.by_exposed
                    .insert(descriptor.exposed_name().into(), index);
                self.order.push(descriptor);
                None
            }
        }
    }

    /// Descriptors in declaration order.
    pub(super) fn by_internal_name(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.order.iter()
    }

    /// Descriptors that own their exposed name, in declaration order.
    pub(super) fn by_exposed_name(&self) -> impl Iterator<Item = &Arc<FieldDescriptor>> {
        self.order
            .iter()
            .enumerate()
            .filter(|(index, d)| self.by_exposed.get(d.exposed_name()) == Some(index))
            .map(|(_, d)| d)
    }
}

// -----------------------------------------------------------------------------
// Registry

/// The type table and the local descriptors of every declared type,
/// both indexed by [`RecordType::index`].
pub(super) struct Registry {
    types: Vec<RecordType>,
    fields: Vec<LocalFields>,
}

impl Registry {
    const fn new() -> Self {
        Self {
            types: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub(super) fn local(&self, ty: RecordType) -> &LocalFields {
        &self.fields[ty.index()]
    }

    pub(super) fn types(&self) -> &[RecordType] {
        &self.types
    }
}

static REGISTRY: RwLock<Registry> = RwLock::new(Registry::new());

/// Takes a read lock, poisoning is ignored.
///
/// Nothing outside this crate runs while the lock is held.
#[inline]
pub(super) fn read() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

// -----------------------------------------------------------------------------
// Operations

/// Adds a type to the type table.
///
/// Every call creates a new type, even for a name that is already taken.
pub fn declare(decl: TypeDecl) -> RecordType {
    let ty = {
        let mut registry = write();
        let index = registry.types.len();
        let info: &'static RecordTypeInfo = Box::leak(Box::new(RecordTypeInfo::new(index, decl)));
        let ty = RecordType::from_info(info);
        registry.types.push(ty);
        registry.fields.push(LocalFields::new());
        ty
    };

    match ty.parent() {
        Some(parent) => log::debug!("declared record type `{ty}` extending `{parent}`"),
        None => log::debug!("declared record type `{ty}`"),
    }
    ty
}

/// Stores `descriptor` among the local fields of `ty`.
///
/// Registering an internal name again replaces the earlier descriptor in place.
///
/// # Examples
///
/// ```
/// use vc_contract::info::FieldDescriptor;
/// use vc_contract::registry::{self, TypeDecl};
///
/// let ty = registry::declare(TypeDecl::dynamic("doc::Point"));
/// registry::register_field(ty, FieldDescriptor::new("x"));
/// registry::register_field(ty, FieldDescriptor::new("y"));
/// registry::register_field(ty, FieldDescriptor::new("x").with_name("ax"));
///
/// let names: Vec<String> = registry::lookup_by_exposed_name(ty)
///     .iter()
///     .map(|d| d.exposed_name().to_owned())
///     .collect();
/// assert_eq!(names, ["ax", "y"]);
/// ```
pub fn register_field(ty: RecordType, descriptor: FieldDescriptor) {
    let replaced = write().fields[ty.index()].insert(Arc::new(descriptor));

    if let Some(old) = replaced {
        log::warn!(
            "record type `{ty}` replaced the descriptor of field `{}` (exposed as `{}`)",
            old.internal_name(),
            old.exposed_name(),
        );
    }
}

/// The local descriptors of `ty` keyed by internal name, in declaration order.
///
/// Ancestors are not included, see [`effective_descriptors`](super::effective_descriptors).
pub fn lookup_by_internal_name(ty: RecordType) -> Vec<Arc<FieldDescriptor>> {
    read().local(ty).by_internal_name().cloned().collect()
}

/// The local descriptors of `ty` keyed by exposed name, in declaration order.
///
/// When two local fields share an exposed name, only the later registration is listed.
pub fn lookup_by_exposed_name(ty: RecordType) -> Vec<Arc<FieldDescriptor>> {
    read().local(ty).by_exposed_name().cloned().collect()
}

/// Finds the most recently declared type named `name`.
pub fn find_type(name: &str) -> Option<RecordType> {
    read().types().iter().rev().find(|ty| ty.name() == name).copied()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::{declare, find_type, lookup_by_exposed_name, lookup_by_internal_name};
    use super::register_field;
    use crate::info::{Direction, FieldDescriptor};
    use crate::registry::TypeDecl;

    fn names(list: &[Arc<FieldDescriptor>]) -> Vec<(&str, &str)> {
        list.iter()
            .map(|d| (d.internal_name(), d.exposed_name()))
            .collect()
    }

    #[test]
    fn replace_in_place() {
        let ty = declare(TypeDecl::dynamic("store::replace_in_place"));
        register_field(ty, FieldDescriptor::new("a"));
        register_field(ty, FieldDescriptor::new("b").with_name("bb"));
        register_field(
            ty,
            FieldDescriptor::new("a")
                .with_name("aa")
                .with_direction(Direction::SERIALIZE_ONLY),
        );

        let internal = lookup_by_internal_name(ty);
        assert_eq!(names(&internal), [("a", "aa"), ("b", "bb")]);
        assert_eq!(internal[0].direction(), Direction::SERIALIZE_ONLY);

        let exposed = lookup_by_exposed_name(ty);
        assert_eq!(names(&exposed), [("a", "aa"), ("b", "bb")]);
    }

    #[test]
    fn exposed_name_taken_over() {
        let ty = declare(TypeDecl::dynamic("store::exposed_name_taken_over"));
        register_field(ty, FieldDescriptor::new("a").with_name("k"));
        register_field(ty, FieldDescriptor::new("b").with_name("k"));

        assert_eq!(names(&lookup_by_internal_name(ty)), [("a", "k"), ("b", "k")]);
        assert_eq!(names(&lookup_by_exposed_name(ty)), [("b", "k")]);

        // `a` moves away from `k`, which still belongs to `b`.
        register_field(ty, FieldDescriptor::new("a").with_name("j"));
        assert_eq!(names(&lookup_by_exposed_name(ty)), [("a", "j"), ("b", "k")]);
    }

    #[test]
    fn local_only() {
        let parent = declare(TypeDecl::dynamic("store::local_only::Parent"));
        let child = declare(TypeDecl::dynamic("store::local_only::Child").extends(parent));
        register_field(parent, FieldDescriptor::new("p"));
        register_field(child, FieldDescriptor::new("c"));

        assert_eq!(names(&lookup_by_internal_name(child)), [("c", "c")]);
        assert_eq!(find_type("store::local_only::Child"), Some(child));
        assert_eq!(find_type("store::local_only::Missing"), None);
    }
}
