//! Prototype storage keyed by type tag.
//!
//! The registry is populated during single-threaded module initialization —
//! prototype creation followed by the optional finalizer-attach step — and
//! is read-only for the remainder of the process. It implements
//! [`PrototypeStore`], the interface the codec layer resolves prototypes
//! through when constructing handles.

use std::ffi::c_void;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::debug;

use scriptbind_core::{Opaque, Prototype, PrototypeStore, RegistrationError, Table, TypeTag};

/// Maps each registered type tag to its prototype.
#[derive(Debug, Default)]
pub struct PrototypeRegistry {
    prototypes: FxHashMap<TypeTag, Prototype>,
}

impl PrototypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and store the prototype for `tag`.
    ///
    /// `populate` receives the empty method table and fills it with
    /// registrar calls. Fails with `DuplicatePrototype` if `tag` already has
    /// one; the existing prototype is left untouched.
    pub fn create_prototype(
        &mut self,
        tag: TypeTag,
        populate: impl FnOnce(&mut Table),
    ) -> Result<(), RegistrationError> {
        if self.prototypes.contains_key(&tag) {
            return Err(RegistrationError::DuplicatePrototype { tag });
        }
        let mut methods = Table::new();
        populate(&mut methods);
        debug!(?tag, methods = methods.len(), "prototype created");
        self.prototypes.insert(tag, Prototype::new(methods));
        Ok(())
    }

    /// Attach the native destructor for handles of `tag`.
    ///
    /// Must follow `create_prototype`; fails with `UnregisteredPrototype`
    /// otherwise. The destructor runs exactly once per handle value, when
    /// the runtime destroys it.
    pub fn attach_finalizer(
        &mut self,
        tag: TypeTag,
        destructor: impl Fn(*mut c_void) + 'static,
    ) -> Result<(), RegistrationError> {
        match self.prototypes.get_mut(&tag) {
            Some(prototype) => {
                debug!(?tag, "finalizer attached");
                prototype.set_finalizer(Rc::new(destructor));
                Ok(())
            }
            None => Err(RegistrationError::UnregisteredPrototype { tag }),
        }
    }

    /// Attach a typed destructor for the family of `T`.
    pub fn attach_finalizer_for<T: Opaque>(
        &mut self,
        destructor: fn(*mut T),
    ) -> Result<(), RegistrationError> {
        self.attach_finalizer(T::type_tag(), move |data| destructor(data.cast()))
    }

    /// Whether a prototype is registered for `tag`.
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.prototypes.contains_key(&tag)
    }

    /// Number of registered prototypes.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

impl PrototypeStore for PrototypeRegistry {
    fn try_resolve(&self, tag: TypeTag) -> Option<&Prototype> {
        self.prototypes.get(&tag)
    }
}
