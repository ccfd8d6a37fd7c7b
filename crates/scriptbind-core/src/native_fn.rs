//! Type-erased native function bindings and prototypes.
//!
//! A [`NativeFn`] wraps an adapter closure produced at registration time:
//! the bound callable plus its optional return-tag override, erased behind a
//! uniform calling signature so bindings of any shape can be stored in one
//! table. Calling one reads arguments from the stack, invokes the native
//! function, and leaves the stack holding exactly the returned result count.
//!
//! A [`Prototype`] is the method table and optional finalizer registered for
//! one type tag; handles constructed for that tag carry its method table.
//! Prototypes are resolved through the [`PrototypeStore`] interface so the
//! codec layer does not depend on any particular registry implementation.

use std::fmt;
use std::rc::Rc;

use crate::error::ScriptError;
use crate::stack::ScriptStack;
use crate::table::Table;
use crate::tag::TypeTag;
use crate::value::Finalizer;

/// Resolves prototypes by tag when handles are constructed.
///
/// This is the engine's view of the runtime's prototype store. Resolution of
/// an unregistered tag is an authoring bug in the binding layer, not a
/// recoverable runtime condition — [`PrototypeStore::resolve`] panics on it.
pub trait PrototypeStore {
    /// Look up the prototype for `tag`, if one was registered.
    fn try_resolve(&self, tag: TypeTag) -> Option<&Prototype>;

    /// Look up the prototype for `tag`.
    ///
    /// # Panics
    ///
    /// Panics if no prototype was registered for `tag`.
    fn resolve(&self, tag: TypeTag) -> &Prototype {
        self.try_resolve(tag)
            .unwrap_or_else(|| panic!("no prototype registered for {tag:?}"))
    }
}

/// Method table and optional finalizer registered for one type tag.
pub struct Prototype {
    methods: Rc<Table>,
    finalizer: Option<Finalizer>,
}

impl Prototype {
    /// Wrap a populated method table. The finalizer starts unset and is
    /// attached in a separate step after creation.
    pub fn new(methods: Table) -> Self {
        Prototype {
            methods: Rc::new(methods),
            finalizer: None,
        }
    }

    /// The method table.
    pub fn methods(&self) -> &Table {
        &self.methods
    }

    /// Shared reference to the method table, for attaching to handles.
    pub fn shared_methods(&self) -> Rc<Table> {
        Rc::clone(&self.methods)
    }

    /// The attached finalizer, if any.
    pub fn finalizer(&self) -> Option<&Finalizer> {
        self.finalizer.as_ref()
    }

    /// Attach the native destructor run when a handle value built from this
    /// prototype is destroyed.
    pub fn set_finalizer(&mut self, finalizer: Finalizer) {
        self.finalizer = Some(finalizer);
    }

    /// Whether a finalizer is attached.
    pub fn has_finalizer(&self) -> bool {
        self.finalizer.is_some()
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("methods", &self.methods.len())
            .field("has_finalizer", &self.has_finalizer())
            .finish()
    }
}

/// A registered, runtime-callable native function binding.
///
/// On success the call returns the number of results left on the stack; on
/// failure the in-flight call is aborted and the error surfaces to the
/// script. Cloning shares the underlying adapter.
#[derive(Clone)]
pub struct NativeFn {
    inner: Rc<dyn Fn(&mut ScriptStack, &dyn PrototypeStore) -> Result<usize, ScriptError>>,
}

impl NativeFn {
    /// Wrap an adapter closure.
    pub fn new<F>(adapter: F) -> Self
    where
        F: Fn(&mut ScriptStack, &dyn PrototypeStore) -> Result<usize, ScriptError> + 'static,
    {
        NativeFn {
            inner: Rc::new(adapter),
        }
    }

    /// Invoke with the arguments currently on `stack`; on return the stack
    /// holds exactly the results, bottom-to-top in declared order.
    pub fn call(
        &self,
        stack: &mut ScriptStack,
        protos: &dyn PrototypeStore,
    ) -> Result<usize, ScriptError> {
        (self.inner)(stack, protos)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}
