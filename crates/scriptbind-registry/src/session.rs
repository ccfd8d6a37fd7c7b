//! An embedding session: one registry plus one root namespace.
//!
//! Each session owns its own [`PrototypeRegistry`] and globals [`Table`], so
//! several independent script engines can coexist in a process without
//! shared state.

use scriptbind_core::{NativeFn, ScriptError, ScriptStack, Table};

use crate::registry::PrototypeRegistry;

/// Owns the prototype registry and the root namespace table exposed to
/// scripts.
#[derive(Debug, Default)]
pub struct Session {
    registry: PrototypeRegistry,
    globals: Table,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The prototype registry.
    pub fn registry(&self) -> &PrototypeRegistry {
        &self.registry
    }

    /// Mutable registry access, for initialization.
    pub fn registry_mut(&mut self) -> &mut PrototypeRegistry {
        &mut self.registry
    }

    /// The root namespace table.
    pub fn globals(&self) -> &Table {
        &self.globals
    }

    /// Mutable globals access, for initialization.
    pub fn globals_mut(&mut self) -> &mut Table {
        &mut self.globals
    }

    /// Look up a global function binding.
    pub fn function(&self, name: &str) -> Option<&NativeFn> {
        self.globals.function(name)
    }

    /// Call a global binding with the arguments on `stack`; on return the
    /// stack holds exactly the results.
    ///
    /// # Panics
    ///
    /// Panics if no function is registered under `name` — looking up a
    /// binding that was never installed is an authoring bug, not a runtime
    /// condition.
    pub fn call(&self, name: &str, stack: &mut ScriptStack) -> Result<usize, ScriptError> {
        let function = self
            .globals
            .function(name)
            .unwrap_or_else(|| panic!("no global function registered under \"{name}\""));
        function.call(stack, &self.registry)
    }
}

/// Wrap a unary getter so its result passes through a reference-acquiring
/// hook before being returned.
///
/// Getters that hand out a borrowed pointer need their own reference when
/// the constructed handle carries a finalizer; the hook acquires it.
pub fn retained<A, T>(
    getter: fn(A) -> *mut T,
    add_ref: fn(*mut T) -> *mut T,
) -> impl Fn(A) -> *mut T {
    move |arg| add_ref(getter(arg))
}
