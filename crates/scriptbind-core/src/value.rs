//! Runtime value representation exchanged over the evaluation stack.
//!
//! [`Value`] is the dynamic type the scripting runtime trades in: numbers
//! (integer and float, both of observed kind "number"), booleans, strings
//! (shared, pushed by reference), and [`OpaqueHandle`]s wrapping native
//! pointers. Values are cheap to clone; strings and handles share their
//! backing storage.

use std::ffi::c_void;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::native_fn::{NativeFn, Prototype};
use crate::table::Table;
use crate::tag::TypeTag;

/// Type-erased native destructor attached to a prototype.
pub type Finalizer = Rc<dyn Fn(*mut c_void)>;

/// Runs a handle's finalizer when the last clone of the runtime value drops.
struct FinalizeGuard {
    data: *mut c_void,
    type_name: &'static str,
    run: Finalizer,
}

impl Drop for FinalizeGuard {
    fn drop(&mut self) {
        trace!(type_name = self.type_name, "running handle finalizer");
        (self.run)(self.data);
    }
}

/// A script-visible wrapper around a native pointer.
///
/// Carries the pointer, the [`TypeTag`] of its type family, and the method
/// table of the prototype attached when the handle was constructed. The
/// handle does not own the pointed-to resource: its lifetime is independent
/// unless the prototype carried a finalizer, in which case the destructor
/// runs exactly once when the last clone of this runtime value is dropped.
#[derive(Clone)]
pub struct OpaqueHandle {
    data: *mut c_void,
    tag: TypeTag,
    type_name: &'static str,
    methods: Option<Rc<Table>>,
    guard: Option<Rc<FinalizeGuard>>,
}

impl OpaqueHandle {
    /// Build a detached handle with no prototype attached.
    ///
    /// Used by embedding runtimes that construct handle values themselves;
    /// the codec layer builds handles through [`OpaqueHandle::with_prototype`]
    /// instead.
    pub fn new(data: *mut c_void, tag: TypeTag, type_name: &'static str) -> Self {
        OpaqueHandle {
            data,
            tag,
            type_name,
            methods: None,
            guard: None,
        }
    }

    /// Build a handle carrying a prototype's method table, and — if the
    /// prototype has a finalizer — a guard that runs it once this runtime
    /// value is fully dropped.
    pub fn with_prototype(
        data: *mut c_void,
        tag: TypeTag,
        type_name: &'static str,
        prototype: &Prototype,
    ) -> Self {
        let guard = prototype.finalizer().map(|run| {
            Rc::new(FinalizeGuard {
                data,
                type_name,
                run: run.clone(),
            })
        });
        OpaqueHandle {
            data,
            tag,
            type_name,
            methods: Some(prototype.shared_methods()),
            guard,
        }
    }

    /// The wrapped pointer, verbatim. Never dereferenced by the engine.
    pub fn data(&self) -> *mut c_void {
        self.data
    }

    /// The tag of the pointer's type family.
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    /// The family name, as cited in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up a method on the attached prototype.
    pub fn method(&self, name: &str) -> Option<&NativeFn> {
        self.methods.as_deref().and_then(|table| table.function(name))
    }

    /// The attached method table, if a prototype was attached.
    pub fn methods(&self) -> Option<&Table> {
        self.methods.as_deref()
    }

    /// Whether a finalizer will run when this runtime value is destroyed.
    pub fn has_finalizer(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueHandle")
            .field("type_name", &self.type_name)
            .field("tag", &self.tag)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.tag == other.tag
    }
}

/// A dynamic value held on the evaluation stack.
#[derive(Debug, Clone)]
pub enum Value {
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Shared string; clones are by reference.
    String(Rc<str>),
    /// Opaque handle around a native pointer.
    Handle(OpaqueHandle),
}

impl Value {
    /// Observed kind name, as cited in mismatch errors.
    ///
    /// `Int` and `Float` are both "number"; the distinction is a storage
    /// detail, not a script-visible kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) | Value::Float(_) => "number",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Handle(_) => "handle",
        }
    }

    /// Whether this value is of kind "number".
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of this value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a == b,
            _ => false,
        }
    }
}
