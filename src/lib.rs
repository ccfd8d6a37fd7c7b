//! scriptbind — a generic binding engine for embedded scripting runtimes.
//!
//! Exposes native, C-callable functions to a stack-based dynamic scripting
//! runtime without hand-written per-function glue: type-directed stack
//! codecs, fixed-arity call adapters for single-return and output-pointer
//! conventions, opaque handles with runtime type tags, and a
//! prototype/finalizer registry.
//!
//! # Example
//!
//! ```
//! use scriptbind::{Opaque, ScriptStack, Session, Value};
//!
//! struct Canvas {
//!     width: i32,
//! }
//!
//! impl Opaque for Canvas {
//!     const TYPE_NAME: &'static str = "Canvas";
//! }
//!
//! fn create(width: i32) -> *mut Canvas {
//!     Box::into_raw(Box::new(Canvas { width }))
//! }
//!
//! fn width(canvas: *mut Canvas) -> i32 {
//!     unsafe { (*canvas).width }
//! }
//!
//! fn destroy(canvas: *mut Canvas) {
//!     unsafe { drop(Box::from_raw(canvas)) }
//! }
//!
//! let mut session = Session::new();
//! session
//!     .registry_mut()
//!     .create_prototype(Canvas::type_tag(), |methods| {
//!         methods.register("width", width);
//!     })
//!     .unwrap();
//! session.registry_mut().attach_finalizer_for(destroy).unwrap();
//! session.globals_mut().register("canvas", create);
//!
//! let mut stack = ScriptStack::new();
//! stack.push(Value::Int(640));
//! let results = session.call("canvas", &mut stack).unwrap();
//! assert_eq!(results, 1);
//!
//! let Some(Value::Handle(handle)) = stack.get(1) else {
//!     panic!("expected a handle");
//! };
//! assert_eq!(handle.type_tag(), Canvas::type_tag());
//! assert!(handle.method("width").is_some());
//! ```

pub use scriptbind_core::{
    Entry, EnumTable, Finalizer, FromStack, InOutFunction, IntoStack, NativeFn, Opaque,
    OpaqueHandle, Prototype, PrototypeStore, PureOutputFunction, RegistrationError, ScriptError,
    ScriptFunction, ScriptReturn, ScriptStack, Table, TypeTag, Value,
};
pub use scriptbind_registry::{PrototypeRegistry, Session, retained};
