//! Core marshaling machinery for binding native functions into an embedded,
//! stack-based scripting runtime.
//!
//! The pieces, leaves first:
//!
//! - [`value::Value`] / [`stack::ScriptStack`] — the dynamic values and the
//!   evaluation stack the runtime exchanges with native code. The stack is
//!   threaded explicitly through every call: adapters receive the arguments
//!   on it and return with exactly their documented results on it.
//! - [`tag::TypeTag`] / [`tag::Opaque`] — deterministic identity for native
//!   pointer families, backing opaque handle validation.
//! - [`convert`] — the per-type codecs ([`convert::FromStack`],
//!   [`convert::IntoStack`], [`convert::ScriptReturn`]).
//! - [`adapter`] / [`multi_return`] — generic call adapters turning native
//!   callables into uniform entry points: single-return, pure-output, and
//!   input-output conventions.
//! - [`table::Table`] — namespace and prototype method tables, carrying the
//!   registration surface.
//! - [`native_fn`] — the erased [`native_fn::NativeFn`] binding plus the
//!   [`native_fn::PrototypeStore`] interface through which handles find
//!   their prototypes.
//!
//! Execution is single-threaded and synchronous; the only call-time error
//! surfaced to scripts is the positional argument mismatch raised by the
//! codecs before the native function runs.

pub mod adapter;
pub mod convert;
pub mod error;
pub mod multi_return;
pub mod native_fn;
pub mod stack;
pub mod table;
pub mod tag;
pub mod value;

pub use adapter::ScriptFunction;
pub use convert::{FromStack, IntoStack, ScriptReturn};
pub use error::{RegistrationError, ScriptError};
pub use multi_return::{InOutFunction, PureOutputFunction};
pub use native_fn::{NativeFn, Prototype, PrototypeStore};
pub use stack::ScriptStack;
pub use table::{Entry, EnumTable, Table};
pub use tag::{Opaque, TypeTag};
pub use value::{Finalizer, OpaqueHandle, Value};
