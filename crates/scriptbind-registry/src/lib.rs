//! Prototype registry and embedding session.
//!
//! This crate carries the bookkeeping half of the binding engine: the
//! [`PrototypeRegistry`] mapping type tags to method tables and finalizers,
//! and the [`Session`] owning one registry plus the root namespace a script
//! sees. The marshaling machinery itself lives in `scriptbind-core`.

pub mod registry;
pub mod session;

pub use registry::PrototypeRegistry;
pub use session::{Session, retained};
