//! Namespace and method tables, and the registration surface.
//!
//! A [`Table`] maps names to entries: native function bindings and nested
//! enum constant tables. The same type serves as the root namespace exposed
//! to scripts and as the method table inside a prototype. Registration
//! selects the calling convention:
//!
//! - [`Table::register`] — single-return adapter
//! - [`Table::register_with_prototype`] — single-return, with a tag override
//!   selecting the prototype attached to a constructed return handle
//! - [`Table::register_multi_return`] — pure-output adapter
//! - [`Table::register_in_out`] — input-output adapter
//! - [`Table::register_enum`] — immutable name → integer constants
//!
//! Re-registering a function name silently replaces the previous binding;
//! enums collide deterministically instead.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::adapter::ScriptFunction;
use crate::error::RegistrationError;
use crate::multi_return::{InOutFunction, PureOutputFunction};
use crate::native_fn::NativeFn;
use crate::tag::TypeTag;

/// Immutable name → integer constant mapping.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    values: FxHashMap<String, i64>,
}

impl EnumTable {
    /// Look up a constant.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the enum has no constants.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// One named entry in a table.
#[derive(Debug)]
pub enum Entry {
    /// A runtime-callable native function binding.
    Function(NativeFn),
    /// A nested enum constant table.
    Enum(EnumTable),
}

impl Entry {
    /// The binding, if this entry is a function.
    pub fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Entry::Function(f) => Some(f),
            Entry::Enum(_) => None,
        }
    }

    /// The constants, if this entry is an enum.
    pub fn as_enum(&self) -> Option<&EnumTable> {
        match self {
            Entry::Enum(e) => Some(e),
            Entry::Function(_) => None,
        }
    }
}

/// A name → entry table: the root namespace, or a prototype's methods.
#[derive(Debug, Default)]
pub struct Table {
    entries: FxHashMap<String, Entry>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a single-return native function under `name`.
    pub fn register<F, M>(&mut self, name: &str, function: F)
    where
        F: ScriptFunction<M> + 'static,
    {
        self.install(name, function.into_native(None));
    }

    /// Bind a single-return native function whose constructed return handle
    /// attaches the prototype registered under `tag` instead of the return
    /// type's own prototype. Used to share one method table across several
    /// constructors of the same family.
    pub fn register_with_prototype<F, M>(&mut self, name: &str, function: F, tag: TypeTag)
    where
        F: ScriptFunction<M> + 'static,
    {
        self.install(name, function.into_native(Some(tag)));
    }

    /// Bind a native function with trailing pure-output pointer parameters.
    pub fn register_multi_return<F, M>(&mut self, name: &str, function: F)
    where
        F: PureOutputFunction<M> + 'static,
    {
        self.install(name, function.into_native(None));
    }

    /// Bind a native function with trailing input-output pointer parameters.
    pub fn register_in_out<F, M>(&mut self, name: &str, function: F)
    where
        F: InOutFunction<M> + 'static,
    {
        self.install(name, function.into_native(None));
    }

    /// Install an immutable enum constant table under `name`.
    ///
    /// Fails if `name` is already taken in this table, or if an enumerator
    /// name repeats within `values`. Prior entries are left untouched on
    /// failure.
    pub fn register_enum(
        &mut self,
        name: &str,
        values: &[(&str, i64)],
    ) -> Result<(), RegistrationError> {
        if self.entries.contains_key(name) {
            return Err(RegistrationError::EnumNameCollision {
                name: name.to_owned(),
            });
        }
        let mut constants = FxHashMap::default();
        for (key, value) in values {
            if constants.insert((*key).to_owned(), *value).is_some() {
                return Err(RegistrationError::DuplicateEnumerator {
                    enum_name: name.to_owned(),
                    name: (*key).to_owned(),
                });
            }
        }
        debug!(name, constants = constants.len(), "enum registered");
        self.entries
            .insert(name.to_owned(), Entry::Enum(EnumTable { values: constants }));
        Ok(())
    }

    fn install(&mut self, name: &str, function: NativeFn) {
        debug!(name, "native function registered");
        self.entries.insert(name.to_owned(), Entry::Function(function));
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Look up a function binding.
    pub fn function(&self, name: &str) -> Option<&NativeFn> {
        self.get(name).and_then(Entry::as_function)
    }

    /// Look up an enum table.
    pub fn enumeration(&self, name: &str) -> Option<&EnumTable> {
        self.get(name).and_then(Entry::as_enum)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entry names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_fn::{Prototype, PrototypeStore};
    use crate::stack::ScriptStack;
    use crate::value::Value;

    struct NoProtos;

    impl PrototypeStore for NoProtos {
        fn try_resolve(&self, _tag: TypeTag) -> Option<&Prototype> {
            None
        }
    }

    fn double(x: f64) -> f64 {
        x * 2.0
    }

    #[test]
    fn registered_function_is_callable() {
        let mut table = Table::new();
        table.register("double", double);

        let mut stack = ScriptStack::new();
        stack.push(Value::Float(21.0));
        let count = table
            .function("double")
            .unwrap()
            .call(&mut stack, &NoProtos)
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(stack.values(), &[Value::Float(42.0)]);
    }

    #[test]
    fn reregistering_replaces_silently() {
        let mut table = Table::new();
        table.register("f", || 1i64);
        table.register("f", || 2i64);

        let mut stack = ScriptStack::new();
        table.function("f").unwrap().call(&mut stack, &NoProtos).unwrap();
        assert_eq!(stack.values(), &[Value::Int(2)]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn enum_collision_is_deterministic() {
        let mut table = Table::new();
        table
            .register_enum("format", &[("ARGB32", 0), ("RGB24", 1)])
            .unwrap();
        let err = table.register_enum("format", &[("A8", 2)]).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::EnumNameCollision {
                name: "format".to_owned(),
            }
        );
        // The original enum is untouched.
        let format = table.enumeration("format").unwrap();
        assert_eq!(format.get("ARGB32"), Some(0));
        assert_eq!(format.get("RGB24"), Some(1));
        assert_eq!(format.get("A8"), None);
    }

    #[test]
    fn distinct_enums_coexist() {
        let mut table = Table::new();
        table.register_enum("linecap", &[("BUTT", 0), ("ROUND", 1)]).unwrap();
        table.register_enum("linejoin", &[("MITER", 0)]).unwrap();
        assert_eq!(table.enumeration("linecap").unwrap().len(), 2);
        assert_eq!(table.enumeration("linejoin").unwrap().get("MITER"), Some(0));
    }

    #[test]
    fn duplicate_enumerator_rejected() {
        let mut table = Table::new();
        let err = table
            .register_enum("extend", &[("NONE", 0), ("NONE", 1)])
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateEnumerator {
                enum_name: "extend".to_owned(),
                name: "NONE".to_owned(),
            }
        );
        assert!(table.enumeration("extend").is_none());
    }

    #[test]
    fn function_and_enum_lookups_are_disjoint() {
        let mut table = Table::new();
        table.register("f", || 0i64);
        table.register_enum("e", &[("A", 1)]).unwrap();
        assert!(table.function("e").is_none());
        assert!(table.enumeration("f").is_none());
        assert!(table.get("missing").is_none());
    }
}
