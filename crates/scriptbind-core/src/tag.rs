//! Deterministic type identity for opaque pointer families.
//!
//! A [`TypeTag`] is a 64-bit hash computed from a pointer family's stable
//! name. The same name always produces the same tag, in any process, in any
//! registration order — there is no reliance on address identity across
//! compilation units. Tags are assigned when a type opts in via the
//! [`Opaque`] trait and are immutable for the life of the process.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

/// Domain constant mixed into every tag hash so tag values stay disjoint
/// from other xxh64 uses in the same process.
const TAG_DOMAIN: u64 = 0x62d1_7c55_9ae0_43f1;

/// Stable identifier distinguishing one native pointer-type family.
///
/// At most one prototype may be registered per tag; handles carry their tag
/// and are validated against the declared parameter's tag at the read
/// boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeTag(u64);

impl TypeTag {
    /// Compute the tag for a type family name.
    ///
    /// Deterministic: the same name always yields the same tag.
    pub fn from_name(name: &str) -> Self {
        TypeTag(xxh64(name.as_bytes(), TAG_DOMAIN))
    }

    /// The raw hash value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:#018x})", self.0)
    }
}

/// A native type whose pointers cross the boundary as opaque handles.
///
/// Implementing `Opaque` for a pointee type `T` makes `*mut T` and
/// `*const T` marshalable: reads validate an incoming handle's tag against
/// `T`'s, writes wrap an outgoing pointer into a new handle carrying it.
/// Both mutability flavors share the one tag, so pointer-to-const and
/// pointer-to-mutable are interchangeable at the read boundary.
///
/// The engine never dereferences the pointer; only the bound native
/// functions do.
pub trait Opaque: 'static {
    /// Stable family name; also the tag string cited in mismatch errors.
    const TYPE_NAME: &'static str;

    /// The family's tag.
    fn type_tag() -> TypeTag {
        TypeTag::from_name(Self::TYPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeTag::from_name("Surface"), TypeTag::from_name("Surface"));
    }

    #[test]
    fn distinct_names_distinct_tags() {
        assert_ne!(TypeTag::from_name("Surface"), TypeTag::from_name("Pattern"));
    }

    #[test]
    fn opaque_tag_matches_name_hash() {
        struct Matrix;
        impl Opaque for Matrix {
            const TYPE_NAME: &'static str = "Matrix";
        }
        assert_eq!(Matrix::type_tag(), TypeTag::from_name("Matrix"));
    }

    #[test]
    fn debug_prints_hex() {
        let repr = format!("{:?}", TypeTag::from_name("Region"));
        assert!(repr.starts_with("TypeTag(0x"));
    }
}
