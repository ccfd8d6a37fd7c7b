//! Error types for the binding engine.
//!
//! Two families exist with very different audiences:
//!
//! - [`ScriptError`] is the only class surfaced to script authors. It is
//!   raised when an argument on the evaluation stack does not match the kind
//!   or type tag a native parameter declares, aborts the in-flight call
//!   before the native function runs, and is catchable by the script.
//! - [`RegistrationError`] covers faults in the binding layer itself:
//!   registering the same prototype or enum twice, or attaching a finalizer
//!   to a tag nothing was registered under. These occur only during
//!   single-threaded module initialization and indicate authoring defects,
//!   not runtime conditions.

use thiserror::Error;

use crate::tag::TypeTag;

/// Argument marshaling failure, surfaced to the running script.
///
/// Positions are always reported 1-based; callers that read by a negative
/// (top-relative) position have it normalized against the live stack depth
/// before the message is formatted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The stack value at `position` has the wrong kind for the declared
    /// parameter type (e.g. a string where a number is required).
    #[error("Parameter {position} must be of type \"{expected}\", but it is a \"{observed}\".")]
    KindMismatch {
        position: usize,
        expected: &'static str,
        observed: &'static str,
    },

    /// The stack value at `position` is a handle of a different type family
    /// than the declared pointer parameter, or not a handle at all.
    #[error("Parameter {position} must be of type \"{expected}\", but it was a \"{observed}\".")]
    TagMismatch {
        position: usize,
        expected: &'static str,
        observed: &'static str,
    },
}

impl ScriptError {
    /// The 1-based parameter index the failure was reported against.
    pub fn position(&self) -> usize {
        match self {
            ScriptError::KindMismatch { position, .. } => *position,
            ScriptError::TagMismatch { position, .. } => *position,
        }
    }
}

/// Initialization-time registration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A prototype already exists for this tag.
    #[error("a prototype is already registered for {tag:?}")]
    DuplicatePrototype { tag: TypeTag },

    /// No prototype exists for this tag.
    #[error("no prototype registered for {tag:?}")]
    UnregisteredPrototype { tag: TypeTag },

    /// The table already has an entry under the enum's name.
    #[error("table entry \"{name}\" already exists")]
    EnumNameCollision { name: String },

    /// The same enumerator name appeared twice in one enum.
    #[error("enumerator \"{name}\" appears twice in enum \"{enum_name}\"")]
    DuplicateEnumerator { enum_name: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mismatch_message_shape() {
        let err = ScriptError::KindMismatch {
            position: 2,
            expected: "f64",
            observed: "string",
        };
        assert_eq!(
            err.to_string(),
            "Parameter 2 must be of type \"f64\", but it is a \"string\"."
        );
    }

    #[test]
    fn tag_mismatch_message_shape() {
        let err = ScriptError::TagMismatch {
            position: 1,
            expected: "Surface",
            observed: "Pattern",
        };
        assert_eq!(
            err.to_string(),
            "Parameter 1 must be of type \"Surface\", but it was a \"Pattern\"."
        );
    }

    #[test]
    fn position_accessor() {
        let err = ScriptError::KindMismatch {
            position: 3,
            expected: "i32",
            observed: "boolean",
        };
        assert_eq!(err.position(), 3);
    }
}
