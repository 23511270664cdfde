//! Errors raised while building a class schema.

use thiserror::Error;

/// An invalid class, field, or type expression in a schema.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A class with this qualified name is already registered.
    #[error("class `{name}` is already registered")]
    DuplicateClass { name: String },

    /// A field with this name is already declared on the class.
    #[error("field `{field}` is already declared on `{class}`")]
    DuplicateField { class: String, field: String },

    /// A type expression names a class that is not registered.
    #[error("unknown class `{name}`")]
    UnknownClass { name: String },

    /// A simple class name matches more than one registered class.
    #[error("class name `{name}` is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousClass {
        name: String,
        candidates: Vec<String>,
    },

    /// A type expression could not be parsed.
    #[error("invalid type `{input}` at offset {position}: {message}")]
    Syntax {
        input: String,
        position: usize,
        message: String,
    },

    /// A generic class was given the wrong number of type arguments.
    #[error("`{class}` declares {expected} type parameter(s) but was given {found}")]
    TypeArgumentCount {
        class: String,
        expected: usize,
        found: usize,
    },
}
