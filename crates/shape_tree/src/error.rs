//! Tree construction and lookup errors.
//!
//! Resolution is deterministic for a given schema, so none of these are
//! retried: every error aborts the build (or the lazy access that hit it)
//! and names the offending type, field, or class.

use std::fmt;

use thiserror::Error;

/// Error raised while building or querying a [`NodeTree`](crate::NodeTree).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No ancestor type-variable map and no root binding binds this variable.
    #[error("cannot resolve type variable `{variable}` used by `{site}`")]
    UnresolvableTypeVariable { variable: String, site: String },

    /// A type expression that is neither a class, a variable, nor a
    /// parameterized type (a wildcard or a generic array).
    #[error("unhandled type `{ty}` used by `{site}`")]
    UnhandledTypeShape { ty: String, site: String },

    /// A parameterized type with the wrong number of arguments.
    #[error("`{class}` declares {expected} type parameter(s) but was given {found}")]
    TypeArgumentCount {
        class: String,
        expected: usize,
        found: usize,
    },

    /// A type parameter name that the class does not declare.
    #[error("`{class}` declares no type parameter `{name}`")]
    UnknownTypeParameter { class: String, name: String },

    /// A child lookup that matched nothing.
    #[error("no child with {key}")]
    ChildNotFound { key: ChildKey },
}

impl TreeError {
    /// Returns `true` for lookup misses, `false` for construction failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::ChildNotFound { .. })
    }
}

/// What a failed child lookup was looking for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChildKey {
    /// Lookup by field name.
    FieldName(String),
    /// Lookup by declared generic type name (e.g. `T`).
    TypeParameter(String),
}

impl fmt::Display for ChildKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildKey::FieldName(name) => write!(f, "field name `{name}`"),
            ChildKey::TypeParameter(name) => write!(f, "type parameter `{name}`"),
        }
    }
}
