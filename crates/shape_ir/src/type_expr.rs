//! Type expressions as written on field declarations.
//!
//! A `TypeExpr` preserves the generic structure of a declared type before any
//! type variable is substituted:
//! - `T value;` → `Var(T)`
//! - `String name;` → `Class(String)`
//! - `Map<K, List<V>> index;` → `Parameterized { raw: Map, args: [Var(K), Parameterized { raw: List, args: [Var(V)] }] }`
//!
//! Wildcards are representable so that a provider can report them
//! faithfully, but the resolver rejects them. Arrays are accepted as long as
//! their component type mentions no type variable.

use crate::{ClassId, Name};

/// A declared type, possibly mentioning type variables.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    /// A plain class, used without type arguments.
    Class(ClassId),

    /// A type variable declared on an enclosing class.
    Var(Name),

    /// A generic class applied to type arguments.
    Parameterized {
        /// The generic class.
        raw: ClassId,
        /// Type arguments in declaration order.
        args: Vec<TypeExpr>,
    },

    /// A wildcard: `?` or `? extends T`.
    Wildcard {
        /// The bound, if any.
        bound: Option<Box<TypeExpr>>,
    },

    /// An array of some component type: `T[]`.
    Array(Box<TypeExpr>),
}

/// Classification of a [`TypeExpr`] as seen by the resolver.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TypeShape<'a> {
    /// A concrete class.
    Concrete(ClassId),
    /// A reference to a type variable by name.
    Variable(Name),
    /// A generic class with its type arguments.
    Parameterized(ClassId, &'a [TypeExpr]),
    /// An array, with its component type.
    Array(&'a TypeExpr),
    /// Any other shape (wildcards).
    Other,
}

impl TypeExpr {
    /// Create a parameterized type.
    #[inline]
    pub fn parameterized(raw: ClassId, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Parameterized { raw, args }
    }

    /// Create an unbounded wildcard.
    #[inline]
    pub fn wildcard() -> Self {
        TypeExpr::Wildcard { bound: None }
    }

    /// Create an array type.
    #[inline]
    pub fn array(component: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(component))
    }

    /// Classify this expression.
    pub fn shape(&self) -> TypeShape<'_> {
        match self {
            TypeExpr::Class(id) => TypeShape::Concrete(*id),
            TypeExpr::Var(name) => TypeShape::Variable(*name),
            TypeExpr::Parameterized { raw, args } => TypeShape::Parameterized(*raw, args),
            TypeExpr::Array(component) => TypeShape::Array(component),
            TypeExpr::Wildcard { .. } => TypeShape::Other,
        }
    }

    /// The class this expression erases to, if it has one.
    ///
    /// Variables and wildcards have no erasure without further context.
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            TypeExpr::Class(id) | TypeExpr::Parameterized { raw: id, .. } => Some(*id),
            TypeExpr::Var(_) | TypeExpr::Wildcard { .. } | TypeExpr::Array(_) => None,
        }
    }

    /// Returns `true` if any type variable occurs in this expression.
    pub fn mentions_variables(&self) -> bool {
        match self {
            TypeExpr::Class(_) => false,
            TypeExpr::Var(_) => true,
            TypeExpr::Parameterized { args, .. } => args.iter().any(TypeExpr::mentions_variables),
            TypeExpr::Wildcard { bound } => bound.as_deref().is_some_and(TypeExpr::mentions_variables),
            TypeExpr::Array(component) => component.mentions_variables(),
        }
    }
}
