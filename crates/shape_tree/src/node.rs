//! Tree nodes.
//!
//! Nodes live in the [`NodeTree`](crate::NodeTree) arena and refer to each
//! other by [`NodeId`]. The parent link is an index, never an owning pointer.

use std::fmt;
use std::hash::{Hash, Hasher};

use shape_ir::{ClassId, FieldId, TypeExpr};

use crate::{ResolvedType, TypeRef, TypeVarMap};

/// Index of a node in its tree's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId` from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Structural identity of a node: the field it stands for and the class it
/// resolved to. The visited set of a build is keyed by this.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    /// The field, `None` for the root.
    pub field: Option<FieldId>,
    /// The resolved actual class.
    pub actual_type: ClassId,
}

/// One-time child materialization state.
#[derive(Clone, Debug, Default)]
pub(crate) enum Children {
    #[default]
    Unbuilt,
    Built(Vec<NodeId>),
}

/// One resolved position of the class tree.
///
/// Immutable once created, except for the one-time materialization of its
/// children. Two nodes are equal iff their [`NodeKey`]s are equal.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) field: Option<FieldId>,
    pub(crate) actual_type: ClassId,
    pub(crate) declaring_class: Option<ClassId>,
    pub(crate) generic_type: TypeExpr,
    pub(crate) type_map: TypeVarMap,
    pub(crate) nested_type_refs: Vec<TypeRef>,
    pub(crate) resolved_type: ResolvedType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Children,
}

impl Node {
    /// The field this node stands for; `None` for the root.
    #[inline]
    pub fn field(&self) -> Option<FieldId> {
        self.field
    }

    /// The concrete class this position holds.
    ///
    /// Differs from the field's declared class when the declared type is a
    /// type variable. For an array this is the element class; the dimensions
    /// live on [`resolved_type`](Self::resolved_type).
    #[inline]
    pub fn actual_type(&self) -> ClassId {
        self.actual_type
    }

    /// The class whose type parameter was substituted to produce
    /// [`actual_type`](Self::actual_type); `None` unless the field's declared
    /// type was a type variable.
    #[inline]
    pub fn declaring_class_for_generics(&self) -> Option<ClassId> {
        self.declaring_class
    }

    /// The generic type this position was built from (may mention variables
    /// of the parent's scope).
    #[inline]
    pub fn generic_type(&self) -> &TypeExpr {
        &self.generic_type
    }

    /// Bindings for the type parameters of [`actual_type`](Self::actual_type).
    #[inline]
    pub fn type_var_map(&self) -> &TypeVarMap {
        &self.type_map
    }

    /// Parameterized types recorded while building the type-variable map.
    #[inline]
    pub fn nested_type_refs(&self) -> &[TypeRef] {
        &self.nested_type_refs
    }

    /// The fully concrete type of this position, type arguments included.
    #[inline]
    pub fn resolved_type(&self) -> &ResolvedType {
        &self.resolved_type
    }

    /// The enclosing node; `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns `true` once the children have been materialized.
    #[inline]
    pub fn is_built(&self) -> bool {
        matches!(self.children, Children::Built(_))
    }

    /// The node's structural identity.
    #[inline]
    pub fn key(&self) -> NodeKey {
        NodeKey {
            field: self.field,
            actual_type: self.actual_type,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
