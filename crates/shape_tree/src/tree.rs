//! The node arena and child materialization.
//!
//! # Child Enumeration
//!
//! For every field declared directly on a node's actual class:
//!
//! 1. A field typed by a type variable resolves through the node's
//!    type-variable map, then the ancestor chain, then the root bindings.
//! 2. A parameterized binding found that way is propagated with its
//!    arguments substituted, so the child's own map is exact.
//! 3. Any other declared type is already concrete up to its own arguments,
//!    which are resolved (and validated) in the node's scope.
//! 4. A child whose `(field, actual type)` was already visited during this
//!    build is pruned.
//!
//! Classes without a namespace or in a platform namespace are leaves, and so
//! are arrays. A failed materialization leaves the node unbuilt and rolls
//! back every child it had already allocated, so a later access retries from
//! a clean state.

use std::fmt::{self, Write};

use rustc_hash::FxHashSet;
use shape_ir::{ClassId, FieldId, Name, TypeExpr, TypeMetadataProvider, TypeShape};

use crate::node::Children;
use crate::resolve::Found;
use crate::type_map::build_type_var_map;
use crate::{
    Binding, Expansion, Node, NodeId, NodeKey, ResolvedType, RootBindings, TreeConfig, TreeError,
};

/// A resolved class tree.
///
/// Owns every [`Node`] of one build, the visited set used for cycle pruning,
/// and the root bindings. A fully built tree is read-only.
pub struct NodeTree<'p, P: ?Sized> {
    pub(crate) provider: &'p P,
    pub(crate) config: TreeConfig,
    pub(crate) root_bindings: RootBindings,
    pub(crate) nodes: Vec<Node>,
    pub(crate) visited: FxHashSet<NodeKey>,
    pub(crate) root: NodeId,
    pub(crate) root_class: ClassId,
}

impl<'p, P: TypeMetadataProvider + ?Sized> NodeTree<'p, P> {
    /// The root node (the whole class).
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The metadata provider this tree was built from.
    pub fn provider(&self) -> &'p P {
        self.provider
    }

    /// The configuration this tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The root binding table.
    pub fn root_bindings(&self) -> &RootBindings {
        &self.root_bindings
    }

    /// The enclosing node of `id`.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Children of `id`, materializing them on first access.
    ///
    /// Repeated calls return the same sequence.
    pub fn children(&mut self, id: NodeId) -> Result<&[NodeId], TreeError> {
        self.materialize(id)?;
        Ok(self.built_children(id).unwrap_or_default())
    }

    /// Children of `id` if they have already been materialized.
    pub fn built_children(&self, id: NodeId) -> Option<&[NodeId]> {
        match &self.nodes[id.index()].children {
            Children::Built(children) => Some(children),
            Children::Unbuilt => None,
        }
    }

    /// Name of the field behind `id`; `None` for the root.
    pub fn field_name(&self, id: NodeId) -> Option<&'p str> {
        let provider = self.provider;
        let field = self.nodes[id.index()].field?;
        Some(provider.resolve_name(provider.field(field).name))
    }

    /// The field's declared type as written, e.g. `T` or
    /// `java.util.List<org.example.Item>`; the class name for the root.
    pub fn type_name(&self, id: NodeId) -> String {
        let node = &self.nodes[id.index()];
        match node.field {
            Some(field) => self.provider.type_name(&self.provider.field(field).ty),
            None => self.provider.type_name(&node.generic_type),
        }
    }

    /// Render one node for diagnostics.
    pub fn display(&self, id: NodeId) -> NodeDisplay<'_, 'p, P> {
        NodeDisplay { tree: self, id }
    }

    /// Render every materialized node as an indented outline.
    ///
    /// ```text
    /// org.example.Pair<java.lang.Integer, java.lang.String>
    ///   left: java.lang.Integer
    ///   right: java.lang.String
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.index()];
            let ty = node.resolved_type.display(self.provider);
            let _ = match self.field_name(id) {
                Some(name) => writeln!(out, "{:indent$}{name}: {ty}", "", indent = depth * 2),
                None => writeln!(out, "{:indent$}{ty}", "", indent = depth * 2),
            };
            if let Some(children) = self.built_children(id) {
                stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        out
    }

    /// Materialize every reachable node, depth-first in declaration order.
    pub(crate) fn expand_all(&mut self) -> Result<(), TreeError> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            self.materialize(id)?;
            if let Some(children) = self.built_children(id) {
                stack.extend(children.iter().rev());
            }
        }
        Ok(())
    }

    fn is_leaf_class(&self, class: ClassId) -> bool {
        match self.provider.class(class).namespace {
            Some(ns) => self
                .config
                .is_platform_namespace(self.provider.resolve_name(ns)),
            None => true,
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn materialize(&mut self, id: NodeId) -> Result<(), TreeError> {
        if self.nodes[id.index()].is_built() {
            return Ok(());
        }

        let node = &self.nodes[id.index()];
        let actual = node.actual_type;
        if node.resolved_type.is_array() || self.is_leaf_class(actual) {
            self.nodes[id.index()].children = Children::Built(Vec::new());
            return Ok(());
        }

        let provider = self.provider;
        let fields = provider.declared_fields(actual);
        let mark = self.nodes.len();
        let mut children = Vec::with_capacity(fields.len());
        for &field in fields {
            match self.make_child(id, field) {
                Ok(Some(child)) => children.push(child),
                Ok(None) => {}
                Err(err) => {
                    self.rollback(mark);
                    return Err(err);
                }
            }
        }

        self.nodes[id.index()].children = Children::Built(children);
        Ok(())
    }

    /// Drop every node allocated at or after `mark`, releasing its visited key.
    fn rollback(&mut self, mark: usize) {
        for node in self.nodes.drain(mark..) {
            self.visited.remove(&node.key());
        }
    }

    /// Resolve `field` of `parent` and allocate its node, or `None` if an
    /// equal node was already visited during this build.
    fn make_child(&mut self, parent: NodeId, field: FieldId) -> Result<Option<NodeId>, TreeError> {
        let provider = self.provider;
        let declared = &provider.field(field).ty;

        let (resolved, declaring_class, generic_type) = match provider.classify(declared) {
            TypeShape::Variable(name) => {
                let resolved = self.resolve_expr(Some(parent), declared, Some(field))?;
                let generic = self.propagated_generic(parent, name, &resolved, declared);
                tracing::debug!(
                    field = %self.site_name(Some(field)),
                    actual = %resolved.display(provider),
                    "substituted type variable"
                );
                let class = resolved.class;
                (resolved, Some(class), generic)
            }
            // Arrays that mention a variable are rejected by `resolve_expr`.
            TypeShape::Concrete(_) | TypeShape::Parameterized(..) | TypeShape::Array(_) => {
                let resolved = self.resolve_expr(Some(parent), declared, Some(field))?;
                (resolved, None, declared.clone())
            }
            TypeShape::Other => {
                return Err(TreeError::UnhandledTypeShape {
                    ty: provider.type_name(declared),
                    site: self.site_name(Some(field)),
                });
            }
        };

        let key = NodeKey {
            field: Some(field),
            actual_type: resolved.class,
        };
        if !self.visited.insert(key) {
            tracing::trace!(
                field = %self.site_name(Some(field)),
                actual = %provider.class_name(resolved.class),
                "already visited, pruning"
            );
            return Ok(None);
        }

        let actual_type = resolved.class;
        let owner = (!resolved.is_array()
            && !provider.declared_type_params(actual_type).is_empty())
        .then_some(actual_type);
        let mut nested_type_refs = Vec::new();
        let site = || self.site_name(Some(field));
        let type_map =
            build_type_var_map(provider, owner, &generic_type, &site, &mut nested_type_refs)?;

        tracing::trace!(
            field = %self.site_name(Some(field)),
            actual = %provider.class_name(actual_type),
            bindings = type_map.len(),
            "resolved field"
        );

        Ok(Some(self.push(Node {
            field: Some(field),
            actual_type,
            declaring_class,
            generic_type,
            type_map,
            nested_type_refs,
            resolved_type: resolved,
            parent: Some(parent),
            children: Children::Unbuilt,
        })))
    }

    /// The generic type handed to a child whose declared type is the
    /// variable `name`.
    ///
    /// When the variable is bound to a parameterized type, the child gets that
    /// type with its arguments substituted. Otherwise the child keeps its
    /// declared type.
    fn propagated_generic(
        &self,
        parent: NodeId,
        name: Name,
        resolved: &ResolvedType,
        declared: &TypeExpr,
    ) -> TypeExpr {
        match self.find_binding(Some(parent), name) {
            Some(Found::Reference { .. }) => resolved.to_type_expr(),
            _ => declared.clone(),
        }
    }

    pub(crate) fn is_eager(&self) -> bool {
        self.config.expansion == Expansion::Eager
    }
}

/// [`fmt::Display`] adapter returned by [`NodeTree::display`].
pub struct NodeDisplay<'t, 'p, P: ?Sized> {
    tree: &'t NodeTree<'p, P>,
    id: NodeId,
}

impl<P: TypeMetadataProvider + ?Sized> fmt::Display for NodeDisplay<'_, '_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        let provider = tree.provider;
        let node = tree.node(self.id);

        match tree.field_name(self.id) {
            Some(name) => writeln!(
                f,
                "Field: {name} {}, actual type: {}",
                tree.type_name(self.id),
                provider.class_name(node.actual_type)
            )?,
            None => writeln!(f, "Root: {}", provider.class_name(node.actual_type))?,
        }

        let params: Vec<&str> = provider
            .declared_type_params(node.actual_type)
            .iter()
            .map(|&p| provider.resolve_name(p))
            .collect();
        writeln!(f, " -> typeVars: [{}]", params.join(", "))?;
        writeln!(f, " -> resolved: {}", node.resolved_type.display(provider))?;

        let bindings: Vec<String> = node
            .type_map
            .iter()
            .map(|(param, binding)| {
                let bound = match binding {
                    Binding::Class(class) => provider.class_name(*class),
                    Binding::Variable(var) => provider.resolve_name(*var).to_owned(),
                    Binding::Reference(type_ref) => provider.type_name(&type_ref.to_type_expr()),
                    Binding::Array(array) => provider.type_name(array),
                };
                format!("{}={bound}", provider.resolve_name(param))
            })
            .collect();
        writeln!(f, " -> typeMap: {{{}}}", bindings.join(", "))?;

        let nested: Vec<String> = node
            .nested_type_refs
            .iter()
            .map(|r| provider.type_name(&r.to_type_expr()))
            .collect();
        writeln!(f, " -> nestedTypes: [{}]", nested.join(", "))?;

        if let Some(class) = node.declaring_class {
            writeln!(f, " -> declaringClass: {}", provider.class_name(class))?;
        }

        if let Some(children) = tree.built_children(self.id) {
            let names: Vec<&str> = children
                .iter()
                .filter_map(|&child| tree.field_name(child))
                .collect();
            writeln!(f, " -> children: {}", names.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "tests panic on unexpected state")]
mod tests;
