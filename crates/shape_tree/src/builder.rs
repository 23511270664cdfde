//! Tree construction entry points.

use rustc_hash::{FxHashMap, FxHashSet};
use shape_ir::{ClassId, Name, TypeExpr, TypeMetadataProvider};

use crate::node::Children;
use crate::type_map::build_type_var_map;
use crate::{Node, NodeId, NodeTree, TreeConfig, TreeError};

/// Concrete classes for the type parameters of the root class.
///
/// Consulted whenever a type variable is not bound by any node on the path
/// from the root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootBindings {
    bindings: FxHashMap<Name, ClassId>,
}

impl RootBindings {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder style.
    #[must_use]
    pub fn bind(mut self, param: Name, class: ClassId) -> Self {
        self.insert(param, class);
        self
    }

    /// Add or replace a binding.
    pub fn insert(&mut self, param: Name, class: ClassId) {
        self.bindings.insert(param, class);
    }

    /// The class bound to `param`.
    pub fn get(&self, param: Name) -> Option<ClassId> {
        self.bindings.get(&param).copied()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, ClassId)> + '_ {
        self.bindings.iter().map(|(&name, &class)| (name, class))
    }
}

impl FromIterator<(Name, ClassId)> for RootBindings {
    fn from_iter<I: IntoIterator<Item = (Name, ClassId)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Builds [`NodeTree`]s from one metadata provider.
///
/// Every [`build`](Self::build) starts from a fresh visited set; builds
/// never share state.
pub struct TreeBuilder<'p, P: ?Sized> {
    provider: &'p P,
    config: TreeConfig,
}

impl<'p, P: TypeMetadataProvider + ?Sized> TreeBuilder<'p, P> {
    /// Create a builder with the default configuration.
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            config: TreeConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the tree for `root`, with `bindings` for its type parameters.
    ///
    /// With [`Expansion::Eager`](crate::Expansion::Eager) (the default) the
    /// whole tree is materialized here, and any unresolvable variable or
    /// unhandled type aborts the build.
    #[tracing::instrument(level = "debug", skip_all, fields(root = %self.provider.class_name(root)))]
    pub fn build(&self, root: ClassId, bindings: RootBindings) -> Result<NodeTree<'p, P>, TreeError> {
        let provider = self.provider;
        let params = provider.declared_type_params(root);

        if let Some((name, _)) = bindings.iter().find(|(name, _)| !params.contains(name)) {
            return Err(TreeError::UnknownTypeParameter {
                class: provider.class_name(root),
                name: provider.resolve_name(name).to_owned(),
            });
        }

        // The root's own parameters defer to the root bindings.
        let generic_type = if params.is_empty() {
            TypeExpr::Class(root)
        } else {
            TypeExpr::parameterized(root, params.iter().map(|&p| TypeExpr::Var(p)).collect())
        };

        let mut tree = NodeTree {
            provider,
            config: self.config.clone(),
            root_bindings: bindings,
            nodes: Vec::new(),
            visited: FxHashSet::default(),
            root: NodeId::new(0),
            root_class: root,
        };

        let resolved_type = tree.resolve_expr(None, &generic_type, None)?;
        let owner = (!params.is_empty()).then_some(root);
        let mut nested_type_refs = Vec::new();
        let site = || provider.class_name(root);
        let type_map =
            build_type_var_map(provider, owner, &generic_type, &site, &mut nested_type_refs)?;

        tree.root = tree.push(Node {
            field: None,
            actual_type: root,
            declaring_class: None,
            generic_type,
            type_map,
            nested_type_refs,
            resolved_type,
            parent: None,
            children: Children::Unbuilt,
        });

        if tree.is_eager() {
            tree.expand_all()?;
        }

        tracing::debug!(nodes = tree.len(), "tree built");
        Ok(tree)
    }
}

/// Build the tree for `root` with the default configuration.
///
/// Shorthand for `TreeBuilder::new(provider).build(root, bindings)`.
pub fn build_tree<P: TypeMetadataProvider + ?Sized>(
    provider: &P,
    root: ClassId,
    bindings: RootBindings,
) -> Result<NodeTree<'_, P>, TreeError> {
    TreeBuilder::new(provider).build(root, bindings)
}
