//! Type-variable resolution through the ancestor chain.
//!
//! A variable used at a node is looked up in that node's type-variable map
//! first. Bindings in a node's map are expressed in its parent's scope, so a
//! binding to another variable continues one level up, and a miss keeps
//! searching the nearest ancestor. Above the root, the root binding table
//! answers.

use std::fmt;

use shape_ir::{ClassId, FieldId, Name, TypeExpr, TypeMetadataProvider, TypeShape};

use crate::{Binding, NodeId, NodeTree, TreeError, TypeRef};

/// A fully concrete type: a class with concrete type arguments, possibly
/// wrapped in array dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    /// The class (the element class for arrays).
    pub class: ClassId,
    /// Concrete type arguments; empty for non-generic or raw usage.
    pub args: Vec<ResolvedType>,
    /// Array dimensions; `0` for a non-array type.
    pub dimensions: u32,
}

impl ResolvedType {
    /// A class applied to concrete type arguments.
    pub fn new(class: ClassId, args: Vec<ResolvedType>) -> Self {
        Self {
            class,
            args,
            dimensions: 0,
        }
    }

    /// A class without type arguments.
    pub fn class(class: ClassId) -> Self {
        Self::new(class, Vec::new())
    }

    /// An array of `self`.
    #[must_use]
    pub fn array_of(mut self) -> Self {
        self.dimensions += 1;
        self
    }

    /// Returns `true` for array types.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.dimensions > 0
    }

    /// Convert back to a (variable-free) type expression.
    pub fn to_type_expr(&self) -> TypeExpr {
        let mut expr = if self.args.is_empty() {
            TypeExpr::Class(self.class)
        } else {
            TypeExpr::parameterized(
                self.class,
                self.args.iter().map(ResolvedType::to_type_expr).collect(),
            )
        };
        for _ in 0..self.dimensions {
            expr = TypeExpr::array(expr);
        }
        expr
    }

    /// Render with qualified class names, e.g. `java.util.List<java.lang.String>`.
    pub fn display<'a, P: TypeMetadataProvider + ?Sized>(
        &'a self,
        provider: &'a P,
    ) -> ResolvedTypeDisplay<'a, P> {
        ResolvedTypeDisplay { ty: self, provider }
    }
}

/// [`fmt::Display`] adapter returned by [`ResolvedType::display`].
pub struct ResolvedTypeDisplay<'a, P: ?Sized> {
    ty: &'a ResolvedType,
    provider: &'a P,
}

impl<P: TypeMetadataProvider + ?Sized> fmt::Display for ResolvedTypeDisplay<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.provider.class_name(self.ty.class))?;
        if let Some((first, rest)) = self.ty.args.split_first() {
            write!(f, "<{}", first.display(self.provider))?;
            for arg in rest {
                write!(f, ", {}", arg.display(self.provider))?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.ty.dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Where a variable's binding was found.
pub(crate) enum Found<'t> {
    Class(ClassId),
    /// A variable-free array type.
    Array(&'t TypeExpr),
    Reference {
        type_ref: &'t TypeRef,
        /// Scope the reference's arguments are written in.
        scope: Option<NodeId>,
    },
}

impl<P: TypeMetadataProvider + ?Sized> NodeTree<'_, P> {
    /// Find the binding of `name` as seen from `scope`.
    ///
    /// `scope` is the node whose class declares the variable; `None` means
    /// the root binding table.
    pub(crate) fn find_binding(&self, scope: Option<NodeId>, name: Name) -> Option<Found<'_>> {
        let mut scope = scope;
        let mut name = name;
        while let Some(id) = scope {
            let node = &self.nodes[id.index()];
            match node.type_map.get(name) {
                Some(Binding::Class(class)) => return Some(Found::Class(*class)),
                Some(Binding::Array(expr)) => return Some(Found::Array(expr)),
                Some(Binding::Reference(type_ref)) => {
                    return Some(Found::Reference {
                        type_ref,
                        scope: node.parent,
                    })
                }
                Some(Binding::Variable(next)) => name = *next,
                None => {}
            }
            scope = node.parent;
        }
        self.root_bindings.get(name).map(Found::Class)
    }

    /// Resolve `expr`, written in `scope`, to a fully concrete type.
    ///
    /// `site` is the field being resolved (for error messages); `None` for
    /// the root.
    pub(crate) fn resolve_expr(
        &self,
        scope: Option<NodeId>,
        expr: &TypeExpr,
        site: Option<FieldId>,
    ) -> Result<ResolvedType, TreeError> {
        match self.provider.classify(expr) {
            TypeShape::Concrete(class) => Ok(ResolvedType::class(class)),
            TypeShape::Parameterized(raw, args) => {
                let expected = self.provider.declared_type_params(raw).len();
                if expected != args.len() {
                    return Err(TreeError::TypeArgumentCount {
                        class: self.provider.class_name(raw),
                        expected,
                        found: args.len(),
                    });
                }
                let args = args
                    .iter()
                    .map(|arg| self.resolve_expr(scope, arg, site))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ResolvedType::new(raw, args))
            }
            TypeShape::Array(component) if !component.mentions_variables() => {
                Ok(self.resolve_expr(scope, component, site)?.array_of())
            }
            TypeShape::Variable(name) => match self.find_binding(scope, name) {
                Some(Found::Class(class)) => Ok(ResolvedType::class(class)),
                Some(Found::Array(array)) => self.resolve_expr(None, array, site),
                Some(Found::Reference { type_ref, scope }) => {
                    self.resolve_expr(scope, &type_ref.to_type_expr(), site)
                }
                None => Err(TreeError::UnresolvableTypeVariable {
                    variable: self.provider.resolve_name(name).to_owned(),
                    site: self.site_name(site),
                }),
            },
            TypeShape::Array(_) | TypeShape::Other => Err(TreeError::UnhandledTypeShape {
                ty: self.provider.type_name(expr),
                site: self.site_name(site),
            }),
        }
    }

    /// Resolve one entry of a node's type-variable map to a concrete type.
    ///
    /// Used for the element, key, and value types of container leaves, e.g.
    /// `V` of a `Map<K, V>` node.
    pub fn resolve_type_argument(&self, id: NodeId, param: &str) -> Result<ResolvedType, TreeError> {
        let node = &self.nodes[id.index()];
        let binding = node
            .type_map
            .iter()
            .find_map(|(name, binding)| (self.provider.resolve_name(name) == param).then_some(binding))
            .ok_or_else(|| TreeError::UnknownTypeParameter {
                class: self.provider.class_name(node.actual_type),
                name: param.to_owned(),
            })?;

        match binding {
            Binding::Class(class) => Ok(ResolvedType::class(*class)),
            Binding::Array(array) => self.resolve_expr(node.parent, array, node.field),
            Binding::Variable(name) => {
                self.resolve_expr(node.parent, &TypeExpr::Var(*name), node.field)
            }
            Binding::Reference(type_ref) => {
                self.resolve_expr(node.parent, &type_ref.to_type_expr(), node.field)
            }
        }
    }

    /// `ns.Class.field` for a field, `ns.Class` of the root for `None`.
    pub(crate) fn site_name(&self, site: Option<FieldId>) -> String {
        match site {
            Some(field) => {
                let def = self.provider.field(field);
                format!(
                    "{}.{}",
                    self.provider.class_name(def.declaring_class),
                    self.provider.resolve_name(def.name)
                )
            }
            None => self.provider.class_name(self.root_class),
        }
    }
}
