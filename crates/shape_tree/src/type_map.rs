//! Type-variable maps.
//!
//! A node's `TypeVarMap` binds each type parameter of the node's actual class
//! to what it stands for at that position in the tree. Bindings are written in
//! the scope of the node's parent (the class that declared the node's field),
//! so a [`Binding::Variable`] always refers to a type parameter one level up.
//!
//! ```text
//! class Outer<K, V> { Map<K, Map<IK, V>> field; }
//!
//! node(field).type_map = { K → Variable(K), V → Reference(Map<IK, V>) }
//! ```

use shape_ir::{ClassId, Name, TypeExpr, TypeMetadataProvider, TypeShape};

use crate::{TreeError, TypeRef};

/// What a type parameter is bound to at one tree position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A concrete class.
    Class(ClassId),
    /// A concrete array type, e.g. `String[]`; never mentions a variable.
    Array(TypeExpr),
    /// A type variable of the enclosing scope, still to be resolved.
    Variable(Name),
    /// A parameterized type, e.g. `List<V>`.
    Reference(TypeRef),
}

/// Type parameter → [`Binding`], in the class's declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeVarMap {
    entries: Vec<(Name, Binding)>,
}

impl TypeVarMap {
    /// An empty map (no generic context, or raw usage).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The binding for `param`, if any.
    pub fn get(&self, param: Name) -> Option<&Binding> {
        self.entries
            .iter()
            .find_map(|(name, binding)| (*name == param).then_some(binding))
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, &Binding)> {
        self.entries.iter().map(|(name, binding)| (*name, binding))
    }

    fn insert(&mut self, param: Name, binding: Binding) {
        self.entries.push((param, binding));
    }
}

/// Build the type-variable map of `owner` used as `generic` at one position.
///
/// Every parameterized argument is also recorded into `nested` so that
/// children inheriting it reuse its exact arguments.
pub(crate) fn build_type_var_map<P: TypeMetadataProvider + ?Sized>(
    provider: &P,
    owner: Option<ClassId>,
    generic: &TypeExpr,
    site: &dyn Fn() -> String,
    nested: &mut Vec<TypeRef>,
) -> Result<TypeVarMap, TreeError> {
    let Some(owner) = owner else {
        return Ok(TypeVarMap::empty());
    };

    let TypeShape::Parameterized(_, args) = provider.classify(generic) else {
        tracing::debug!(
            class = %provider.class_name(owner),
            generic = %provider.type_name(generic),
            "no generic type information, type variables of this class stay unbound"
        );
        return Ok(TypeVarMap::empty());
    };

    let params = provider.declared_type_params(owner);
    if params.len() != args.len() {
        return Err(TreeError::TypeArgumentCount {
            class: provider.class_name(owner),
            expected: params.len(),
            found: args.len(),
        });
    }

    let mut map = TypeVarMap::empty();
    for (&param, arg) in params.iter().zip(args) {
        let binding = match provider.classify(arg) {
            TypeShape::Variable(name) => Binding::Variable(name),
            TypeShape::Parameterized(raw, nested_args) => {
                let type_ref = TypeRef::new(raw, nested_args.to_vec());
                if !nested.contains(&type_ref) {
                    nested.push(type_ref.clone());
                }
                Binding::Reference(type_ref)
            }
            TypeShape::Concrete(class) => Binding::Class(class),
            TypeShape::Array(_) if !arg.mentions_variables() => Binding::Array(arg.clone()),
            TypeShape::Array(_) | TypeShape::Other => {
                return Err(TreeError::UnhandledTypeShape {
                    ty: provider.type_name(arg),
                    site: site(),
                });
            }
        };
        map.insert(param, binding);
    }
    Ok(map)
}
