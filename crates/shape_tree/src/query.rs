//! Child lookups over a node's direct children.
//!
//! Both lookups materialize the node's children if needed and search only one
//! level deep. A miss is a [`TreeError::ChildNotFound`], never a silent `None`.

use shape_ir::TypeMetadataProvider;

use crate::{ChildKey, NodeId, NodeTree, TreeError};

impl<P: TypeMetadataProvider + ?Sized> NodeTree<'_, P> {
    /// The child whose declared type is written as `type_param`.
    ///
    /// Matches the declared type as written on the field, e.g. `T` for
    /// `T value;`, or `java.util.List<T>` for `List<T> values;`.
    pub fn find_child_by_type_parameter(
        &mut self,
        id: NodeId,
        type_param: &str,
    ) -> Result<NodeId, TreeError> {
        self.find_child(id, |tree, child| tree.type_name(child) == type_param)?
            .ok_or_else(|| TreeError::ChildNotFound {
                key: ChildKey::TypeParameter(type_param.to_owned()),
            })
    }

    /// The child for the field named `name`.
    pub fn find_child_by_field_name(&mut self, id: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.find_child(id, |tree, child| tree.field_name(child) == Some(name))?
            .ok_or_else(|| TreeError::ChildNotFound {
                key: ChildKey::FieldName(name.to_owned()),
            })
    }

    fn find_child(
        &mut self,
        id: NodeId,
        predicate: impl Fn(&Self, NodeId) -> bool,
    ) -> Result<Option<NodeId>, TreeError> {
        self.children(id)?;
        let tree: &Self = self;
        Ok(tree
            .built_children(id)
            .and_then(|children| children.iter().copied().find(|&child| predicate(tree, child))))
    }
}
