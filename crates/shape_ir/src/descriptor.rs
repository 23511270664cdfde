//! Serializable schema descriptors.
//!
//! A descriptor describes a class graph as plain data so it can be generated
//! ahead of time and loaded without any runtime reflection. Field types are
//! written in the syntax accepted by [`ClassRegistry::parse_type`].
//!
//! ```text
//! {
//!   "classes": [
//!     { "namespace": "org.example", "name": "Pair", "type_params": ["L", "R"],
//!       "fields": [ { "name": "left", "ty": "L" }, { "name": "right", "ty": "R" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{ClassRegistry, SchemaError};

/// A complete class graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Classes in any order; fields may reference classes declared later.
    pub classes: Vec<ClassDescriptor>,
}

/// One class of a [`SchemaDescriptor`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Dotted namespace; empty or absent for primitive-like classes.
    #[serde(default)]
    pub namespace: String,

    /// Simple class name.
    pub name: String,

    /// Type parameter names in declaration order.
    #[serde(default)]
    pub type_params: Vec<String>,

    /// Declared fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// One field of a [`ClassDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,

    /// Declared type, e.g. `Map<K, List<V>>`.
    pub ty: String,
}

impl ClassRegistry {
    /// Build a registry from a descriptor, on top of the JDK prelude.
    pub fn from_descriptor(descriptor: &SchemaDescriptor) -> Result<Self, SchemaError> {
        let mut registry = Self::with_jdk_prelude();
        registry.load_descriptor(descriptor)?;
        Ok(registry)
    }

    /// Register every class of `descriptor` into this registry.
    ///
    /// All classes are registered before any field is parsed, so fields may
    /// refer to classes declared later in the descriptor (or to their own class).
    pub fn load_descriptor(&mut self, descriptor: &SchemaDescriptor) -> Result<(), SchemaError> {
        let mut ids = Vec::with_capacity(descriptor.classes.len());
        for class in &descriptor.classes {
            let params: Vec<&str> = class.type_params.iter().map(String::as_str).collect();
            ids.push(self.register_class(&class.namespace, &class.name, &params)?);
        }

        for (class, id) in descriptor.classes.iter().zip(ids) {
            for field in &class.fields {
                self.add_field_str(id, &field.name, &field.ty)?;
            }
        }
        Ok(())
    }
}
