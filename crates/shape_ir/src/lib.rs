//! Shape IR - Class and Generic Type Metadata
//!
//! This crate holds the read-only metadata the resolver works from:
//! - Names for interned identifiers
//! - Class and field definitions addressed by compact ids
//! - Type expressions as written on fields (`Map<K, List<V>>`)
//! - The [`TypeMetadataProvider`] capability used by the resolver
//! - An in-memory [`ClassRegistry`] that implements it
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → `Name(u32)`, classes → `ClassId(u32)`
//! - **Flatten Everything**: fields live in one arena, classes refer to them by `FieldId`
//! - **Describe Up Front**: schemas are registered (or loaded from a descriptor)
//!   before resolution starts; nothing is discovered at resolution time

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod descriptor;
mod error;
mod ids;
mod interner;
mod name;
mod parse;
mod provider;
mod registry;
mod type_expr;

pub use descriptor::{ClassDescriptor, FieldDescriptor, SchemaDescriptor};
pub use error::SchemaError;
pub use ids::{ClassId, FieldId};
pub use interner::StringInterner;
pub use name::Name;
pub use provider::TypeMetadataProvider;
pub use registry::{ClassDef, ClassRegistry, FieldDef};
pub use type_expr::{TypeExpr, TypeShape};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ClassId, FieldId, Name};
    crate::static_assert_size!(Name, 4);
    crate::static_assert_size!(ClassId, 4);
    crate::static_assert_size!(FieldId, 4);
}
