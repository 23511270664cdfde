//! Generic type resolution for class graphs.
//!
//! Given a root class (possibly generic) and a table binding its type
//! parameters, this crate builds a [`NodeTree`]: one [`Node`] per field
//! position, each annotated with the concrete class it holds once every type
//! variable on the path from the root has been substituted.
//!
//! # Architecture
//!
//! ```text
//! TypeMetadataProvider (shape_ir)
//!     └── TreeBuilder::build(root, RootBindings)
//!             └── NodeTree (arena of Nodes, visited set, root bindings)
//!                     ├── TypeVarMap per node (type parameter → Binding)
//!                     ├── resolve: variable lookup through the ancestor chain
//!                     └── query: find child by field name / type parameter
//! ```
//!
//! # Termination
//!
//! Every build owns a fresh visited set keyed by `(field, actual type)`. A
//! child whose key was already seen is pruned, so self-referential and
//! generically cyclic graphs produce finite trees.
//!
//! # Example
//!
//! ```text
//! let mut registry = ClassRegistry::with_jdk_prelude();
//! let pair = registry.register_class("org.example", "Pair", &["L", "R"])?;
//! registry.add_field_str(pair, "left", "L")?;
//! registry.add_field_str(pair, "right", "R")?;
//!
//! let bindings = RootBindings::new()
//!     .bind(registry.intern("L"), integer)
//!     .bind(registry.intern("R"), string);
//! let mut tree = build_tree(&registry, pair, bindings)?;
//! let left = tree.find_child_by_field_name(tree.root(), "left")?;
//! assert_eq!(tree.node(left).actual_type(), integer);
//! ```

mod builder;
mod config;
mod error;
mod node;
mod query;
mod resolve;
mod tree;
mod type_map;
mod type_ref;

pub use builder::{build_tree, RootBindings, TreeBuilder};
pub use config::{Expansion, TreeConfig};
pub use error::{ChildKey, TreeError};
pub use node::{Node, NodeId, NodeKey};
pub use resolve::{ResolvedType, ResolvedTypeDisplay};
pub use tree::{NodeDisplay, NodeTree};
pub use type_map::{Binding, TypeVarMap};
pub use type_ref::TypeRef;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=shape_tree=debug` or `RUST_LOG=shape_tree=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
