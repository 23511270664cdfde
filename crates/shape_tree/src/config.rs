//! Tree construction settings.

/// Namespaces treated as platform/library code by default.
pub const DEFAULT_PLATFORM_NAMESPACES: &[&str] = &["java", "javax"];

/// When children are materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Materialize the whole tree during the build.
    ///
    /// Every resolution error surfaces from the build itself.
    #[default]
    Eager,

    /// Materialize a node's children on first access.
    ///
    /// Resolution errors surface from the access that triggers them.
    Lazy,
}

/// Configuration for [`TreeBuilder`](crate::TreeBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Classes in these namespaces (or nested below them) are leaves: their
    /// fields are never enumerated.
    pub platform_namespaces: Vec<String>,

    /// Eager or lazy child materialization.
    pub expansion: Expansion,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            platform_namespaces: DEFAULT_PLATFORM_NAMESPACES
                .iter()
                .map(|&ns| ns.to_owned())
                .collect(),
            expansion: Expansion::Eager,
        }
    }
}

impl TreeConfig {
    /// Create a config with the given expansion mode.
    pub fn with_expansion(expansion: Expansion) -> Self {
        Self {
            expansion,
            ..Default::default()
        }
    }

    /// Create a config with the given platform namespaces.
    pub fn with_platform_namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            platform_namespaces: namespaces.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check whether `namespace` is a platform namespace or nested below one.
    ///
    /// Matching is per dotted segment: `java` covers `java.util` but not `javafx`.
    pub fn is_platform_namespace(&self, namespace: &str) -> bool {
        self.platform_namespaces.iter().any(|platform| {
            namespace
                .strip_prefix(platform.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }
}
