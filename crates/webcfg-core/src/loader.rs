//! Loader reference resolution.
//!
//! Rules name their loaders by package (`sass-loader`); how that name becomes
//! something the bundler can load is up to a [`LoaderResolver`].

use std::path::PathBuf;

/// Turns a loader package name into a reference the bundler can load.
pub trait LoaderResolver {
    fn resolve(&self, name: &str) -> String;
}

/// Leaves loader names as-is for the bundler to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareLoaderResolver;

impl LoaderResolver for BareLoaderResolver {
    fn resolve(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Points loaders at `<root>/node_modules/<name>`.
///
/// The path is computed, not checked; a missing package surfaces later when
/// the bundler loads it.
#[derive(Debug, Clone)]
pub struct NodeModulesLoaderResolver {
    root: PathBuf,
}

impl NodeModulesLoaderResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LoaderResolver for NodeModulesLoaderResolver {
    fn resolve(&self, name: &str) -> String {
        // Scoped names (`@scope/pkg`) stay a two-level path.
        let mut path = self.root.join("node_modules");
        path.extend(name.split('/'));
        path.to_string_lossy().into_owned()
    }
}
