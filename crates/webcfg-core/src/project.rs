//! Workspace context handed to configuration transforms.
//!
//! Mirrors the executor context of an Nx-style monorepo: the workspace root,
//! the project graph, the name of the project being built, and its build
//! target options.

use crate::bundler::Mode;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Project graph keyed by project name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectGraph {
    #[serde(default)]
    pub nodes: BTreeMap<String, ProjectGraphNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Vec<ProjectGraphDependency>>,
}

impl ProjectGraph {
    /// Look up a project node.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&ProjectGraphNode> {
        self.nodes.get(name)
    }

    /// Workspace-relative root of a project.
    pub fn project_root(&self, name: &str) -> Result<&str, Error> {
        self.node(name)
            .map(|node| node.data.root.as_str())
            .ok_or_else(|| Error::project_not_found(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectGraphNode {
    #[serde(default)]
    pub name: String,
    /// `app`, `lib` or `e2e`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub data: ProjectData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Project directory relative to the workspace root.
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraphDependency {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub dependency_type: String,
}

/// `sourceMap` build option: a flag or a devtool name such as `"hidden"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceMapOption {
    Enabled(bool),
    Kind(String),
}

impl SourceMapOption {
    /// Whether any source map is requested.
    #[must_use]
    pub fn enabled(&self) -> bool {
        match self {
            Self::Enabled(on) => *on,
            Self::Kind(kind) => !kind.is_empty(),
        }
    }
}

/// Options of the build target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<SourceMapOption>,
    /// Workspace-relative HTML template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_href: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BuildOptions {
    #[must_use]
    pub fn source_map_enabled(&self) -> bool {
        self.source_map.as_ref().is_some_and(SourceMapOption::enabled)
    }

    /// The index template, ignoring an empty value.
    #[must_use]
    pub fn index_html(&self) -> Option<&str> {
        self.index_html.as_deref().filter(|s| !s.is_empty())
    }

    /// The base href, ignoring an empty value.
    #[must_use]
    pub fn base_href(&self) -> Option<&str> {
        self.base_href.as_deref().filter(|s| !s.is_empty())
    }
}

/// Where the build runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorContext {
    /// Absolute workspace root.
    pub root: PathBuf,
    pub project_graph: ProjectGraph,
    pub project_name: String,
}

/// Everything a configuration transform may read besides the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfigContext {
    pub options: BuildOptions,
    pub context: ExecutorContext,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> ProjectGraph {
        serde_json::from_value(json!({
            "nodes": {
                "shop": {
                    "name": "shop",
                    "type": "app",
                    "data": { "root": "apps/shop", "sourceRoot": "apps/shop/src", "tags": [] }
                }
            },
            "dependencies": {
                "shop": [{ "source": "shop", "target": "ui", "type": "static" }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_project_root_lookup() {
        assert_eq!(graph().project_root("shop").unwrap(), "apps/shop");
    }

    #[test]
    fn test_project_root_missing() {
        let err = graph().project_root("cart").unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { ref project } if project == "cart"));
    }

    #[test]
    fn test_graph_preserves_node_extras() {
        let g = graph();
        let node = g.node("shop").unwrap();
        assert_eq!(node.node_type.as_deref(), Some("app"));
        assert_eq!(node.data.source_root.as_deref(), Some("apps/shop/src"));
        assert!(node.data.extra.contains_key("tags"));
        assert_eq!(g.dependencies["shop"][0].target, "ui");
    }

    #[test]
    fn test_source_map_option() {
        let opts: BuildOptions = serde_json::from_value(json!({ "sourceMap": "hidden" })).unwrap();
        assert!(opts.source_map_enabled());

        let opts: BuildOptions = serde_json::from_value(json!({ "sourceMap": false })).unwrap();
        assert!(!opts.source_map_enabled());

        assert!(!BuildOptions::default().source_map_enabled());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let opts: BuildOptions =
            serde_json::from_value(json!({ "indexHtml": "", "baseHref": "" })).unwrap();
        assert_eq!(opts.index_html(), None);
        assert_eq!(opts.base_href(), None);
    }

    #[test]
    fn test_build_options_keep_unknown_keys() {
        let opts: BuildOptions = serde_json::from_value(json!({
            "mode": "production",
            "outputPath": "dist/apps/shop"
        }))
        .unwrap();
        assert_eq!(opts.mode, Some(Mode::Production));
        assert_eq!(opts.extra["outputPath"], "dist/apps/shop");
    }
}
