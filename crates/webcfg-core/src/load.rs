//! Reading configuration inputs from JSON files.

use crate::bundler::Configuration;
use crate::error::Error;
use crate::project::{BuildOptions, ProjectGraph};
use crate::web::WithWebOptions;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a bundler configuration.
pub fn read_configuration(path: &Path) -> Result<Configuration, Error> {
    read_json(path)
}

/// Read web augmenter options. A `null` document means all defaults.
pub fn read_options(path: &Path) -> Result<WithWebOptions, Error> {
    read_json::<Option<WithWebOptions>>(path).map(Option::unwrap_or_default)
}

/// Read build target options.
pub fn read_build_options(path: &Path) -> Result<BuildOptions, Error> {
    read_json(path)
}

/// Read a project graph.
///
/// Accepts both a bare graph (`{ "nodes": ... }`) and the exported form
/// (`{ "graph": { "nodes": ... } }`).
pub fn read_project_graph(path: &Path) -> Result<ProjectGraph, Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GraphFile {
        Exported { graph: ProjectGraph },
        Bare(ProjectGraph),
    }

    Ok(match read_json(path)? {
        GraphFile::Exported { graph } | GraphFile::Bare(graph) => graph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Mode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_configuration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rspack.config.json");
        fs::write(
            &path,
            r#"{ "mode": "production", "module": { "rules": [] }, "plugins": [] }"#,
        )
        .unwrap();

        let config = read_configuration(&path).unwrap();
        assert_eq!(config.mode, Some(Mode::Production));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = read_configuration(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, "{ cssModules: true }").unwrap();

        let err = read_options(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_read_options_and_build_options() {
        let dir = tempdir().unwrap();
        let options_path = dir.path().join("web.json");
        fs::write(
            &options_path,
            r#"{ "cssModules": true, "stylePreprocessorOptions": { "includePaths": ["libs/theme"] } }"#,
        )
        .unwrap();
        let build_path = dir.path().join("build.json");
        fs::write(&build_path, r#"{ "baseHref": "/", "sourceMap": true }"#).unwrap();

        let options = read_options(&options_path).unwrap();
        assert!(options.css_modules);
        assert_eq!(options.style_preprocessor_options.include_paths, ["libs/theme"]);

        let build = read_build_options(&build_path).unwrap();
        assert_eq!(build.base_href(), Some("/"));
        assert!(build.source_map_enabled());
    }

    #[test]
    fn test_read_null_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("web.json");
        fs::write(&path, "null").unwrap();

        assert_eq!(read_options(&path).unwrap(), WithWebOptions::default());
    }

    #[test]
    fn test_read_project_graph_both_shapes() {
        let dir = tempdir().unwrap();
        let node = r#"{ "shop": { "name": "shop", "type": "app", "data": { "root": "apps/shop" } } }"#;

        let bare = dir.path().join("bare.json");
        fs::write(&bare, format!(r#"{{ "nodes": {node} }}"#)).unwrap();
        let exported = dir.path().join("exported.json");
        fs::write(&exported, format!(r#"{{ "graph": {{ "nodes": {node} }} }}"#)).unwrap();

        for path in [bare, exported] {
            let graph = read_project_graph(&path).unwrap();
            assert_eq!(graph.project_root("shop").unwrap(), "apps/shop");
        }
    }
}
