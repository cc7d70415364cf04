//! Web configuration augmenter.
//!
//! Adds what a browser application build needs on top of a base bundler
//! configuration:
//!
//! 1. **Styles** - one rule per stylesheet dialect (see [`styles`])
//! 2. **HTML** - an `HtmlRspackPlugin` for the index document
//! 3. **Environment** - `NODE_ENV` for the build mode, and every public
//!    `NX_PUBLIC_*` variable as a `process.env.*` define
//!
//! ## Usage
//!
//! ```ignore
//! use webcfg_core::web::{WithWeb, WithWebOptions};
//! use webcfg_core::{env::ProcessEnv, loader::BareLoaderResolver};
//!
//! let with_web = WithWeb::new(WithWebOptions { css_modules: true, ..Default::default() });
//! let config = with_web.apply(&base, &shared, &ProcessEnv, &BareLoaderResolver)?;
//! ```

pub mod styles;

use crate::bundler::{BaseHref, Configuration, HtmlPluginOptions, Mode, Plugin, RuleEntry};
use crate::env::{client_environment, EnvSource};
use crate::error::Error;
use crate::loader::LoaderResolver;
use crate::project::{BuildOptions, SharedConfigContext};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use webcfg_util::path::{join, resolve};

pub use styles::{style_rules, StyleDialect, StyleSettings};

/// Template used when the build names no `indexHtml`.
pub const DEFAULT_INDEX_HTML: &str = "src/index.html";

/// Options of the web augmenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithWebOptions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub style_preprocessor_options: StylePreprocessorOptions,
    /// Treat `.css`, `.scss`/`.sass` and `.less` files as CSS Modules.
    #[serde(default, deserialize_with = "null_as_default")]
    pub css_modules: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreprocessorOptions {
    /// Workspace-relative import paths for preprocessors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub include_paths: Vec<String>,
}

/// Options left unset come through as `null`; treat them like missing keys.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WithWebOptions {
    /// Include paths resolved against the workspace root, in order.
    #[must_use]
    pub fn resolved_include_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.style_preprocessor_options
            .include_paths
            .iter()
            .map(|path| resolve(root, path))
            .collect()
    }
}

/// A reusable web augmenter: options captured once, applied to any build.
#[derive(Debug, Clone, Default)]
pub struct WithWeb {
    options: WithWebOptions,
}

impl WithWeb {
    #[must_use]
    pub fn new(options: WithWebOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &WithWebOptions {
        &self.options
    }

    /// Apply to `config`; see [`augment`].
    pub fn apply(
        &self,
        config: &Configuration,
        shared: &SharedConfigContext,
        env: &dyn EnvSource,
        loaders: &dyn LoaderResolver,
    ) -> Result<Configuration, Error> {
        augment(config, &self.options, shared, env, loaders)
    }
}

/// Whether the build is a production build.
///
/// True when `NODE_ENV` is `production` or the build mode is production.
#[must_use]
pub fn is_production(options: &BuildOptions, env: &dyn EnvSource) -> bool {
    env.var("NODE_ENV").as_deref() == Some("production") || options.mode == Some(Mode::Production)
}

/// Return a copy of `config` with style rules and web plugins appended.
///
/// Existing rules and plugins keep their order and come first. `experiments.css`
/// is switched on; other experiments are kept. `config` itself is not modified.
///
/// # Errors
/// [`Error::ProjectNotFound`] if the active project is not in the project graph.
pub fn augment(
    config: &Configuration,
    options: &WithWebOptions,
    shared: &SharedConfigContext,
    env: &dyn EnvSource,
    loaders: &dyn LoaderResolver,
) -> Result<Configuration, Error> {
    let build = &shared.options;
    let context = &shared.context;

    let project_root = join(
        &context.root,
        context.project_graph.project_root(&context.project_name)?,
    );
    let production = is_production(build, env);

    let settings = StyleSettings {
        css_modules: options.css_modules,
        source_map: build.source_map_enabled(),
        include_paths: options.resolved_include_paths(&context.root),
    };

    let mut module = config.module.clone();
    module
        .rules
        .extend(style_rules(&settings, loaders).into_iter().map(RuleEntry::from));

    let mut plugins = config.plugins.clone();
    plugins.push(html_plugin(build, &context.root, &project_root));
    plugins.push(Plugin::Environment(node_env(production)));
    plugins.push(Plugin::Define(client_environment(env)));

    let mut experiments = config.experiments.clone().unwrap_or_default();
    experiments.css = Some(true);

    Ok(Configuration {
        experiments: Some(experiments),
        module,
        plugins,
        ..config.clone()
    })
}

fn html_plugin(build: &BuildOptions, root: &Path, project_root: &Path) -> Plugin {
    let template = match build.index_html() {
        Some(index_html) => join(root, index_html),
        None => join(project_root, DEFAULT_INDEX_HTML),
    };

    Plugin::Html(HtmlPluginOptions {
        template,
        base: build.base_href().map(|href| BaseHref {
            href: href.to_string(),
        }),
        extra: Map::new(),
    })
}

fn node_env(production: bool) -> BTreeMap<String, String> {
    let mode = if production {
        Mode::Production
    } else {
        Mode::Development
    };
    BTreeMap::from([("NODE_ENV".to_string(), mode.as_str().to_string())])
}
