//! `webcfg augment` command implementation.
//!
//! Loads a base bundler configuration, the project graph and the web options,
//! applies the web augmenter, and writes the resulting configuration.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use webcfg_core::bundler::{Configuration, Mode};
use webcfg_core::load::{read_build_options, read_configuration, read_options, read_project_graph};
use webcfg_core::project::{ExecutorContext, SourceMapOption};
use webcfg_core::web::is_production;
use webcfg_core::{
    BareLoaderResolver, BuildOptions, Error, LayeredEnv, LoaderResolver, NodeModulesLoaderResolver,
    ProcessEnv, SharedConfigContext, WithWeb, WithWebOptions,
};
use webcfg_util::fs::atomic_write;

/// Augment command action.
#[derive(Debug, Clone)]
pub struct AugmentAction {
    /// Workspace root.
    pub root: PathBuf,
    /// Base bundler configuration (JSON).
    pub config: PathBuf,
    /// Project graph (JSON).
    pub graph: PathBuf,
    /// Project being built.
    pub project: String,
    /// Web options file (JSON).
    pub options: Option<PathBuf>,
    /// Build target options file (JSON).
    pub build_options: Option<PathBuf>,
    /// Force CSS Modules on.
    pub css_modules: bool,
    /// Extra preprocessor include paths, appended to the options file's.
    pub include_paths: Vec<String>,
    /// Build mode override.
    pub mode: Option<Mode>,
    /// Enable source maps.
    pub source_map: bool,
    /// HTML template override (workspace-relative).
    pub index_html: Option<String>,
    /// Base href override.
    pub base_href: Option<String>,
    /// Mode whose `.env` files are loaded.
    pub env_mode: Option<String>,
    /// Point loaders at `<root>/node_modules`.
    pub resolve_loaders: bool,
    /// Output file (if None, prints to stdout).
    pub outfile: Option<PathBuf>,
}

/// JSON output for augment command.
#[derive(Serialize)]
struct AugmentResultJson {
    ok: bool,
    project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    production: Option<bool>,
    rules_added: usize,
    plugins_added: usize,
    duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    outfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Configuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<AugmentErrorJson>,
}

#[derive(Serialize)]
struct AugmentErrorJson {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

struct Augmented {
    config: Configuration,
    production: bool,
    rules_added: usize,
    plugins_added: usize,
}

/// Run the augment command.
pub fn run(action: AugmentAction, json: bool) -> Result<()> {
    let start = Instant::now();
    let result = augment_from_files(&action);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(augmented) => {
            if let Some(ref outfile) = action.outfile {
                let bytes = serde_json::to_vec_pretty(&augmented.config).into_diagnostic()?;
                atomic_write(outfile, &bytes).into_diagnostic()?;
                tracing::debug!(outfile = %outfile.display(), bytes = bytes.len(), "wrote configuration");
            }

            if json {
                let json_result = AugmentResultJson {
                    ok: true,
                    project: action.project.clone(),
                    production: Some(augmented.production),
                    rules_added: augmented.rules_added,
                    plugins_added: augmented.plugins_added,
                    duration_ms,
                    outfile: action.outfile.as_ref().map(|p| p.display().to_string()),
                    config: action.outfile.is_none().then_some(augmented.config),
                    error: None,
                };
                println!("{}", serde_json::to_string(&json_result).into_diagnostic()?);
            } else if let Some(ref outfile) = action.outfile {
                println!(
                    "  {} -> {} (+{} rules, +{} plugins, {}, {}ms)",
                    action.project,
                    outfile.display(),
                    augmented.rules_added,
                    augmented.plugins_added,
                    if augmented.production {
                        "production"
                    } else {
                        "development"
                    },
                    duration_ms
                );
            } else {
                let pretty = serde_json::to_string_pretty(&augmented.config).into_diagnostic()?;
                println!("{pretty}");
            }

            Ok(())
        }
        Err(e) => {
            if json {
                let json_result = AugmentResultJson {
                    ok: false,
                    project: action.project.clone(),
                    production: None,
                    rules_added: 0,
                    plugins_added: 0,
                    duration_ms,
                    outfile: action.outfile.as_ref().map(|p| p.display().to_string()),
                    config: None,
                    error: Some(AugmentErrorJson {
                        code: e.code().to_string(),
                        message: e.to_string(),
                        path: e.path().map(|p| p.display().to_string()),
                    }),
                };
                println!("{}", serde_json::to_string(&json_result).into_diagnostic()?);
            } else {
                eprintln!("error: {e}");
                if matches!(e, Error::ProjectNotFound { .. }) {
                    eprintln!("hint: check --project against the nodes of {}", action.graph.display());
                }
            }
            std::process::exit(1);
        }
    }
}

fn augment_from_files(action: &AugmentAction) -> Result<Augmented, Error> {
    let root = &action.root;
    let base = read_configuration(&action.config)?;
    let project_graph = read_project_graph(&action.graph)?;

    let mut options = match &action.options {
        Some(path) => read_options(path)?,
        None => WithWebOptions::default(),
    };
    options.css_modules |= action.css_modules;
    options
        .style_preprocessor_options
        .include_paths
        .extend(action.include_paths.iter().cloned());

    let mut build = match &action.build_options {
        Some(path) => read_build_options(path)?,
        None => BuildOptions::default(),
    };
    apply_build_overrides(&mut build, action);

    let env_mode = action
        .env_mode
        .clone()
        .unwrap_or_else(|| build.mode.unwrap_or(Mode::Development).as_str().to_string());
    let env = LayeredEnv::from_env_files(ProcessEnv, root, &env_mode);
    tracing::debug!(mode = %env_mode, file_vars = env.file_var_count(), "loaded .env files");

    let loaders: Box<dyn LoaderResolver> = if action.resolve_loaders {
        Box::new(NodeModulesLoaderResolver::new(root.clone()))
    } else {
        Box::new(BareLoaderResolver)
    };

    let shared = SharedConfigContext {
        options: build,
        context: ExecutorContext {
            root: root.clone(),
            project_graph,
            project_name: action.project.clone(),
        },
    };
    let production = is_production(&shared.options, &env);

    tracing::info!(
        project = %action.project,
        production,
        css_modules = options.css_modules,
        "augmenting configuration"
    );

    let config = WithWeb::new(options).apply(&base, &shared, &env, loaders.as_ref())?;

    Ok(Augmented {
        rules_added: config.module.rules.len() - base.module.rules.len(),
        plugins_added: config.plugins.len() - base.plugins.len(),
        production,
        config,
    })
}

fn apply_build_overrides(build: &mut BuildOptions, action: &AugmentAction) {
    if let Some(mode) = action.mode {
        build.mode = Some(mode);
    }
    if action.source_map {
        build.source_map = Some(SourceMapOption::Enabled(true));
    }
    if let Some(ref index_html) = action.index_html {
        build.index_html = Some(index_html.clone());
    }
    if let Some(ref base_href) = action.base_href {
        build.base_href = Some(base_href.clone());
    }
}

/// Parse a `--mode` value.
pub fn parse_mode(s: &str) -> Option<Mode> {
    match s.to_lowercase().as_str() {
        "development" | "dev" => Some(Mode::Development),
        "production" | "prod" => Some(Mode::Production),
        "none" => Some(Mode::None),
        _ => None,
    }
}
