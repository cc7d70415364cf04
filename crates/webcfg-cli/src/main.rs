#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use webcfg_core::paths::workspace_root;
use webcfg_core::Config;

#[derive(Parser, Debug)]
#[command(name = "webcfg")]
#[command(author, version, about = "Augment bundler configurations for web applications", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Append style rules and web plugins to a bundler configuration
    Augment {
        /// Base bundler configuration (JSON)
        #[arg(long, short = 'c', value_name = "FILE")]
        config: PathBuf,

        /// Project graph (JSON, bare or exported form)
        #[arg(long, short = 'g', value_name = "FILE")]
        graph: PathBuf,

        /// Name of the project being built
        #[arg(long, short = 'p')]
        project: String,

        /// Web options (JSON: stylePreprocessorOptions, cssModules)
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Build target options (JSON: mode, sourceMap, indexHtml, baseHref)
        #[arg(long, value_name = "FILE")]
        build_options: Option<PathBuf>,

        /// Treat .css, .scss/.sass and .less files as CSS Modules
        #[arg(long)]
        css_modules: bool,

        /// Preprocessor include path, relative to the workspace root (repeatable)
        #[arg(long = "include-path", value_name = "PATH")]
        include_paths: Vec<String>,

        /// Build mode: development, production, or none
        #[arg(long)]
        mode: Option<String>,

        /// Generate source maps in style loaders
        #[arg(long)]
        source_map: bool,

        /// HTML template, relative to the workspace root
        #[arg(long, value_name = "PATH")]
        index_html: Option<String>,

        /// Base href of the generated document
        #[arg(long)]
        base_href: Option<String>,

        /// Mode whose .env files are loaded (defaults to the build mode)
        #[arg(long)]
        env_mode: Option<String>,

        /// Reference loaders by their node_modules path
        #[arg(long)]
        resolve_loaders: bool,

        /// Output file (if not specified, prints to stdout)
        #[arg(long, short = 'o')]
        outfile: Option<PathBuf>,
    },

    /// Show the process.env replacements a build would inject
    Env {
        /// Mode whose .env files are loaded
        #[arg(long, default_value = "development")]
        env_mode: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = match cli.cwd {
        Some(cwd) => cwd.canonicalize().into_diagnostic()?,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    let root = workspace_root(&config.cwd).unwrap_or_else(|| config.cwd.clone());
    tracing::debug!(root = %root.display(), "workspace root");

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Augment {
            config,
            graph,
            project,
            options,
            build_options,
            css_modules,
            include_paths,
            mode,
            source_map,
            index_html,
            base_href,
            env_mode,
            resolve_loaders,
            outfile,
        }) => {
            let mode = match mode {
                Some(m) => Some(commands::augment::parse_mode(&m).ok_or_else(|| {
                    miette::miette!(
                        "Invalid mode: {}. Use development, production, or none.",
                        m
                    )
                })?),
                None => None,
            };

            // File arguments are relative to the invocation directory.
            let absolute = |p: PathBuf| if p.is_absolute() { p } else { cwd.join(p) };

            let action = commands::augment::AugmentAction {
                root,
                config: absolute(config),
                graph: absolute(graph),
                project,
                options: options.map(absolute),
                build_options: build_options.map(absolute),
                css_modules,
                include_paths,
                mode,
                source_map,
                index_html,
                base_href,
                env_mode,
                resolve_loaders,
                outfile: outfile.map(absolute),
            };

            let span = tracing::info_span!("augment", cmd = "augment", cwd = %cwd.display());
            let _guard = span.enter();
            commands::augment::run(action, cli.json)
        }
        Some(Commands::Env { env_mode }) => commands::env::run(&root, &env_mode, cli.json),
    }
}
