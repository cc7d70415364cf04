//! `webcfg env` command implementation.
//!
//! Shows the `process.env.*` replacements a build would inject.

use miette::{IntoDiagnostic, Result};
use std::path::Path;
use webcfg_core::env::client_environment;
use webcfg_core::{LayeredEnv, ProcessEnv};

/// Run the env command.
pub fn run(root: &Path, mode: &str, json: bool) -> Result<()> {
    let env = LayeredEnv::from_env_files(ProcessEnv, root, mode);
    let defines = client_environment(&env);
    tracing::debug!(mode, exposed = defines.len(), "collected client environment");

    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "ok": true,
                "mode": mode,
                "define": defines,
            }))
            .into_diagnostic()?
        );
    } else if defines.is_empty() {
        println!("No public environment variables.");
        println!("hint: variables starting with NX_PUBLIC_ are exposed to the bundle");
    } else {
        for (key, value) in &defines {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}
