//! Bundler configuration model.
//!
//! Typed view of an rspack/webpack-style build configuration. Only the keys
//! webcfg reads or writes are typed; every other key is carried verbatim in
//! the `extra` maps so arbitrary configurations round-trip through JSON.
//!
//! ## Example
//!
//! ```ignore
//! let config: Configuration = serde_json::from_str(r#"{
//!   "mode": "development",
//!   "entry": "./src/main.tsx",
//!   "module": { "rules": [] },
//!   "plugins": []
//! }"#)?;
//! ```

mod plugin;
mod rule;

pub use plugin::{BaseHref, ExternalPlugin, HtmlPluginOptions, Plugin};
pub use rule::{
    LessLoaderOptions, LessOptions, LoaderOptions, RuleEntry, RuleSetRule, RuleType, RuleUse,
    SassLoaderOptions, SassOptions, StylusLoaderOptions, StylusOptions,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
    None,
}

impl Mode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::None => "none",
        }
    }
}

/// A bundler build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiments: Option<Experiments>,
    #[serde(default)]
    pub module: ModuleOptions,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    /// Keys webcfg does not interpret (`entry`, `output`, `resolve`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `module` section: processing rules plus untyped settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleOptions {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Experimental bundler features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experiments {
    /// Native CSS support (required for `css` and `css/module` rule types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
