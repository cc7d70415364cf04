//! Build plugins as configuration data.
//!
//! A plugin is serialized as `{ "plugin": "<constructor>", "options": ... }`,
//! the shape a JS-side shim turns into `new rspack[plugin](options)`. The
//! constructors webcfg emits are typed; any other plugin, or a known one with
//! options webcfg does not model, is carried as [`ExternalPlugin`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

const HTML_PLUGIN: &str = "HtmlRspackPlugin";
const ENVIRONMENT_PLUGIN: &str = "EnvironmentPlugin";
const DEFINE_PLUGIN: &str = "DefinePlugin";

/// A build plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlugin", into = "RawPlugin")]
pub enum Plugin {
    /// Generates the HTML entry document.
    Html(HtmlPluginOptions),
    /// Default values for `process.env.*` keys.
    Environment(BTreeMap<String, String>),
    /// Compile-time replacements: expression → JS source.
    Define(BTreeMap<String, String>),
    External(ExternalPlugin),
}

impl Plugin {
    /// Constructor name of this plugin.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Html(_) => HTML_PLUGIN,
            Self::Environment(_) => ENVIRONMENT_PLUGIN,
            Self::Define(_) => DEFINE_PLUGIN,
            Self::External(ext) => &ext.name,
        }
    }
}

/// `HtmlRspackPlugin` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlPluginOptions {
    /// Template document.
    pub template: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BaseHref>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `<base href>` of the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseHref {
    pub href: String,
}

/// A plugin webcfg passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPlugin {
    pub name: String,
    pub options: Value,
}

#[derive(Serialize, Deserialize)]
struct RawPlugin {
    plugin: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    options: Value,
}

impl From<RawPlugin> for Plugin {
    fn from(raw: RawPlugin) -> Self {
        let typed = match raw.plugin.as_str() {
            HTML_PLUGIN => serde_json::from_value(raw.options.clone())
                .ok()
                .map(Plugin::Html),
            ENVIRONMENT_PLUGIN => serde_json::from_value(raw.options.clone())
                .ok()
                .map(Plugin::Environment),
            DEFINE_PLUGIN => serde_json::from_value(raw.options.clone())
                .ok()
                .map(Plugin::Define),
            _ => None,
        };

        typed.unwrap_or(Plugin::External(ExternalPlugin {
            name: raw.plugin,
            options: raw.options,
        }))
    }
}

impl From<Plugin> for RawPlugin {
    fn from(plugin: Plugin) -> Self {
        let plugin_name = plugin.name().to_string();
        // Only a non-UTF-8 template path fails here.
        let options = match plugin {
            Plugin::Html(options) => serde_json::to_value(options).unwrap_or(Value::Null),
            Plugin::Environment(values) | Plugin::Define(values) => {
                Value::Object(values.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
            }
            Plugin::External(ext) => ext.options,
        };

        Self {
            plugin: plugin_name,
            options,
        }
    }
}
