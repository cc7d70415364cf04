//! Module rules: which files a rule matches and which loaders process them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Module type assigned by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleType {
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "css/module")]
    CssModule,
    #[serde(rename = "css/auto")]
    CssAuto,
    /// Any other bundler module type (`asset`, `javascript/auto`, ...).
    #[serde(untagged)]
    Other(String),
}

/// A single entry of `module.rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSetRule {
    /// Regular expression source matched against the resource path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(
        rename = "use",
        default,
        deserialize_with = "deserialize_uses",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub uses: Vec<RuleUse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleSetRule {
    /// Create a rule matching `test`.
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: Some(test.into()),
            ..Default::default()
        }
    }

    /// Set the module type.
    #[must_use]
    pub fn with_type(mut self, rule_type: Option<RuleType>) -> Self {
        self.rule_type = rule_type;
        self
    }

    /// Append a loader.
    #[must_use]
    pub fn with_loader(mut self, loader: impl Into<String>, options: Option<LoaderOptions>) -> Self {
        self.uses.push(RuleUse {
            loader: loader.into(),
            options,
            extra: Map::new(),
        });
        self
    }

    /// A rule with neither a type nor loaders has no effect.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.rule_type.is_none() && self.uses.is_empty()
    }
}

/// An entry of `module.rules`.
///
/// An entry is typed only when [`RuleSetRule`] reproduces it exactly. Rule
/// references (`"..."`), non-string conditions and any other shape are kept
/// verbatim as [`RuleEntry::Raw`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Rule(RuleSetRule),
    Raw(Value),
}

impl RuleEntry {
    /// The typed rule, if this entry has one.
    #[must_use]
    pub fn as_rule(&self) -> Option<&RuleSetRule> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Raw(_) => None,
        }
    }
}

impl From<RuleSetRule> for RuleEntry {
    fn from(rule: RuleSetRule) -> Self {
        Self::Rule(rule)
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let lossless = serde_json::from_value::<RuleSetRule>(raw.clone())
            .ok()
            .filter(|rule| serde_json::to_value(rule).is_ok_and(|value| value == raw));

        Ok(lossless.map_or(Self::Raw(raw), Self::Rule))
    }
}

/// One loader applied by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleUse {
    /// Resolved loader reference.
    pub loader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LoaderOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<String> for RuleUse {
    fn from(loader: String) -> Self {
        Self {
            loader,
            options: None,
            extra: Map::new(),
        }
    }
}

/// `use` accepts a loader name, a single entry, or a list of either.
fn deserialize_uses<'de, D>(deserializer: D) -> Result<Vec<RuleUse>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Name(String),
        Full(RuleUse),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Entry),
        Many(Vec<Entry>),
    }

    let entries = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(entry) => vec![entry],
        OneOrMany::Many(entries) => entries,
    };

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Name(name) => RuleUse::from(name),
            Entry::Full(full) => full,
        })
        .collect())
}

/// Loader options. Shapes webcfg emits are typed; anything else stays raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderOptions {
    Sass(SassLoaderOptions),
    Less(LessLoaderOptions),
    Stylus(StylusLoaderOptions),
    Other(Value),
}

/// `sass-loader` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SassLoaderOptions {
    pub source_map: bool,
    pub sass_options: SassOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SassOptions {
    pub fiber: bool,
    /// Decimal precision of generated numbers.
    pub precision: u32,
    pub include_paths: Vec<PathBuf>,
}

/// `less-loader` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LessLoaderOptions {
    pub source_map: bool,
    pub less_options: LessOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LessOptions {
    /// Allow inline JavaScript evaluation in LESS expressions.
    pub javascript_enabled: bool,
    /// Import search paths; the key is absent when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathBuf>>,
}

/// `stylus-loader` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StylusLoaderOptions {
    pub source_map: bool,
    pub stylus_options: StylusOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StylusOptions {
    pub include: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_type_known_and_other() {
        let css: RuleType = serde_json::from_value(json!("css/module")).unwrap();
        assert_eq!(css, RuleType::CssModule);

        let asset: RuleType = serde_json::from_value(json!("asset/resource")).unwrap();
        assert_eq!(asset, RuleType::Other("asset/resource".to_string()));
        assert_eq!(serde_json::to_value(&asset).unwrap(), json!("asset/resource"));
    }

    #[test]
    fn test_use_accepts_string_and_list() {
        let rule: RuleSetRule = serde_json::from_value(json!({
            "test": "\\.tsx?$",
            "use": "builtin:swc-loader"
        }))
        .unwrap();
        assert_eq!(rule.uses.len(), 1);
        assert_eq!(rule.uses[0].loader, "builtin:swc-loader");

        let rule: RuleSetRule = serde_json::from_value(json!({
            "test": "\\.svg$",
            "use": ["svgo-loader", { "loader": "url-loader", "options": { "limit": 8192 } }]
        }))
        .unwrap();
        assert_eq!(rule.uses.len(), 2);
        assert_eq!(
            rule.uses[1].options,
            Some(LoaderOptions::Other(json!({ "limit": 8192 })))
        );
    }

    #[test]
    fn test_unknown_rule_keys_preserved() {
        let raw = json!({
            "test": "\\.png$",
            "type": "asset",
            "exclude": "node_modules"
        });
        let rule: RuleSetRule = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(rule.extra["exclude"], "node_modules");
        assert_eq!(serde_json::to_value(&rule).unwrap(), raw);
    }

    #[test]
    fn test_loader_options_with_extra_keys_stay_raw() {
        let raw = json!({
            "sourceMap": true,
            "sassOptions": { "fiber": false, "precision": 8, "includePaths": [] },
            "additionalData": "$env: prod;"
        });
        let options: LoaderOptions = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(options, LoaderOptions::Other(raw));
    }

    #[test]
    fn test_less_options_omit_empty_paths() {
        let options = LessOptions {
            javascript_enabled: true,
            paths: None,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "javascriptEnabled": true })
        );
    }

    #[test]
    fn test_rule_entry_typed_when_lossless() {
        let raw = json!({ "test": "\\.png$", "type": "asset", "exclude": "node_modules" });
        let entry: RuleEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            entry.as_rule().unwrap().rule_type,
            Some(RuleType::Other("asset".to_string()))
        );
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_rule_entry_keeps_other_shapes_verbatim() {
        let shapes = [
            json!("..."),
            json!({ "test": ["\\.js$", "\\.mjs$"], "use": "x" }),
            json!({ "test": { "and": ["\\.js$"], "not": ["vendor"] }, "type": "javascript/auto" }),
            json!({ "test": "\\.js$", "use": [] }),
            json!({ "test": "\\.ts$", "use": "builtin:swc-loader" }),
        ];

        for raw in shapes {
            let entry: RuleEntry = serde_json::from_value(raw.clone()).unwrap();
            assert!(entry.as_rule().is_none(), "{raw} should stay raw");
            assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
        }
    }

    #[test]
    fn test_inert_rule() {
        assert!(RuleSetRule::new("\\.css$").is_inert());
        assert!(!RuleSetRule::new("\\.css$")
            .with_type(Some(RuleType::Css))
            .is_inert());
        assert!(!RuleSetRule::new("\\.css$")
            .with_loader("postcss-loader", None)
            .is_inert());
    }
}
