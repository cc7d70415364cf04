//! Environment variables as an injected, read-only source.
//!
//! The augmenter never reads `std::env` directly; it asks an [`EnvSource`].
//! [`ProcessEnv`] is the real process environment, plain maps serve tests,
//! and [`LayeredEnv`] overlays `.env` files under another source.
//!
//! `.env` files are loaded in this order, later files overriding earlier ones:
//! `.env`, `.env.local`, `.env.[mode]`, `.env.[mode].local`.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::Path;

/// Prefix of variables exposed to client bundles (matched case-insensitively).
pub const PUBLIC_ENV_PREFIX: &str = "NX_PUBLIC_";

/// A read-only view of environment variables.
pub trait EnvSource {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// All variables, in no particular order.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        // Non-UTF-8 entries are skipped rather than panicking like `std::env::vars`.
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// `.env` file values layered under a base source.
///
/// Variables already set in the base win; file values only fill gaps.
#[derive(Debug, Clone)]
pub struct LayeredEnv<E> {
    base: E,
    files: HashMap<String, String>,
}

impl<E: EnvSource> LayeredEnv<E> {
    #[must_use]
    pub fn new(base: E, files: HashMap<String, String>) -> Self {
        Self { base, files }
    }

    /// Layer the `.env` files of `root` for `mode` under `base`.
    #[must_use]
    pub fn from_env_files(base: E, root: &Path, mode: &str) -> Self {
        Self::new(base, load_env_files(root, mode))
    }

    /// Number of variables that came from files and are not shadowed.
    #[must_use]
    pub fn file_var_count(&self) -> usize {
        self.files
            .keys()
            .filter(|key| self.base.var(key).is_none())
            .count()
    }
}

impl<E: EnvSource> EnvSource for LayeredEnv<E> {
    fn var(&self, key: &str) -> Option<String> {
        self.base.var(key).or_else(|| self.files.get(key).cloned())
    }

    fn vars(&self) -> Vec<(String, String)> {
        let mut vars = self.base.vars();
        for (key, value) in &self.files {
            if self.base.var(key).is_none() {
                vars.push((key.clone(), value.clone()));
            }
        }
        vars
    }
}

/// Parse a `.env` file's contents into key-value pairs.
///
/// Supports:
/// - `KEY=value` (unquoted)
/// - `KEY="value"` (double-quoted, with escape sequences)
/// - `KEY='value'` (single-quoted, literal)
/// - Comments (`#`) and blank lines are skipped
/// - Inline comments after unquoted values
/// - A leading `export `
#[must_use]
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    content.lines().filter_map(parse_env_line).collect()
}

fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, raw_value) = line.split_once('=')?;
    let key = key.trim();
    let key = key.strip_prefix("export ").unwrap_or(key).trim();
    if key.is_empty() {
        return None;
    }

    let raw_value = raw_value.trim();
    let value = if let Some(inner) = raw_value.strip_prefix('"') {
        unescape_double_quoted(inner)
    } else if let Some(inner) = raw_value.strip_prefix('\'') {
        // Literal up to the closing quote, or the rest if unterminated.
        inner.split('\'').next().unwrap_or_default().to_string()
    } else {
        match raw_value.find(" #") {
            Some(pos) => raw_value[..pos].trim_end().to_string(),
            None => raw_value.to_string(),
        }
    };

    Some((key.to_string(), value))
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => {}
            },
            _ => result.push(c),
        }
    }

    result
}

/// Load the `.env` files of `root` for `mode`, merged in precedence order.
///
/// Missing or unreadable files are skipped.
#[must_use]
pub fn load_env_files(root: &Path, mode: &str) -> HashMap<String, String> {
    let files = [
        root.join(".env"),
        root.join(".env.local"),
        root.join(format!(".env.{mode}")),
        root.join(format!(".env.{mode}.local")),
    ];

    let mut env = HashMap::new();
    for file in &files {
        if let Ok(content) = std::fs::read_to_string(file) {
            env.extend(parse_env_file(&content));
        }
    }
    env
}

/// Whether `key` starts with [`PUBLIC_ENV_PREFIX`], ignoring ASCII case.
#[must_use]
pub fn is_public_var(key: &str) -> bool {
    key.get(..PUBLIC_ENV_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PUBLIC_ENV_PREFIX))
}

/// Compile-time replacements exposing public variables to client code.
///
/// Each public variable `NAME` maps `process.env.NAME` to its value as a JSON
/// string literal. Other variables are never exposed.
#[must_use]
pub fn client_environment(env: &dyn EnvSource) -> BTreeMap<String, String> {
    env.vars()
        .into_iter()
        .filter(|(key, _)| is_public_var(key))
        .map(|(key, value)| {
            (
                format!("process.env.{key}"),
                serde_json::Value::String(value).to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_basic_key_value() {
        let env = parse_env_file("KEY=value\nOTHER=123");
        assert_eq!(env.get("KEY").unwrap(), "value");
        assert_eq!(env.get("OTHER").unwrap(), "123");
    }

    #[test]
    fn test_parse_double_quoted_escapes() {
        let env = parse_env_file(r#"KEY="line1\nline2\ttab\\backslash""#);
        assert_eq!(env.get("KEY").unwrap(), "line1\nline2\ttab\\backslash");
    }

    #[test]
    fn test_parse_single_quoted_is_literal() {
        let env = parse_env_file(r"KEY='hello\nworld' # trailing");
        assert_eq!(env.get("KEY").unwrap(), r"hello\nworld");
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let env = parse_env_file("# comment\n\nKEY=value # inline\n  # another\nNOEQUALS\n=nokey");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("KEY").unwrap(), "value");
    }

    #[test]
    fn test_parse_export_prefix_and_equals_in_value() {
        let env = parse_env_file("export NX_PUBLIC_QUERY=a=b=c\nEMPTY=");
        assert_eq!(env.get("NX_PUBLIC_QUERY").unwrap(), "a=b=c");
        assert_eq!(env.get("EMPTY").unwrap(), "");
    }

    #[test]
    fn test_load_env_files_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::write(root.join(".env"), "NX_PUBLIC_A=base\nNX_PUBLIC_B=base").unwrap();
        std::fs::write(root.join(".env.local"), "NX_PUBLIC_A=local").unwrap();
        std::fs::write(root.join(".env.production"), "NX_PUBLIC_A=prod").unwrap();
        std::fs::write(root.join(".env.production.local"), "NX_PUBLIC_A=prod_local").unwrap();

        let env = load_env_files(root, "production");
        assert_eq!(env.get("NX_PUBLIC_A").unwrap(), "prod_local");
        assert_eq!(env.get("NX_PUBLIC_B").unwrap(), "base");
    }

    #[test]
    fn test_load_env_files_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_files(dir.path(), "development").is_empty());
    }

    #[test]
    fn test_layered_env_base_wins() {
        let base = env(&[("NX_PUBLIC_API", "from_process")]);
        let files = env(&[("NX_PUBLIC_API", "from_file"), ("NX_PUBLIC_FLAG", "on")]);
        let layered = LayeredEnv::new(base, files);

        assert_eq!(layered.var("NX_PUBLIC_API").unwrap(), "from_process");
        assert_eq!(layered.var("NX_PUBLIC_FLAG").unwrap(), "on");
        assert_eq!(layered.file_var_count(), 1);

        let mut vars = layered.vars();
        vars.sort();
        assert_eq!(
            vars,
            vec![
                ("NX_PUBLIC_API".to_string(), "from_process".to_string()),
                ("NX_PUBLIC_FLAG".to_string(), "on".to_string()),
            ]
        );
    }

    #[test]
    fn test_is_public_var_case_insensitive() {
        assert!(is_public_var("NX_PUBLIC_API_URL"));
        assert!(is_public_var("nx_public_api_url"));
        assert!(!is_public_var("NX_PUBLI"));
        assert!(!is_public_var("SECRET_KEY"));
        assert!(!is_public_var("MY_NX_PUBLIC_X"));
    }

    #[test]
    fn test_client_environment_filters_and_stringifies() {
        let env = env(&[
            ("NX_PUBLIC_API_URL", "http://x"),
            ("nx_public_lower", "1"),
            ("SECRET_KEY", "hunter2"),
            ("NODE_ENV", "production"),
        ]);

        let defines = client_environment(&env);
        assert_eq!(defines.len(), 2);
        assert_eq!(
            defines.get("process.env.NX_PUBLIC_API_URL").unwrap(),
            "\"http://x\""
        );
        assert_eq!(defines.get("process.env.nx_public_lower").unwrap(), "\"1\"");
        assert!(!defines.contains_key("process.env.SECRET_KEY"));
        assert!(!defines.contains_key("process.env.NODE_ENV"));
    }

    #[test]
    fn test_client_environment_escapes_special_chars() {
        let env = env(&[("NX_PUBLIC_MSG", "say \"hi\"\n")]);
        let defines = client_environment(&env);
        assert_eq!(
            defines.get("process.env.NX_PUBLIC_MSG").unwrap(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    #[serial]
    fn test_process_env_reads_current_process() {
        std::env::set_var("NX_PUBLIC_WEBCFG_TEST", "yes");

        assert_eq!(ProcessEnv.var("NX_PUBLIC_WEBCFG_TEST").unwrap(), "yes");
        let defines = client_environment(&ProcessEnv);
        assert_eq!(
            defines.get("process.env.NX_PUBLIC_WEBCFG_TEST").unwrap(),
            "\"yes\""
        );

        std::env::remove_var("NX_PUBLIC_WEBCFG_TEST");
        assert!(ProcessEnv.var("NX_PUBLIC_WEBCFG_TEST").is_none());
    }
}
