//! Layered configuration.
//!
//! A [`ConfigurationBuilder`] merges an ordered list of sources into one
//! immutable key/value tree: base JSON settings file, environment-specific
//! JSON file, process environment variables, and (in development) a local
//! developer secrets file. Later sources override earlier ones, key by key.
//!
//! Keys are colon-separated paths (`Logging:LogLevel:Default`) and are
//! case-insensitive. Environment variables map onto nested keys with `__` as
//! the separator (`LOGGING__LOGLEVEL__DEFAULT`).
//!
//! # Example
//!
//! ```rust,no_run
//! use plume::config::ConfigurationBuilder;
//!
//! let config = ConfigurationBuilder::new(".")
//!     .add_json_file("appsettings.json", true)
//!     .add_json_file("appsettings.Development.json", true)
//!     .add_env_vars()
//!     .build()
//!     .expect("configuration");
//! let conn = config.get("ConnectionStrings:DefaultConnection");
//! ```

pub mod env;

pub use env::{load_dotenv, Environment};

use crate::error::StartupError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::PathBuf;

enum Source {
    JsonFile { path: PathBuf, optional: bool },
    EnvVars,
}

/// Builder assembling the ordered configuration layers.
pub struct ConfigurationBuilder {
    content_root: PathBuf,
    sources: Vec<Source>,
}

impl ConfigurationBuilder {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            sources: Vec::new(),
        }
    }

    /// Add a JSON settings file layer. A missing optional file is skipped;
    /// a present file that fails to parse is fatal either way.
    pub fn add_json_file(mut self, name: &str, optional: bool) -> Self {
        self.sources.push(Source::JsonFile {
            path: self.content_root.join(name),
            optional,
        });
        self
    }

    /// Add the process environment as a layer. `__` in a variable name
    /// separates nested sections.
    pub fn add_env_vars(mut self) -> Self {
        self.sources.push(Source::EnvVars);
        self
    }

    /// Add the local developer secrets file (`secrets.json` under the content
    /// root). Callers gate this on the Development environment.
    pub fn add_dev_secrets(self) -> Self {
        self.add_json_file("secrets.json", true)
    }

    pub fn build(self) -> Result<Configuration, StartupError> {
        let mut root = Value::Object(Map::new());

        for source in self.sources {
            match source {
                Source::JsonFile { path, optional } => {
                    let display = path.display().to_string();
                    let text = match std::fs::read_to_string(&path) {
                        Ok(text) => text,
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound && optional => {
                            continue;
                        }
                        Err(e) => {
                            return Err(StartupError::ConfigIo {
                                path: display,
                                source: e,
                            })
                        }
                    };
                    let layer: Value = serde_json::from_str(&text).map_err(|e| {
                        StartupError::MalformedConfig {
                            path: display,
                            source: e,
                        }
                    })?;
                    merge(&mut root, layer);
                }
                Source::EnvVars => {
                    for (key, value) in std::env::vars() {
                        let segments: Vec<&str> = key.split("__").collect();
                        set_path(&mut root, &segments, Value::String(value));
                    }
                }
            }
        }

        Ok(Configuration { root })
    }
}

/// Immutable configuration tree. Built once at startup; reads need no locks.
#[derive(Debug, Clone)]
pub struct Configuration {
    root: Value,
}

impl Configuration {
    /// Look up a leaf value by colon-separated path, case-insensitively.
    /// Scalar leaves (strings, numbers, booleans) render as strings.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.section(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Like [`get`](Self::get), but absence is a fatal startup error.
    pub fn require(&self, key: &str) -> Result<String, StartupError> {
        self.get(key)
            .ok_or_else(|| StartupError::MissingKey(key.to_string()))
    }

    /// Shorthand for the conventional `ConnectionStrings` section.
    pub fn connection_string(&self, name: &str) -> Option<String> {
        self.get(&format!("ConnectionStrings:{}", name))
    }

    /// Resolve a subtree by colon-separated path.
    pub fn section(&self, key: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in key.split(':') {
            let map = current.as_object()?;
            let (_, value) = map
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(segment))?;
            current = value;
        }
        Some(current)
    }

    /// Bind a section onto a typed settings object via serde.
    pub fn bind<T: DeserializeOwned>(&self, section: &str) -> Result<T, StartupError> {
        let value = self
            .section(section)
            .cloned()
            .ok_or_else(|| StartupError::MissingKey(section.to_string()))?;
        serde_json::from_value(value).map_err(|e| StartupError::Bind {
            section: section.to_string(),
            source: e,
        })
    }
}

/// Deep-merge `layer` into `dest`: objects merge key by key (matched
/// case-insensitively), every other value replaces wholesale.
fn merge(dest: &mut Value, layer: Value) {
    match (dest, layer) {
        (Value::Object(dest_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match find_key_ci(dest_map, &key) {
                    Some(existing) => {
                        if let Some(entry) = dest_map.get_mut(&existing) {
                            merge(entry, value);
                        }
                    }
                    None => {
                        dest_map.insert(key, value);
                    }
                }
            }
        }
        (dest, layer) => *dest = layer,
    }
}

/// Set a leaf at a nested path, creating intermediate objects as needed.
/// Existing non-object values along the path are replaced.
fn set_path(root: &mut Value, segments: &[&str], leaf: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    if let Some(map) = root.as_object_mut() {
        let key = find_key_ci(map, first).unwrap_or_else(|| first.to_string());
        if rest.is_empty() {
            map.insert(key, leaf);
        } else {
            let entry = map.entry(key).or_insert(Value::Null);
            set_path(entry, rest, leaf);
        }
    }
}

fn find_key_ci(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.keys()
        .find(|k| k.eq_ignore_ascii_case(key))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use std::path::Path;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plume-config-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn environment_file_overrides_base_file() {
        let dir = scratch_dir("layering");
        write(
            &dir,
            "appsettings.json",
            r#"{"AppConfiguration": {"Name": "base", "Url": "http://base"}}"#,
        );
        write(
            &dir,
            "appsettings.Development.json",
            r#"{"AppConfiguration": {"Name": "dev"}}"#,
        );

        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", true)
            .add_json_file("appsettings.Development.json", true)
            .build()
            .unwrap();

        assert_eq!(config.get("AppConfiguration:Name").as_deref(), Some("dev"));
        // Keys only present in the base layer survive the merge.
        assert_eq!(
            config.get("AppConfiguration:Url").as_deref(),
            Some("http://base")
        );
    }

    #[test]
    fn env_vars_override_files_and_map_nested_keys() {
        let dir = scratch_dir("envvars");
        write(&dir, "appsettings.json", r#"{"Outer": {"Inner": "file"}}"#);
        std::env::set_var("OUTER__INNER", "process");

        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", true)
            .add_env_vars()
            .build()
            .unwrap();

        assert_eq!(config.get("Outer:Inner").as_deref(), Some("process"));
        std::env::remove_var("OUTER__INNER");
    }

    #[test]
    fn env_only_keys_are_retrievable() {
        std::env::set_var("PLUME_ONLY__VALUE", "42");
        let config = ConfigurationBuilder::new(".").add_env_vars().build().unwrap();
        assert_eq!(config.get("plume_only:value").as_deref(), Some("42"));
        std::env::remove_var("PLUME_ONLY__VALUE");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = scratch_dir("missing");
        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", true)
            .build()
            .unwrap();
        assert_eq!(config.get("Anything"), None);
    }

    #[test]
    fn malformed_present_file_is_fatal() {
        let dir = scratch_dir("malformed");
        write(&dir, "appsettings.json", "{ not json");
        let err = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", true)
            .build()
            .unwrap_err();
        assert!(matches!(err, StartupError::MalformedConfig { .. }));
    }

    #[test]
    fn dev_secrets_layer_wins_over_env_vars() {
        let dir = scratch_dir("secrets");
        write(&dir, "appsettings.json", r#"{"Smtp": {"Password": "file"}}"#);
        write(&dir, "secrets.json", r#"{"Smtp": {"Password": "secret"}}"#);

        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", true)
            .add_env_vars()
            .add_dev_secrets()
            .build()
            .unwrap();
        assert_eq!(config.get("Smtp:Password").as_deref(), Some("secret"));
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let dir = scratch_dir("case");
        write(
            &dir,
            "appsettings.json",
            r#"{"ConnectionStrings": {"DefaultConnection": "sqlite::memory:"}}"#,
        );
        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", false)
            .build()
            .unwrap();
        assert_eq!(
            config.connection_string("defaultconnection").as_deref(),
            Some("sqlite::memory:")
        );
        assert_eq!(
            config.get("connectionstrings:DEFAULTCONNECTION").as_deref(),
            Some("sqlite::memory:")
        );
    }

    #[test]
    fn sections_bind_onto_typed_settings() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "PascalCase")]
        struct SiteSettings {
            name: String,
            posts_per_page: u64,
        }

        let dir = scratch_dir("bind");
        write(
            &dir,
            "appsettings.json",
            r#"{"AppConfiguration": {"Name": "Blog", "PostsPerPage": 5}}"#,
        );
        let config = ConfigurationBuilder::new(&dir)
            .add_json_file("appsettings.json", false)
            .build()
            .unwrap();

        let settings: SiteSettings = config.bind("AppConfiguration").unwrap();
        assert_eq!(
            settings,
            SiteSettings {
                name: "Blog".to_string(),
                posts_per_page: 5
            }
        );
    }

    #[test]
    fn require_missing_key_is_fatal() {
        let config = ConfigurationBuilder::new(".").build().unwrap();
        assert!(matches!(
            config.require("ConnectionStrings:DefaultConnection"),
            Err(StartupError::MissingKey(_))
        ));
    }
}
