//! Configuration loading and discovery.
//!
//! Sources are merged with figment, lowest precedence first:
//! 1. Defaults
//! 2. User config: `~/.config/unjargon/config.<ext>`
//! 3. Project config: `.unjargon.<ext>` then `unjargon.<ext>`, in the
//!    closest directory (walking up from the search root) that has any
//! 4. Files passed to [`ConfigLoader::with_file`], in order
//! 5. `UNJARGON_*` environment variables
//!
//! Where `<ext>` is one of `toml`, `yaml`, `yml`, `json`. When several files
//! share a directory they are all merged, later extensions winning.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use unjargon_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! let settings = config.activation_settings();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::activation::ActivationSettings;
use crate::error::{ConfigError, ConfigResult};

/// Effective configuration.
///
/// The page settings are optional here so that an unset value can be told
/// apart from an explicit one; [`Config::activation_settings`] fills in the
/// defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the stderr and file layers.
    pub log_level: LogLevel,
    /// Directory for JSONL log files.
    pub log_dir: Option<Utf8PathBuf>,
    /// JSON dictionary to use instead of the bundled one.
    pub dictionary_path: Option<Utf8PathBuf>,
    /// Master switch. Unset means enabled.
    pub enabled: Option<bool>,
    /// Show tooltips. Unset means yes.
    pub show_tooltips: Option<bool>,
    /// Style markers by severity. Unset means yes.
    pub highlight_jargon: Option<bool>,
    /// URL substrings that always activate.
    pub whitelist_sites: Vec<String>,
    /// URL substrings that never activate.
    pub blacklist_sites: Vec<String>,
    /// Largest HTML input accepted, in bytes.
    ///
    /// Defaults to [`DEFAULT_MAX_INPUT_BYTES`](crate::DEFAULT_MAX_INPUT_BYTES)
    /// when unset.
    pub max_input_bytes: Option<usize>,
    /// Accept input of any size.
    pub disable_input_limit: bool,
}

impl Config {
    /// Page settings for the scanner.
    pub fn activation_settings(&self) -> ActivationSettings {
        ActivationSettings {
            enabled: self.enabled.unwrap_or(true),
            show_tooltips: self.show_tooltips.unwrap_or(true),
            highlight_jargon: self.highlight_jargon.unwrap_or(true),
            whitelist_sites: self.whitelist_sites.clone(),
            blacklist_sites: self.blacklist_sites.clone(),
        }
    }

    /// Input limit in bytes, or `None` when the limit is disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(
                self.max_input_bytes
                    .unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES),
            )
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which files a configuration was loaded from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project files, low to high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file, if found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicitly requested files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The highest-precedence file that was loaded.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const APP_NAME: &str = "unjargon";

/// Builder for loading configuration from the usual places.
#[derive(Debug)]
pub struct ConfigLoader {
    project_search_root: Option<Utf8PathBuf>,
    include_user_config: bool,
    boundary_marker: Option<String>,
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads user config and stops project search at `.git`.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Search for project config starting at `path` and walking up.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Whether to read the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add a file that overrides discovered config.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = Self::find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // UNJARGON_ENABLED=false, UNJARGON_DICTIONARY_PATH=..., etc.
        figment = figment.merge(Env::prefixed("UNJARGON_").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            dictionary = ?config.dictionary_path,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, failing if no config file exists anywhere.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && Self::find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();
            for prefix in [".", ""] {
                for ext in CONFIG_EXTENSIONS {
                    let candidate = dir.join(format!("{prefix}{APP_NAME}.{ext}"));
                    if candidate.is_file() {
                        found.push(candidate);
                    }
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Checked after the files so a config beside the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    fn find_user_config() -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// The user config directory.
///
/// `~/.config/unjargon/` on Linux, `~/Library/Application Support/unjargon/`
/// on macOS. `None` if the home directory cannot be determined.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn write_config(tmp: &TempDir, name: &str, body: &str) -> Utf8PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, body).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn load_file(path: &Utf8Path) -> Config {
        ConfigLoader::new()
            .with_user_config(false)
            .with_file(path)
            .load()
            .unwrap()
            .0
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.dictionary_path.is_none());
        assert!(config.whitelist_sites.is_empty());
    }

    #[test]
    fn defaults_enable_everything() {
        let settings = Config::default().activation_settings();
        assert!(settings.enabled);
        assert!(settings.show_tooltips);
        assert!(settings.highlight_jargon);
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "config.toml",
            r#"log_level = "debug"
log_dir = "/tmp/unjargon"
dictionary_path = "terms.json"
show_tooltips = false
blacklist_sites = ["example.com/pricing"]
"#,
        );

        let config = load_file(&path);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.log_dir.as_ref().map(|dir| dir.as_str()),
            Some("/tmp/unjargon")
        );
        assert_eq!(config.dictionary_path.as_deref(), Some(Utf8Path::new("terms.json")));

        let settings = config.activation_settings();
        assert!(settings.enabled);
        assert!(!settings.show_tooltips);
        assert_eq!(settings.blacklist_sites, vec!["example.com/pricing"]);
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();
        let base = write_config(&tmp, "base.toml", r#"log_level = "warn""#);
        let over = write_config(&tmp, "override.toml", r#"log_level = "error""#);

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&base)
            .with_file(&over)
            .load()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_project_config_discovery() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("src").join("deep");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(project_dir.join(".unjargon.toml"), "enabled = false\n").unwrap();

        let sub_dir = Utf8PathBuf::try_from(sub_dir).unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&sub_dir)
            .load()
            .unwrap();

        assert_eq!(config.enabled, Some(false));
        assert!(!config.activation_settings().enabled);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".unjargon.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let work = Utf8PathBuf::try_from(work).unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(&work)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn plain_name_overrides_dotfile() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, ".unjargon.toml", r#"log_level = "debug""#);
        write_config(&tmp, "unjargon.yaml", "log_level: warn\n");

        let tmp_path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&tmp_path)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(sources.project_files.len(), 2);
        assert!(sources.primary_file().unwrap().as_str().ends_with("unjargon.yaml"));
    }

    #[test]
    fn test_explicit_file_overrides_project_config() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, ".unjargon.toml", r#"log_level = "warn""#);
        let over = write_config(&tmp, "override.toml", r#"log_level = "error""#);

        let tmp_path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&tmp_path)
            .with_file(&over)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(!sources.project_files.is_empty());
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn test_load_or_error_fails_when_no_config() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_or_error_succeeds_with_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.json", r#"{"log_level": "debug"}"#);
        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load_or_error()
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn invalid_value_is_a_deserialize_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.toml", r#"log_level = "loud""#);
        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_user_config_dir() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("unjargon"));
        }
    }

    #[test]
    fn input_limit_defaults_and_overrides() {
        assert_eq!(
            Config::default().input_limit(),
            Some(crate::DEFAULT_MAX_INPUT_BYTES)
        );

        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.toml", "max_input_bytes = 1024\n");
        assert_eq!(load_file(&path).input_limit(), Some(1024));

        let path = write_config(
            &tmp,
            "off.toml",
            "max_input_bytes = 1024\ndisable_input_limit = true\n",
        );
        let config = load_file(&path);
        assert!(config.disable_input_limit);
        assert_eq!(config.max_input_bytes, Some(1024));
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_file_config() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.toml", "highlight_jargon = true\n");

        // SAFETY: the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("UNJARGON_HIGHLIGHT_JARGON", "false");
        }

        let config = load_file(&path);
        assert_eq!(config.highlight_jargon, Some(false));

        // SAFETY: cleanup, still under the mutex.
        unsafe {
            std::env::remove_var("UNJARGON_HIGHLIGHT_JARGON");
        }
    }

    #[test]
    fn site_lists_deserialize_from_yaml() {
        let yaml = r#"
enabled: true
whitelist_sites:
  - docs.example.com
  - ""
blacklist_sites:
  - example.com/pricing/legacy
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.enabled, Some(true));
        assert_eq!(config.whitelist_sites.len(), 2);
        assert_eq!(config.blacklist_sites, vec!["example.com/pricing/legacy"]);
    }

    #[test]
    fn empty_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("log_level: info\n").unwrap();
        assert_eq!(config, Config::default());
    }
}
