//! Configuration loading and discovery.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config: `~/.config/syllabic/config.<ext>` (platform equivalent elsewhere)
//! 3. Project config: `.syllabic.<ext>` or `syllabic.<ext>` in the current
//!    directory or the closest parent that has one
//! 4. Explicit files (`--config`)
//! 5. `SYLLABIC_*` environment variables
//!
//! `<ext>` is one of `toml`, `yaml`, `yml`, `json`. When several files sit in
//! the same directory they are all merged: dotfiles before regular files, and
//! within each, `toml < yaml < yml < json`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use syllabic_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("max grade: {:?}", config.max_grade);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::readability::Thresholds;

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// The configuration for syllabic.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. File logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Default maximum Flesch-Kincaid grade level for `score`.
    pub max_grade: Option<f64>,
    /// Default minimum Flesch reading ease for `score`.
    pub min_reading_ease: Option<f64>,
    /// Maximum input size in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely; `max_input_bytes` is then ignored.
    pub disable_input_limit: bool,
}

impl Config {
    /// Thresholds configured for scoring.
    pub const fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_grade: self.max_grade,
            min_reading_ease: self.min_reading_ease,
        }
    }

    /// Effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            None
        } else {
            Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Which configuration files were loaded.
///
/// Returned alongside [`Config`] so commands can report them without
/// re-running discovery.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files (e.g., from `--config`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .map(Utf8PathBuf::as_path)
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions, lowest precedence first.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for config file names and platform directories.
const APP_NAME: &str = "syllabic";

/// Prefix for environment variable overrides (`SYLLABIC_MAX_GRADE=10`).
const ENV_PREFIX: &str = "SYLLABIC_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include the user config file.
    include_user_config: bool,
    /// Stop searching upward at a directory containing this entry.
    boundary_marker: Option<String>,
    /// Explicit config files, loaded last.
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader: user config on, `.git` boundary, no search root.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Walk up from `path` looking for project config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Stop the upward search at a directory containing `marker`.
    ///
    /// A config file in the marker's own directory is still found.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Search all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file. Later files take precedence.
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
            && let Some(user_config) = find_user_config()
        {
            figment = merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            sources.project_files = self.find_project_configs(root);
            for file in &sources.project_files {
                figment = merge_file(figment, file);
            }
        }

        for file in &self.explicit_files {
            figment = merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            config_file = ?sources.primary_file(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, failing with [`ConfigError::NotFound`] when no
    /// file exists in any location.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && find_user_config().is_some();
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

    /// Config files in the closest directory (walking up from `start`) that
    /// has any, ordered low→high precedence.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start);

        while let Some(dir) = current {
            let found: Vec<Utf8PathBuf> = [".", ""]
                .into_iter()
                .flat_map(|prefix| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{prefix}{APP_NAME}.{ext}")))
                })
                .filter(|candidate| candidate.is_file())
                .collect();

            if !found.is_empty() {
                return found;
            }

            // Checked after the config files so a config beside the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir != start
                && dir.join(marker).exists()
            {
                break;
            }

            current = dir.parent();
        }

        Vec::new()
    }
}

/// First `config.<ext>` in the user config directory.
fn find_user_config() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge a config file into the figment, picking the format from its extension.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/syllabic/` on Linux, `~/Library/Application Support/syllabic/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    fn isolated() -> ConfigLoader {
        ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.max_grade.is_none());
        assert!(config.min_reading_ease.is_none());
        assert!(!config.disable_input_limit);
    }

    #[test]
    fn loads_defaults_without_files() {
        let (config, sources) = isolated().load().unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.max_grade.is_none());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn explicit_file_sets_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            "log_level = \"debug\"\nmax_grade = 9.5\nmin_reading_ease = 60.0\n",
        )
        .unwrap();

        let (config, sources) = isolated().with_file(utf8(&path)).load().unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_grade, Some(9.5));
        assert_eq!(config.min_reading_ease, Some(60.0));
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn later_explicit_file_wins() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base.toml");
        let over = tmp.path().join("override.toml");
        fs::write(&base, "max_grade = 12.0\nlog_level = \"warn\"\n").unwrap();
        fs::write(&over, "max_grade = 8.0\n").unwrap();

        let (config, sources) = isolated()
            .with_file(utf8(&base))
            .with_file(utf8(&over))
            .load()
            .unwrap();

        assert_eq!(config.max_grade, Some(8.0));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(sources.primary_file().unwrap().as_str().ends_with("override.toml"));
    }

    #[test]
    fn discovers_project_config_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("project").join("src").join("deep");
        fs::create_dir_all(&deep).unwrap();
        fs::write(
            tmp.path().join("project").join(".syllabic.toml"),
            "max_grade = 10.0\n",
        )
        .unwrap();

        let (config, sources) = isolated().with_project_search(utf8(&deep)).load().unwrap();

        assert_eq!(config.max_grade, Some(10.0));
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let repo = parent.join("repo");
        let work = repo.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".syllabic.toml"), "log_level = \"warn\"\n").unwrap();
        fs::create_dir(repo.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn config_beside_boundary_marker_is_found() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        let src = repo.join("src");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        fs::write(repo.join("syllabic.yaml"), "max_grade: 7.0\n").unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8(&src))
            .load()
            .unwrap();

        assert_eq!(config.max_grade, Some(7.0));
    }

    #[test]
    fn regular_file_overrides_dotfile() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".syllabic.toml"), "log_level = \"debug\"\n").unwrap();
        fs::write(tmp.path().join("syllabic.toml"), "log_level = \"error\"\n").unwrap();

        let (config, sources) = isolated()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn same_directory_files_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 11.0\n").unwrap();
        fs::write(tmp.path().join(".syllabic.json"), r#"{"log_level": "warn"}"#).unwrap();

        let (config, _sources) = isolated()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.max_grade, Some(11.0));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn only_closest_directory_contributes() {
        let tmp = TempDir::new().unwrap();
        let child = tmp.path().join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 12.0\n").unwrap();
        fs::write(child.join(".syllabic.toml"), "log_level = \"error\"\n").unwrap();

        let (config, sources) = isolated().with_project_search(utf8(&child)).load().unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
        assert!(config.max_grade.is_none());
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn explicit_file_overrides_project_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".syllabic.toml"), "max_grade = 12.0\n").unwrap();
        let explicit = tmp.path().join("strict.toml");
        fs::write(&explicit, "max_grade = 6.0\n").unwrap();

        let (config, sources) = isolated()
            .with_project_search(utf8(tmp.path()))
            .with_file(utf8(&explicit))
            .load()
            .unwrap();

        assert_eq!(config.max_grade, Some(6.0));
        assert!(!sources.project_files.is_empty());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "max_grade = [[[").unwrap();

        let result = isolated().with_file(utf8(&path)).load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn load_or_error_fails_when_no_config() {
        let result = isolated().load_or_error();
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn load_or_error_succeeds_with_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let (config, _sources) = isolated().with_file(utf8(&path)).load_or_error().unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn thresholds_from_config() {
        let config = Config {
            max_grade: Some(8.0),
            min_reading_ease: Some(60.0),
            ..Config::default()
        };
        let thresholds = config.thresholds();
        assert_eq!(thresholds.max_grade, Some(8.0));
        assert_eq!(thresholds.min_reading_ease, Some(60.0));
    }

    #[test]
    fn input_limit_defaults_and_overrides() {
        assert_eq!(Config::default().input_limit(), Some(DEFAULT_MAX_INPUT_BYTES));

        let config = Config {
            max_input_bytes: Some(1024),
            ..Config::default()
        };
        assert_eq!(config.input_limit(), Some(1024));

        let config = Config {
            max_input_bytes: Some(1024),
            disable_input_limit: true,
            ..Config::default()
        };
        assert_eq!(config.input_limit(), None);
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = "log_level: warn\nmax_grade: 10\nmin_reading_ease: 55.5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.max_grade, Some(10.0));
        assert_eq!(config.min_reading_ease, Some(55.5));
    }

    #[test]
    fn user_config_dir_names_app() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("syllabic"));
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_overrides_file_config() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "log_dir = \"/tmp/from-file\"\n").unwrap();

        // SAFETY: Test environment; the mutex serializes env access across tests.
        unsafe {
            std::env::set_var("SYLLABIC_LOG_DIR", "/tmp/from-env");
        }

        let result = isolated().with_file(utf8(&path)).load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("SYLLABIC_LOG_DIR");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(
            config.log_dir.as_ref().map(|dir| dir.as_str()),
            Some("/tmp/from-env")
        );
    }
}
