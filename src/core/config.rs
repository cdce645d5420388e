//! Configuration module for the course catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::admin::AdminPaths;
use crate::core::grouped::IndustryTracks;
use crate::core::prepare::PrepareSettings;
use crate::core::render::ViewMode;
use crate::core::sort::SortKey;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$COURSE_CATALOG";

/// Separator for list values given on the command line; track names may
/// contain commas
const LIST_SEPARATOR: char = '|';

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// File locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Course collection the admin tool edits
    #[serde(default)]
    pub data_file: String,
    /// Grouped catalog derived from the collection
    #[serde(default)]
    pub grouped_file: String,
    /// Directory for data file backups
    #[serde(default)]
    pub backups_dir: String,
    /// Root directory for generated course pages
    #[serde(default)]
    pub pages_dir: String,
}

/// Data source settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Extra collection files tried after `paths.data_file`, in order
    #[serde(default)]
    pub candidates: Vec<String>,
    /// Fall back to the compiled-in sample when every file fails
    #[serde(default)]
    pub embedded_fallback: bool,
}

/// Listing defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Courses per page; 0 means unset
    #[serde(default)]
    pub page_size: usize,
    /// Initial view name
    #[serde(default)]
    pub view: String,
    /// Initial sort key name
    #[serde(default)]
    pub sort: String,
    /// Quiet period for search edits in interactive mode; 0 means unset
    #[serde(default)]
    pub search_debounce_ms: u64,
}

/// Catalog naming rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Track names classified as industry tracks
    #[serde(default)]
    pub industry_tracks: Vec<String>,
    /// Prefix for course page urls
    #[serde(default)]
    pub main_page_base: String,
    /// Prefix for enrollment urls
    #[serde(default)]
    pub enrollment_base: String,
    /// Prefix for sequential ids
    #[serde(default)]
    pub id_prefix: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Data source settings
    #[serde(default)]
    pub data: DataConfig,
    /// Listing defaults
    #[serde(default)]
    pub listing: ListingConfig,
    /// Catalog naming rules
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the data file
    pub data_file: Option<String>,
    /// Override the grouped file
    pub grouped_file: Option<String>,
    /// Override the page size
    pub page_size: Option<usize>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn fill_string(target: &mut String, default: &str) -> bool {
    if target.is_empty() && !default.is_empty() {
        default.clone_into(target);
        return true;
    }
    false
}

fn fill_list(target: &mut Vec<String>, default: &[String]) -> bool {
    if target.is_empty() && !default.is_empty() {
        target.extend_from_slice(default);
        return true;
    }
    false
}

impl Config {
    /// Get the `$COURSE_CATALOG` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/course-catalog`
    /// - macOS: `~/Library/Application Support/course-catalog`
    /// - Windows: `%APPDATA%\course-catalog`
    #[must_use]
    pub fn get_catalog_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("course-catalog")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Fills empty strings, empty lists and zero numbers from `defaults` so
    /// that upgrading picks up new settings without touching user values.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        changed |= fill_string(&mut self.logging.level, &defaults.logging.level);
        changed |= fill_string(&mut self.logging.file, &defaults.logging.file);

        changed |= fill_string(&mut self.paths.data_file, &defaults.paths.data_file);
        changed |= fill_string(&mut self.paths.grouped_file, &defaults.paths.grouped_file);
        changed |= fill_string(&mut self.paths.backups_dir, &defaults.paths.backups_dir);
        changed |= fill_string(&mut self.paths.pages_dir, &defaults.paths.pages_dir);

        changed |= fill_list(&mut self.data.candidates, &defaults.data.candidates);

        if self.listing.page_size == 0 && defaults.listing.page_size > 0 {
            self.listing.page_size = defaults.listing.page_size;
            changed = true;
        }
        if self.listing.search_debounce_ms == 0 && defaults.listing.search_debounce_ms > 0 {
            self.listing.search_debounce_ms = defaults.listing.search_debounce_ms;
            changed = true;
        }
        changed |= fill_string(&mut self.listing.view, &defaults.listing.view);
        changed |= fill_string(&mut self.listing.sort, &defaults.listing.sort);

        changed |= fill_list(&mut self.catalog.industry_tracks, &defaults.catalog.industry_tracks);
        changed |= fill_string(&mut self.catalog.main_page_base, &defaults.catalog.main_page_base);
        changed |= fill_string(&mut self.catalog.enrollment_base, &defaults.catalog.enrollment_base);
        changed |= fill_string(&mut self.catalog.id_prefix, &defaults.catalog.id_prefix);

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the config file is not
    /// modified.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(data_file) = &overrides.data_file {
            self.paths.data_file.clone_from(data_file);
        }
        if let Some(grouped_file) = &overrides.grouped_file {
            self.paths.grouped_file.clone_from(grouped_file);
        }
        if let Some(page_size) = overrides.page_size.filter(|n| *n > 0) {
            self.listing.page_size = page_size;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_catalog_dir`](Self::get_catalog_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_catalog_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$COURSE_CATALOG` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_catalog_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$COURSE_CATALOG` in path values. Missing fields take their
    /// serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        for path in [
            &mut config.paths.data_file,
            &mut config.paths.grouped_file,
            &mut config.paths.backups_dir,
            &mut config.paths.pages_dir,
        ] {
            *path = Self::expand_variables(path);
        }
        for candidate in &mut config.data.candidates {
            *candidate = Self::expand_variables(candidate);
        }

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration cannot be parsed.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file is merged with new defaults and saved back when
    /// anything was added. Falls back to defaults on any read or parse error.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if serialization, directory creation or the write fails
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys are field names (`level`, `data_file`, `page_size`, ...); dashes
    /// may be used in place of underscores. List values are joined with `|`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "data_file" => self.paths.data_file.clone(),
            "grouped_file" => self.paths.grouped_file.clone(),
            "backups_dir" => self.paths.backups_dir.clone(),
            "pages_dir" => self.paths.pages_dir.clone(),
            "candidates" => self.data.candidates.join(" | "),
            "embedded_fallback" => self.data.embedded_fallback.to_string(),
            "page_size" => self.listing.page_size.to_string(),
            "view" => self.listing.view.clone(),
            "sort" => self.listing.sort.clone(),
            "search_debounce_ms" => self.listing.search_debounce_ms.to_string(),
            "industry_tracks" => self.catalog.industry_tracks.join(" | "),
            "main_page_base" => self.catalog.main_page_base.clone(),
            "enrollment_base" => self.catalog.enrollment_base.clone(),
            "id_prefix" => self.catalog.id_prefix.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: booleans must be `true`/`false`, `page_size`
    /// a positive integer, `view` and `sort` known names. List keys take
    /// `|`-separated values.
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error for unknown keys or invalid values
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let parse_bool = |name: &str| {
            value
                .parse::<bool>()
                .map_err(|_| format!("Invalid boolean value for '{name}': '{value}'"))
        };
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool("verbose")?,
            "data_file" => self.paths.data_file = value.to_string(),
            "grouped_file" => self.paths.grouped_file = value.to_string(),
            "backups_dir" => self.paths.backups_dir = value.to_string(),
            "pages_dir" => self.paths.pages_dir = value.to_string(),
            "candidates" => self.data.candidates = split_list(value),
            "embedded_fallback" => self.data.embedded_fallback = parse_bool("embedded_fallback")?,
            "page_size" => {
                self.listing.page_size = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("Invalid page size: '{value}'"))?;
            }
            "view" => {
                value.parse::<ViewMode>()?;
                self.listing.view = value.to_string();
            }
            "sort" => {
                value.parse::<SortKey>()?;
                self.listing.sort = value.to_string();
            }
            "search_debounce_ms" => {
                self.listing.search_debounce_ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid debounce interval: '{value}'"))?;
            }
            "industry_tracks" => self.catalog.industry_tracks = split_list(value),
            "main_page_base" => self.catalog.main_page_base = value.to_string(),
            "enrollment_base" => self.catalog.enrollment_base = value.to_string(),
            "id_prefix" => self.catalog.id_prefix = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Note: This method updates the in-memory config. Call [`save()`](Config::save) to persist changes.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_file" => self.paths.data_file.clone_from(&defaults.paths.data_file),
            "grouped_file" => self.paths.grouped_file.clone_from(&defaults.paths.grouped_file),
            "backups_dir" => self.paths.backups_dir.clone_from(&defaults.paths.backups_dir),
            "pages_dir" => self.paths.pages_dir.clone_from(&defaults.paths.pages_dir),
            "candidates" => self.data.candidates.clone_from(&defaults.data.candidates),
            "embedded_fallback" => self.data.embedded_fallback = defaults.data.embedded_fallback,
            "page_size" => self.listing.page_size = defaults.listing.page_size,
            "view" => self.listing.view.clone_from(&defaults.listing.view),
            "sort" => self.listing.sort.clone_from(&defaults.listing.sort),
            "search_debounce_ms" => {
                self.listing.search_debounce_ms = defaults.listing.search_debounce_ms;
            }
            "industry_tracks" => self
                .catalog
                .industry_tracks
                .clone_from(&defaults.catalog.industry_tracks),
            "main_page_base" => self
                .catalog
                .main_page_base
                .clone_from(&defaults.catalog.main_page_base),
            "enrollment_base" => self
                .catalog
                .enrollment_base
                .clone_from(&defaults.catalog.enrollment_base),
            "id_prefix" => self.catalog.id_prefix.clone_from(&defaults.catalog.id_prefix),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Collection files in load order: the data file, then each candidate
    /// not already listed
    #[must_use]
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for raw in std::iter::once(&self.paths.data_file).chain(self.data.candidates.iter()) {
            if raw.is_empty() {
                continue;
            }
            let path = PathBuf::from(raw);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Paths for the admin tool
    #[must_use]
    pub fn admin_paths(&self) -> AdminPaths {
        AdminPaths {
            data_file: PathBuf::from(&self.paths.data_file),
            grouped_file: PathBuf::from(&self.paths.grouped_file),
            backups_dir: PathBuf::from(&self.paths.backups_dir),
            pages_dir: PathBuf::from(&self.paths.pages_dir),
        }
    }

    /// Industry track classifier
    #[must_use]
    pub fn industry_tracks(&self) -> IndustryTracks {
        if self.catalog.industry_tracks.is_empty() {
            IndustryTracks::default()
        } else {
            IndustryTracks::new(&self.catalog.industry_tracks)
        }
    }

    /// Naming settings for data preparation
    #[must_use]
    pub fn prepare_settings(&self) -> PrepareSettings {
        PrepareSettings {
            id_prefix: self.catalog.id_prefix.clone(),
            enrollment_base: self.catalog.enrollment_base.clone(),
            main_page_base: self.catalog.main_page_base.clone(),
        }
    }

    /// Configured initial view, grid when unset or unknown
    #[must_use]
    pub fn default_view(&self) -> ViewMode {
        self.listing.view.parse().unwrap_or_default()
    }

    /// Configured initial sort, popular when unset or unknown
    #[must_use]
    pub fn default_sort(&self) -> SortKey {
        self.listing.sort.parse().unwrap_or_default()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_file = \"{}\"", self.paths.data_file)?;
        writeln!(f, "  grouped_file = \"{}\"", self.paths.grouped_file)?;
        writeln!(f, "  backups_dir = \"{}\"", self.paths.backups_dir)?;
        writeln!(f, "  pages_dir = \"{}\"", self.paths.pages_dir)?;

        writeln!(f, "\n[data]")?;
        writeln!(f, "  candidates = {:?}", self.data.candidates)?;
        writeln!(f, "  embedded_fallback = {}", self.data.embedded_fallback)?;

        writeln!(f, "\n[listing]")?;
        writeln!(f, "  page_size = {}", self.listing.page_size)?;
        writeln!(f, "  view = \"{}\"", self.listing.view)?;
        writeln!(f, "  sort = \"{}\"", self.listing.sort)?;
        writeln!(f, "  search_debounce_ms = {}", self.listing.search_debounce_ms)?;

        writeln!(f, "\n[catalog]")?;
        writeln!(f, "  industry_tracks = {} names", self.catalog.industry_tracks.len())?;
        writeln!(f, "  main_page_base = \"{}\"", self.catalog.main_page_base)?;
        writeln!(f, "  enrollment_base = \"{}\"", self.catalog.enrollment_base)?;
        writeln!(f, "  id_prefix = \"{}\"", self.catalog.id_prefix)?;

        Ok(())
    }
}
