//! CLI argument definitions for the course catalog

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use course_catalog::config::ConfigOverrides;
use course_catalog::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to
/// `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_file`, `page_size`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value. List values are separated with `|`.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Listing controls for `browse`
#[derive(Debug, Clone, Default, Args)]
pub struct BrowseArgs {
    /// Search text matched against title, description and tools
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Rank search results by relevance instead of requiring every word
    #[arg(long)]
    pub relevance: bool,

    /// Track to show (single choice)
    #[arg(long, value_name = "TRACK")]
    pub track: Option<String>,

    /// Domain filter (repeatable; any match)
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Vec<String>,

    /// Level filter (repeatable; any match)
    #[arg(long, value_name = "LEVEL")]
    pub level: Vec<String>,

    /// Status filter (repeatable; any match)
    #[arg(long, value_name = "STATUS")]
    pub status: Vec<String>,

    /// Tool filter (repeatable; any match)
    #[arg(long, value_name = "TOOL")]
    pub tool: Vec<String>,

    /// Duration bucket: 0-2, 2-5, 5-10 or 10+ weeks (repeatable)
    #[arg(long, value_name = "BUCKET")]
    pub duration: Vec<String>,

    /// Price preset such as `0-10000` or `50000+`
    #[arg(long, value_name = "RANGE", conflicts_with_all = ["min_price", "max_price"])]
    pub price: Option<String>,

    /// Lowest price in rupees
    #[arg(long, value_name = "INR")]
    pub min_price: Option<f64>,

    /// Highest price in rupees
    #[arg(long, value_name = "INR")]
    pub max_price: Option<f64>,

    /// Minimum rating; unrated courses never match
    #[arg(long, value_name = "RATING")]
    pub min_rating: Option<f64>,

    /// Sort key (title, level, duration, durationDesc, status, popular,
    /// rating, priceAsc, priceDesc, newest)
    #[arg(long, value_name = "KEY")]
    pub sort: Option<String>,

    /// View: grid, list, track, domain, category or industrial
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,

    /// Expand a group in grouped views (repeatable)
    #[arg(long, value_name = "GROUP")]
    pub expand: Vec<String>,

    /// Page to show (1-based)
    #[arg(short, long, value_name = "N")]
    pub page: Option<usize>,

    /// Scope query string, e.g. `track=Generative%20AI` or `mode=domain&value=Robotics`
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Print a JSON snapshot instead of text
    #[arg(long)]
    pub json: bool,

    /// Start an interactive session after applying the flags
    #[arg(short, long)]
    pub interactive: bool,
}

impl BrowseArgs {
    /// Price range from `--price` or `--min-price`/`--max-price`
    pub fn price_range(&self) -> Option<String> {
        if let Some(price) = &self.price {
            return Some(price.clone());
        }
        match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, Some(max)) => Some(format!("{}-{max}", min.unwrap_or(0.0))),
            (Some(min), None) => Some(format!("{min}+")),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BackupSubcommand {
    /// List backups, newest first.
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the content of a backup.
    Show {
        /// Backup file name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Replace the data file with a backup and rebuild groups.
    Restore {
        /// Backup file name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminSubcommand {
    /// List course ids and titles.
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one course record.
    Get {
        /// Course id
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Merge a JSON course into the data file and generate its page.
    Upsert {
        /// JSON file holding one course object
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Render a course page without writing the data file.
    Preview {
        /// JSON file holding one course object
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the HTML here instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Regenerate the grouped catalog file.
    RebuildGroups,
    /// Manage data file backups.
    Backups {
        #[command(subcommand)]
        subcommand: BackupSubcommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Browse the catalog with filters, sorting and pagination.
    Browse(BrowseArgs),
    /// Show tracks grouped into industry and regular tracks.
    Groups {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show facet counts and filter options.
    Facets {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit the course data file and generate course pages.
    Admin {
        #[command(subcommand)]
        subcommand: AdminSubcommand,
    },
    /// Assign ids, page urls and pricing across the data file.
    ///
    /// With no pass selected, all passes run.
    Prepare {
        /// Assign sequential ids and enrollment urls
        #[arg(long)]
        ids: bool,
        /// Assign page urls from title slugs
        #[arg(long)]
        urls: bool,
        /// Derive pricing from durations
        #[arg(long)]
        pricing: bool,
        /// With --ids, also mark every course Active
        #[arg(long)]
        reset_status: bool,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Data file to prepare (defaults to the configured one)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "catalog",
    about = "Course catalog command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the course data file
    #[arg(long = "data-file", value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Override the grouped catalog file
    #[arg(long = "grouped-file", value_name = "FILE")]
    pub grouped_file: Option<PathBuf>,

    /// Override the page size
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_text = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_text),
            verbose: self.config_verbose,
            data_file: self.data_file.as_ref().map(path_text),
            grouped_file: self.grouped_file.as_ref().map(path_text),
            page_size: self.page_size,
        }
    }
}
