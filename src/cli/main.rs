//! Command-line interface entry point for the course catalog

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use course_catalog::config::Config;
use course_catalog::core::prepare::PrepareOptions;
use course_catalog::info;
use course_catalog::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Browse(browse) => commands::browse::run(&browse, &config),
        Command::Groups { json } => commands::groups::run_groups(&config, json),
        Command::Facets { json } => commands::groups::run_facets(&config, json),
        Command::Admin { subcommand } => commands::admin::run(subcommand, &config),
        Command::Prepare {
            ids,
            urls,
            pricing,
            reset_status,
            dry_run,
            file,
        } => {
            let options = PrepareOptions {
                ids,
                urls,
                pricing,
                reset_status,
            };
            commands::prepare::run(options, dry_run, file, &config);
        }
    }
}
