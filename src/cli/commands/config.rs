//! Config command handler

use crate::args::ConfigSubcommand;
use course_catalog::config::Config;
use std::io::{self, Write};

/// Keys whose values are lists, written `a | b | c` on the command line
const LIST_KEYS: [&str; 2] = ["candidates", "industry_tracks"];

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None => show_config(config),
        Some(ConfigSubcommand::Get { key: None }) => show_config(config),
        Some(ConfigSubcommand::Get { key: Some(key) }) => show_key(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => set_key(config, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset_key(config, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset_config(),
    }
}

fn is_list_key(key: &str) -> bool {
    LIST_KEYS.contains(&key)
}

/// Lines printed for one key: list values one item per line
fn value_lines(key: &str, value: &str) -> Vec<String> {
    if is_list_key(key) {
        value
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![value.to_string()]
    }
}

/// Where the catalog will read courses from, marking files that exist
fn data_source_lines(config: &Config) -> Vec<String> {
    let mut lines: Vec<String> = config
        .candidate_paths()
        .iter()
        .map(|p| format!("{} {}", if p.is_file() { "✓" } else { "·" }, p.display()))
        .collect();
    if config.data.embedded_fallback {
        lines.push("· embedded sample".to_string());
    }
    lines
}

fn show_config(config: &Config) {
    println!("\n=== Catalog configuration ({}) ===\n", Config::get_config_file_path().display());
    print!("{config}");

    println!("\nIndustry tracks ({}):", config.catalog.industry_tracks.len());
    for track in &config.catalog.industry_tracks {
        println!("  {track}");
    }
    println!("\nCourse sources, in load order:");
    for line in data_source_lines(config) {
        println!("  {line}");
    }
    println!("\nSeparate list items with '|', e.g. catalog config set industry_tracks \"A | B\"");
}

fn show_key(config: &Config, key: &str) {
    match config.get(key) {
        Some(value) => {
            for line in value_lines(key, &value) {
                println!("{line}");
            }
        }
        None => eprintln!("✗ Unknown config key: '{key}'"),
    }
}

fn save_or_exit(config: &Config) {
    if let Err(e) = config.save() {
        eprintln!("✗ Failed to save config: {e}");
        std::process::exit(1);
    }
}

fn set_key(config: &mut Config, key: &str, value: &str) {
    if let Err(e) = config.set(key, value) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
    save_or_exit(config);

    if is_list_key(key) {
        let items = config.get(key).map(|v| value_lines(key, &v)).unwrap_or_default();
        println!("✓ Set {key} to {} entries", items.len());
    } else {
        println!("✓ Set {key} = {value}");
    }
}

fn unset_key(config: &mut Config, defaults: &Config, key: &str) {
    if let Err(e) = config.unset(key, defaults) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
    save_or_exit(config);
    println!("✓ Reset {key} to default");
}

fn reset_config() {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Reset the catalog configuration to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        if let Err(e) = Config::reset() {
            eprintln!("✗ Failed to remove config file: {e}");
            std::process::exit(1);
        }
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
}
