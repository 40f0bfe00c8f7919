//! # dir-usage
//!
//! Report disk usage per path using `du`, without the intermediate parent
//! directories that `du` prints after their children.
//!
//! ## Usage
//!
//! ```bash
//! # Current directory, unlimited depth
//! dir-usage
//!
//! # Two levels deep, largest first, hide anything under 10MB
//! dir-usage ~/Projects -d 2 --sort size --min-size 10MB
//!
//! # Machine-readable output
//! dir-usage /var/cache --json
//! ```

mod cli;

use std::process::exit;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use colored::Colorize;
use dir_usage::{
    UsageCollector,
    config::{DisplayOptions, FileConfig, SortOptions},
    filtering::{filter_entries, sort_entries},
    output::{JsonOutput, RootReport, print_report},
    utils::parse_size,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Entry point; prints any error to stderr and exits with status 1.
fn main() {
    match inner_main() {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit(1);
        }
    }
}

/// Run the application. Returns `Ok(false)` when at least one directory failed.
///
/// # Errors
///
/// Returns errors from config handling, size parsing or JSON serialization.
fn inner_main() -> Result<bool> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        handle_config_command(*command)?;
        return Ok(true);
    }

    let json_mode = args.json();
    let file_config = load_config(json_mode);
    setup_logging(args.verbose(&file_config));

    let dirs = args.directories(&file_config);
    let collect_options = args.collect_options(&file_config);
    let display_options = args.display_options(&file_config);
    let sort_options = args.sort_options(&file_config);

    if display_options.block_size == 0 {
        bail!("--block-size must be greater than zero");
    }
    let min_bytes = parse_size(&display_options.min_size)?;

    let collector = UsageCollector::from_options(&collect_options);

    let spinner = spinner(json_mode, dirs.len());
    let results = collector.collect_many(&dirs, collect_options.depth);
    spinner.finish_and_clear();

    let reports: Vec<RootReport> = results
        .into_iter()
        .map(|(dir, result)| RootReport {
            root: dir.display().to_string(),
            result: result
                .map(|entries| prepare(entries, min_bytes, &display_options, sort_options))
                .map_err(|err| err.to_string()),
        })
        .collect();

    let all_ok = reports.iter().all(|r| r.result.is_ok());

    if json_mode {
        let output = JsonOutput::from_reports(&reports, display_options.block_size);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&reports, display_options.block_size);
    }

    Ok(all_ok)
}

/// Apply display filtering and sorting to a successful collection.
fn prepare(
    entries: Vec<dir_usage::UsageEntry>,
    min_bytes: u64,
    display: &DisplayOptions,
    sort: SortOptions,
) -> Vec<dir_usage::UsageEntry> {
    let mut entries = filter_entries(entries, min_bytes, display.block_size);
    sort_entries(&mut entries, &sort);
    entries
}

/// Spinner shown while `du` runs; hidden in JSON mode.
fn spinner(json_mode: bool, count: usize) -> ProgressBar {
    if json_mode {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    let noun = if count == 1 { "directory" } else { "directories" };
    pb.set_message(format!("Measuring {count} {noun}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dir_usage=debug")
        } else {
            EnvFilter::new("dir_usage=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# dir-usage configuration
# All values shown are their defaults. Uncomment and change as needed.

# Directory to report on when none is given (defaults to the current directory)
# dir = "."

[collect]
# Program to run; it must understand `-0` and `-d DEPTH`
# program = "du"

# Maximum depth below each directory (unset = unlimited)
# depth = 1

# Run the program through the command shell
# shell = true

[display]
# Hide entries smaller than this (e.g. "10MB", "1GiB")
# min_size = "0"

# Sort output by: size, path (unset = order printed by du)
# sort = "size"

# Reverse the display order
# reverse = false

# Bytes per unit printed by the program
# block_size = 1024

# Log the commands being run
# verbose = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();
    let config = FileConfig::load()?;

    match &path {
        Some(p) if p.exists() => println!("Config file: {} (found)", p.display()),
        Some(p) => println!("Config file: {} (not found - showing defaults)", p.display()),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`], showing defaults for unset fields.
fn format_config(config: &FileConfig) -> String {
    fn show<T: ToString>(val: Option<T>, default: &str) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let dirs = config.directories().map_or_else(
        || "[\".\"]  (default)".to_string(),
        |dirs| {
            let items: Vec<String> = dirs.iter().map(|d| format!("\"{}\"", d.display())).collect();
            format!("[{}]", items.join(", "))
        },
    );

    format!(
        "\
dirs       = {dirs}

[collect]
program    = {program}
depth      = {depth}
shell      = {shell}

[display]
min_size   = {min_size}
sort       = {sort}
reverse    = {reverse}
block_size = {block_size}
verbose    = {verbose}",
        program = show(config.collect.program.as_deref().map(|p| format!("\"{p}\"")), "\"du\""),
        depth = show(config.collect.depth, "unlimited"),
        shell = show(config.collect.shell, "true"),
        min_size = show(config.display.min_size.as_deref().map(|s| format!("\"{s}\"")), "\"0\""),
        sort = show(config.display.sort.as_deref().map(|s| format!("\"{s}\"")), "(none)"),
        reverse = show(config.display.reverse, "false"),
        block_size = show(config.display.block_size, "1024"),
        verbose = show(config.display.verbose, "false"),
    )
}

/// Write the default config template if no config file exists yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create config directory {}: {e}", parent.display())
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e:#}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}
