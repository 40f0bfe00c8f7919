//! Command-line interface definition and argument parsing.
//!
//! Helper methods on [`Cli`] take a [`FileConfig`] so that config-file values
//! act as defaults the command line can override.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use dir_usage::config::{
    CollectOptions, DEFAULT_BLOCK_SIZE, DisplayOptions, FileConfig, SortCriteria, SortOptions,
};

/// Options controlling how `du` is run.
#[derive(Parser)]
struct CollectArgs {
    /// Report at most this many directory levels below each directory
    ///
    /// Passed to the tool as `-d DEPTH`. When not set, the tool's own default
    /// (unlimited) applies.
    #[arg(short = 'd', long)]
    depth: Option<usize>,

    /// Program to run instead of `du`
    ///
    /// It must accept `-0`, `-d DEPTH` and a trailing path, and print
    /// `<size><whitespace><path>` records separated by NUL bytes.
    #[arg(long)]
    program: Option<String>,

    /// Run the program directly instead of through the command shell
    #[arg(long)]
    no_shell: bool,
}

/// Options controlling what is printed.
#[derive(Parser)]
struct DisplayArgs {
    /// Hide entries smaller than this size
    ///
    /// Supports decimal (KB, MB, GB), binary (KiB, MiB, GiB) and `du`-style
    /// (K, M, G) units, plain byte counts and fractions such as 1.5GB.
    #[arg(short = 's', long)]
    min_size: Option<String>,

    /// Sort entries before display (default: tool order)
    #[arg(long, value_enum)]
    sort: Option<SortCriteria>,

    /// Reverse the display order
    #[arg(long)]
    reverse: bool,

    /// Bytes per unit reported by the program (1024 for GNU du)
    #[arg(long)]
    block_size: Option<u64>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Report disk usage per path, without intermediate directories.
#[derive(Parser)]
#[command(name = "dir-usage")]
#[command(about = "Report disk usage per path using du, without double-counted parent directories")]
#[command(version)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Directories to report on (default: current directory)
    #[arg(num_args = 0..)]
    dirs: Vec<PathBuf>,

    /// Output results as a single JSON object
    #[arg(long)]
    json: bool,

    /// Log the commands being run and other debug details to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(flatten)]
    collect: CollectArgs,

    #[command(flatten)]
    display: DisplayArgs,
}

impl Cli {
    /// Whether `--json` output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Whether debug logging is enabled by flag or config.
    #[must_use]
    pub fn verbose(&self, config: &FileConfig) -> bool {
        self.verbose || config.display.verbose.unwrap_or(false)
    }

    /// Directories to report on.
    ///
    /// Priority: CLI arguments > config `dirs` > config `dir` > `.`.
    #[must_use]
    pub fn directories(&self, config: &FileConfig) -> Vec<PathBuf> {
        if !self.dirs.is_empty() {
            return self.dirs.clone();
        }

        config
            .directories()
            .unwrap_or_else(|| vec![PathBuf::from(".")])
    }

    /// Invocation options: CLI > config file > defaults.
    #[must_use]
    pub fn collect_options(&self, config: &FileConfig) -> CollectOptions {
        let defaults = CollectOptions::default();

        CollectOptions {
            program: self
                .collect
                .program
                .clone()
                .or_else(|| config.collect.program.clone())
                .unwrap_or(defaults.program),
            depth: self.collect.depth.or(config.collect.depth),
            shell: !self.collect.no_shell && config.collect.shell.unwrap_or(defaults.shell),
        }
    }

    /// Display options: CLI > config file > defaults.
    #[must_use]
    pub fn display_options(&self, config: &FileConfig) -> DisplayOptions {
        DisplayOptions {
            min_size: self
                .display
                .min_size
                .clone()
                .or_else(|| config.display.min_size.clone())
                .unwrap_or_else(|| "0".to_string()),
            block_size: self
                .display
                .block_size
                .or(config.display.block_size)
                .unwrap_or(DEFAULT_BLOCK_SIZE),
        }
    }

    /// Sort options: CLI > config file > emission order.
    #[must_use]
    pub fn sort_options(&self, config: &FileConfig) -> SortOptions {
        SortOptions {
            criteria: self.display.sort.or_else(|| {
                config
                    .display
                    .sort
                    .as_ref()
                    .and_then(|s| SortCriteria::from_str(s, true).ok())
            }),
            reverse: self.display.reverse || config.display.reverse.unwrap_or(false),
        }
    }
}
