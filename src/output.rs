//! Human-readable and JSON rendering of collection results.
//!
//! With `--json` a single [`JsonOutput`] document is printed to stdout and
//! nothing else; otherwise [`print_report`] writes a coloured table per root.

use colored::Colorize;
use humansize::{BINARY, format_size};
use serde::Serialize;

use crate::entry::UsageEntry;
use crate::utils::blocks_to_bytes;

/// The entries (or the error) produced for one requested directory.
#[derive(Debug)]
pub struct RootReport {
    /// Directory as requested on the command line or in the config file
    pub root: String,

    /// Entries after display filtering, or the error message
    pub result: Result<Vec<UsageEntry>, String>,
}

/// Top-level JSON document.
#[derive(Serialize, Debug)]
pub struct JsonOutput {
    /// One object per requested directory, in request order
    pub roots: Vec<JsonRoot>,

    /// Totals across all successful roots
    pub summary: JsonSummary,
}

/// Results for one requested directory.
#[derive(Serialize, Debug)]
pub struct JsonRoot {
    /// Directory as requested
    pub root: String,

    /// Reported entries; empty when `error` is set
    pub entries: Vec<JsonEntry>,

    /// Error message when the collection failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single entry in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonEntry {
    /// Path as printed by the tool
    pub path: String,

    /// Size in the tool's units, `null` if it could not be parsed
    pub size: Option<u64>,

    /// Size converted to bytes
    pub size_bytes: Option<u64>,

    /// Human-readable size (e.g. `"1.5 MiB"`)
    pub size_formatted: Option<String>,
}

/// Aggregate statistics.
#[derive(Serialize, Debug)]
pub struct JsonSummary {
    /// Number of entries across all roots
    pub total_entries: usize,

    /// Sum of all parseable sizes, in bytes
    pub total_bytes: u64,

    /// Human-readable total
    pub total_formatted: String,

    /// Number of roots whose collection failed
    pub failed_roots: usize,
}

impl JsonOutput {
    /// Build the JSON document from per-root reports.
    #[must_use]
    pub fn from_reports(reports: &[RootReport], block_size: u64) -> Self {
        let roots: Vec<JsonRoot> = reports
            .iter()
            .map(|report| JsonRoot::from_report(report, block_size))
            .collect();

        Self {
            summary: JsonSummary::from_reports(reports, block_size),
            roots,
        }
    }
}

impl JsonRoot {
    fn from_report(report: &RootReport, block_size: u64) -> Self {
        match &report.result {
            Ok(entries) => Self {
                root: report.root.clone(),
                entries: entries
                    .iter()
                    .map(|e| JsonEntry::from_entry(e, block_size))
                    .collect(),
                error: None,
            },
            Err(message) => Self {
                root: report.root.clone(),
                entries: Vec::new(),
                error: Some(message.clone()),
            },
        }
    }
}

impl JsonEntry {
    /// Convert a [`UsageEntry`] using `block_size` bytes per reported unit.
    #[must_use]
    pub fn from_entry(entry: &UsageEntry, block_size: u64) -> Self {
        let size_bytes = entry.size.map(|s| blocks_to_bytes(s, block_size));
        Self {
            path: entry.path.clone(),
            size: entry.size,
            size_bytes,
            size_formatted: size_bytes.map(|b| format_size(b, BINARY)),
        }
    }
}

impl JsonSummary {
    fn from_reports(reports: &[RootReport], block_size: u64) -> Self {
        let mut total_entries = 0;
        let mut total_bytes = 0u64;
        let mut failed_roots = 0;

        for report in reports {
            match &report.result {
                Ok(entries) => {
                    total_entries += entries.len();
                    total_bytes = total_bytes.saturating_add(total_size(entries, block_size));
                }
                Err(_) => failed_roots += 1,
            }
        }

        Self {
            total_entries,
            total_bytes,
            total_formatted: format_size(total_bytes, BINARY),
            failed_roots,
        }
    }
}

/// Sum of all parseable sizes in bytes.
#[must_use]
pub fn total_size(entries: &[UsageEntry], block_size: u64) -> u64 {
    entries
        .iter()
        .filter_map(|e| e.size)
        .fold(0u64, |acc, s| acc.saturating_add(blocks_to_bytes(s, block_size)))
}

/// Print a coloured report for every root.
pub fn print_report(reports: &[RootReport], block_size: u64) {
    for report in reports {
        println!("\n{} {}", "📂".bold(), report.root.bold());

        match &report.result {
            Ok(entries) if entries.is_empty() => {
                println!("  {}", "✨ Nothing to report".green());
            }
            Ok(entries) => {
                for entry in entries {
                    println!("  {}", format_entry(entry, block_size));
                }
                println!(
                    "  {} {} in {} entries",
                    "Total:".bold(),
                    format_size(total_size(entries, block_size), BINARY).bright_white(),
                    entries.len()
                );
            }
            Err(message) => {
                println!("  {} {}", "❌".red(), message.trim_end().red());
            }
        }
    }
}

/// One table line: the right-aligned human size, then the path.
#[must_use]
pub fn format_entry(entry: &UsageEntry, block_size: u64) -> String {
    let size = entry.size.map_or_else(
        || "?".to_string(),
        |s| format_size(blocks_to_bytes(s, block_size), BINARY),
    );
    format!("{size:>12}  {}", entry.path)
}
