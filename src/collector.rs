//! Disk usage collection.
//!
//! [`UsageCollector`] resolves a start path, runs `du -0 [-d DEPTH] PATH`
//! through a [`ProcessRunner`], and turns its null-delimited output into a
//! flat list of [`UsageEntry`] values in the order `du` printed them.
//!
//! `du` prints a directory right after its last descendant. Whenever a record
//! is immediately preceded by a record whose path extends its own, it is an
//! intermediate directory whose size already covers that descendant, and it
//! is dropped from the result.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::config::CollectOptions;
use crate::entry::UsageEntry;
use crate::error::{Result, UsageError};
use crate::runner::{DirectRunner, ProcessRunner, ShellRunner};
use crate::utils::resolve_against;

/// Default external tool.
pub const DEFAULT_PROGRAM: &str = "du";

/// Flag asking `du` to end each output line with a NUL byte instead of a newline.
const NULL_TERMINATED_FLAG: &str = "-0";

/// Flag limiting how many directory levels `du` reports.
const DEPTH_FLAG: &str = "-d";

/// Runs the disk usage tool and parses its output.
#[derive(Debug, Clone)]
pub struct UsageCollector<R> {
    runner: R,
    program: String,
    working_dir: Option<PathBuf>,
}

/// Production runner chosen from configuration.
#[derive(Debug, Clone, Copy)]
pub enum SystemRunner {
    /// Through `sh -c` / `cmd /C`
    Shell(ShellRunner),
    /// Without a shell
    Direct(DirectRunner),
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<crate::runner::CapturedOutput> {
        match self {
            Self::Shell(runner) => runner.run(program, args),
            Self::Direct(runner) => runner.run(program, args),
        }
    }
}

impl UsageCollector<SystemRunner> {
    /// Build a collector backed by a real process, configured from `options`.
    #[must_use]
    pub fn from_options(options: &CollectOptions) -> Self {
        let runner = if options.shell {
            SystemRunner::Shell(ShellRunner)
        } else {
            SystemRunner::Direct(DirectRunner)
        };
        Self::new(runner).with_program(options.program.clone())
    }
}

impl<R: ProcessRunner> UsageCollector<R> {
    /// Create a collector that launches `du` through `runner`.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: DEFAULT_PROGRAM.to_string(),
            working_dir: None,
        }
    }

    /// Use a different program in place of `du`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Resolve relative start paths against `dir` instead of the process's
    /// current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The program this collector launches.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve `start_path` (default `.`) into the absolute path handed to `du`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::WorkingDir`] if the current directory is needed
    /// and cannot be read.
    pub fn resolve(&self, start_path: Option<&Path>) -> Result<PathBuf> {
        let start_path = start_path.unwrap_or_else(|| Path::new("."));
        let base = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().map_err(|source| UsageError::WorkingDir { source })?,
        };
        Ok(resolve_against(&base, start_path))
    }

    /// Collect disk usage below `start_path`.
    ///
    /// `depth` limits how many levels below `start_path` are reported; `None`
    /// leaves it to `du` (unlimited). Entries come back in the order `du`
    /// printed them, minus empty records and intermediate directories.
    ///
    /// # Errors
    ///
    /// - [`UsageError::Invocation`] when `du` wrote anything to stderr; no
    ///   entries are returned in that case, even if stdout had content
    /// - [`UsageError::Spawn`] when the process cannot be started
    /// - [`UsageError::Stream`] when its output cannot be read
    /// - [`UsageError::WorkingDir`] when a relative path cannot be resolved
    pub fn collect(
        &self,
        start_path: Option<&Path>,
        depth: Option<usize>,
    ) -> Result<Vec<UsageEntry>> {
        let path = self.resolve(start_path)?;
        let args = build_args(&path, depth);
        debug!(program = %self.program, path = %path.display(), ?depth, "collecting disk usage");

        let output = self.runner.run(&self.program, &args)?;
        if !output.stderr.is_empty() {
            return Err(UsageError::invocation(output.stderr));
        }

        let entries = parse_output(&output.stdout);
        debug!(path = %path.display(), entries = entries.len(), "disk usage collected");
        Ok(entries)
    }
}

impl<R: ProcessRunner + Sync> UsageCollector<R> {
    /// Collect several start paths concurrently, one child process each.
    ///
    /// Results are returned in the same order as `paths`; a failure for one
    /// path does not affect the others.
    pub fn collect_many(
        &self,
        paths: &[PathBuf],
        depth: Option<usize>,
    ) -> Vec<(PathBuf, Result<Vec<UsageEntry>>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.collect(Some(path), depth)))
            .collect()
    }
}

/// Arguments for `du`: null-terminated records, optional depth, then the path.
#[must_use]
pub fn build_args(path: &Path, depth: Option<usize>) -> Vec<OsString> {
    let mut args = vec![OsString::from(NULL_TERMINATED_FLAG)];
    if let Some(depth) = depth {
        args.push(OsString::from(DEPTH_FLAG));
        args.push(OsString::from(depth.to_string()));
    }
    args.push(path.as_os_str().to_os_string());
    args
}

/// One record as printed, before intermediate directories are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRecord<'a> {
    size: Option<u64>,
    path: Option<&'a str>,
}

/// Parse the full stdout of `du -0` into entries.
#[must_use]
pub fn parse_output(stdout: &str) -> Vec<UsageEntry> {
    drop_intermediate(stdout.split('\0').map(parse_record))
}

/// Split a record into its size and path at the first run of whitespace.
fn parse_record(record: &str) -> RawRecord<'_> {
    let record = record.trim_start();
    let Some(split) = record.find(char::is_whitespace) else {
        return RawRecord {
            size: parse_leading_digits(record),
            path: None,
        };
    };

    let (size, rest) = record.split_at(split);
    let path = rest.trim_start();
    RawRecord {
        size: parse_leading_digits(size),
        path: (!path.is_empty()).then_some(path),
    }
}

/// Parse the leading decimal digits of `token`; `None` if there are none.
fn parse_leading_digits(token: &str) -> Option<u64> {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().ok()
}

/// Drop pathless records and records whose raw predecessor's path starts with
/// their own.
fn drop_intermediate<'a>(records: impl Iterator<Item = RawRecord<'a>>) -> Vec<UsageEntry> {
    let mut entries = Vec::new();
    let mut previous: Option<&str> = None;

    for record in records {
        let prev = std::mem::replace(&mut previous, record.path);
        let Some(path) = record.path else {
            continue;
        };
        if prev.is_some_and(|prev| prev.starts_with(path)) {
            continue;
        }
        entries.push(UsageEntry::new(path, record.size));
    }

    entries
}
