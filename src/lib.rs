//! # dir-usage
//!
//! Runs `du` with null-delimited output, parses each `<size><whitespace><path>`
//! record, and drops the intermediate directory entries `du` prints right
//! after one of their descendants.
//!
//! ```no_run
//! use std::path::Path;
//! use dir_usage::{UsageCollector, runner::ShellRunner};
//!
//! let collector = UsageCollector::new(ShellRunner);
//! for entry in collector.collect(Some(Path::new("src")), Some(1))? {
//!     println!("{:?}\t{}", entry.size, entry.path);
//! }
//! # Ok::<(), dir_usage::UsageError>(())
//! ```

pub mod collector;
pub mod config;
pub mod entry;
pub mod error;
pub mod filtering;
pub mod output;
pub mod runner;
pub mod utils;

pub use collector::{UsageCollector, build_args, parse_output};
pub use config::{CollectOptions, DisplayOptions, SortCriteria, SortOptions};
pub use entry::UsageEntry;
pub use error::UsageError;
pub use runner::{CapturedOutput, ProcessRunner};
