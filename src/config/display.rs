//! Presentation options: size threshold, block size and sort order.
//!
//! These only affect what the binary prints. A collection always returns
//! entries unfiltered by size and in the order the tool emitted them.

use clap::ValueEnum;

/// Block size GNU `du` reports in when no unit flag is given.
pub const DEFAULT_BLOCK_SIZE: u64 = 1_024;

/// Criteria for sorting entries before display.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum SortCriteria {
    /// Largest first
    Size,

    /// Alphabetical by path
    Path,
}

/// Sorting configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Criterion to sort by, or `None` to keep emission order
    pub criteria: Option<SortCriteria>,

    /// Flip the resulting order
    pub reverse: bool,
}

/// Display configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Hide entries smaller than this human-readable size (e.g. `"10MB"`)
    pub min_size: String,

    /// Bytes per reported unit
    pub block_size: u64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            min_size: "0".to_string(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}
