//! The record type returned by a disk usage collection.

use serde::Serialize;

/// One path reported by the disk usage tool together with its size.
///
/// The size unit is whatever the tool reports (1 KiB blocks for GNU `du`
/// without extra flags). A size that could not be parsed is kept as `None`
/// instead of failing the whole collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    /// Path exactly as printed by the tool
    pub path: String,

    /// Reported size, or `None` when the size field was not a number
    pub size: Option<u64>,
}

impl UsageEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// The reported size, treating an unparseable size as zero.
    #[must_use]
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}
