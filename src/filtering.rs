//! Size filtering and sorting for display.
//!
//! Collections preserve the tool's emission order and keep every entry; the
//! binary narrows and orders them here before printing.

use std::cmp::Reverse;

use crate::config::{SortCriteria, SortOptions};
use crate::entry::UsageEntry;
use crate::utils::blocks_to_bytes;

/// Keep entries whose size in bytes is at least `min_bytes`.
///
/// `block_size` converts the reported size into bytes. Entries whose size
/// could not be parsed are always kept so they stay visible to the user.
#[must_use]
pub fn filter_entries(
    entries: Vec<UsageEntry>,
    min_bytes: u64,
    block_size: u64,
) -> Vec<UsageEntry> {
    if min_bytes == 0 {
        return entries;
    }

    entries
        .into_iter()
        .filter(|entry| {
            entry
                .size
                .is_none_or(|size| blocks_to_bytes(size, block_size) >= min_bytes)
        })
        .collect()
}

/// Sort entries in place.
///
/// With no criterion the emission order is left alone (`reverse` still
/// applies). `Size` puts the largest first, with unparseable sizes last;
/// `Path` sorts alphabetically. The sort is stable.
pub fn sort_entries(entries: &mut [UsageEntry], sort_opts: &SortOptions) {
    match sort_opts.criteria {
        Some(SortCriteria::Size) => entries.sort_by_key(|e| Reverse(e.size)),
        Some(SortCriteria::Path) => entries.sort_by(|a, b| a.path.cmp(&b.path)),
        None => {}
    }

    if sort_opts.reverse {
        entries.reverse();
    }
}
