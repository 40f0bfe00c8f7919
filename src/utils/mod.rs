//! Utility functions and helpers.
//!
//! Size parsing for user-supplied thresholds and lexical path resolution for
//! the directories handed to `du`.

pub mod path;
pub mod size;

pub use path::resolve_against;
pub use size::{blocks_to_bytes, parse_size};
