//! Configuration types.
//!
//! - [`CollectOptions`] - how `du` is invoked
//! - [`DisplayOptions`], [`SortOptions`] - how results are presented
//! - [`FileConfig`] - values loaded from `config.toml`, used as defaults under CLI arguments

pub mod collect;
pub mod display;
pub mod file;

pub use collect::CollectOptions;
pub use display::{DEFAULT_BLOCK_SIZE, DisplayOptions, SortCriteria, SortOptions};
pub use file::FileConfig;
