//! Options controlling how the disk usage tool is invoked.

use crate::collector::DEFAULT_PROGRAM;

/// Configuration for a collection run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectOptions {
    /// Program to launch (`du` unless overridden)
    pub program: String,

    /// Maximum depth reported below each start path (None = unlimited)
    pub depth: Option<usize>,

    /// Whether to launch the program through the command shell
    pub shell: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            depth: None,
            shell: true,
        }
    }
}
