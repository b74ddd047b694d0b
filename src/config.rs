//! Runner configuration.
//!
//! The request envelope carries everything per-call; this holds the few
//! process-wide settings taken from the command line and environment.

use std::io;
use std::path::PathBuf;

/// Environment variable that forces the rough complexity engine.
pub const ROUGH_COMPLEXITY_ENV: &str = "CODESCOPE_ROUGH_COMPLEXITY";

/// Process-wide settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Workspace root used when a request does not name one.
    pub default_workspace_root: PathBuf,
    /// Skip the tree-sitter engine and report rough scores.
    pub force_rough_complexity: bool,
}

impl RunnerConfig {
    pub fn new(default_workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            default_workspace_root: default_workspace_root.into(),
            force_rough_complexity: false,
        }
    }

    /// Configuration rooted at the process working directory.
    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn with_rough_complexity(mut self, force: bool) -> Self {
        self.force_rough_complexity = force;
        self
    }
}
