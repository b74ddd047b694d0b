//! Keyword-count approximation of cyclomatic complexity.
//!
//! Used only when the tree-sitter engine cannot run. The score is for the
//! whole file, not per function.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ComplexityResult, EngineKind, FileMetrics, MetricsEngine};
use crate::protocol::ComplexityEntry;

/// Name of the single entry reported for a file.
pub const WHOLE_FILE: &str = "(file)";

/// Note attached to every rough record.
pub const ROUGH_NOTE: &str = "python metrics engine unavailable; reported a rough whole-file score";

static BRANCH_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|elif|else|for|while|with)\b").unwrap());

static BOOL_KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:and|or)\b").unwrap());

static TRY_KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btry\b|\bexcept\b").unwrap());

/// Rough score of `source`: 1 plus one per branching, boolean and
/// exception keyword occurrence.
pub fn rough_cyclomatic(source: &str) -> u32 {
    let hits = [&*BRANCH_KEYWORDS, &*BOOL_KEYWORDS, &*TRY_KEYWORDS]
        .iter()
        .map(|pattern| pattern.find_iter(source).count())
        .sum::<usize>();
    1 + u32::try_from(hits).unwrap_or(u32::MAX - 1)
}

/// Engine that reports [`rough_cyclomatic`] as a single entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoughEngine;

impl MetricsEngine for RoughEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Rough
    }

    fn analyze(&mut self, source: &str) -> ComplexityResult<FileMetrics> {
        Ok(FileMetrics {
            functions: vec![ComplexityEntry {
                name: WHOLE_FILE.to_string(),
                complexity: rough_cyclomatic(source),
                line: 1,
            }],
            maintainability_index: None,
            note: Some(ROUGH_NOTE.to_string()),
        })
    }
}
