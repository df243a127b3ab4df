//! Output formatting for validation results.
//!
//! Results are rendered as JSON (`--json`) or as text through the UI
//! layer (tables on a terminal, `key=value` lines otherwise).

mod json;
mod text;

use std::path::{Path, PathBuf};

use sncap_core::FileReport;

pub use json::batch_json;
pub use text::{print_batch_footer, print_outcome};

/// Files written for one validated input.
#[derive(Debug, Clone)]
pub struct WrittenOutputs {
    pub annotated: PathBuf,
    pub summary: PathBuf,
}

/// Result of one input file on the command line.
#[derive(Debug)]
pub enum FileOutcome {
    Validated {
        path: PathBuf,
        report: FileReport,
        outputs: Option<WrittenOutputs>,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Validated { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn has_violations(&self) -> bool {
        match self {
            Self::Validated { report, .. } => report.has_violations(),
            Self::Failed { .. } => false,
        }
    }

    /// "ok", "violations" or "failed".
    pub fn status(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "failed",
            _ if self.has_violations() => "violations",
            _ => "ok",
        }
    }
}
