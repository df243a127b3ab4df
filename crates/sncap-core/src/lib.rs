//! # SNC-AP Core
//!
//! Core library for sncap - a validator for SNC-AP ledger ("razão") exports.
//!
//! This crate provides the loading, rule evaluation and reporting logic
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **archive**: Pick the data file out of a zip export
//! - **decode**: Legacy single-byte text decoding
//! - **loader**: Preamble skipping, row parsing and filtering
//! - **normalize**: Field cleanup before comparison
//! - **record**: Fixed 36-column ledger layout
//! - **rules**: Rule tables and the evaluator
//! - **report**: Annotation, frequency summary and totals
//! - **pipeline**: Per-file and batch validation
//! - **export**: Annotated and summary CSV writers

pub mod archive;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod rules;

pub use config::{InputFormat, ValidatorConfig};
pub use error::{Result, SncapError};
pub use loader::{load, LoadStats, LoadedLedger};
pub use normalize::normalize;
pub use pipeline::{validate_batch, validate_file, BatchItem};
pub use record::{Field, LedgerRecord};
pub use report::{AnnotatedRecord, FileReport, Summary, SummaryRow, NO_ERRORS};
pub use rules::{validate, RuleEvaluator, RuleId, RuleSet, Violation};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
