//! Load, validate and summarise input files.

use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::loader::load;
use crate::report::{FileReport, Summary, Totals};
use crate::rules::validate;

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub source: String,
    pub result: Result<FileReport>,
}

/// Validate a single export.
///
/// An export with no data rows yields an empty report, not an error.
pub fn validate_file(source: &str, bytes: &[u8], config: &ValidatorConfig) -> Result<FileReport> {
    let loaded = load(source, bytes, &config.input)?;
    let records = validate(loaded.records, &config.rules);
    let summary = Summary::from_annotated(&records);
    let totals = Totals::from_annotated(&records);

    tracing::info!(
        source,
        records = totals.records,
        records_with_errors = totals.records_with_errors,
        skipped = loaded.stats.malformed_rows,
        "file validated"
    );

    Ok(FileReport {
        source: source.to_string(),
        entry: loaded.entry,
        ignored_entries: loaded.ignored_entries,
        stats: loaded.stats,
        totals,
        summary,
        records,
    })
}

/// Validate several exports one after the other.
///
/// A failing file is reported in its [`BatchItem`] and does not stop the
/// remaining files. `on_done` is called after each file, e.g. to advance a
/// progress display.
pub fn validate_batch<I, N, B, F>(
    inputs: I,
    config: &ValidatorConfig,
    mut on_done: F,
) -> Vec<BatchItem>
where
    I: IntoIterator<Item = (N, B)>,
    N: Into<String>,
    B: AsRef<[u8]>,
    F: FnMut(&BatchItem),
{
    let mut items = Vec::new();
    for (source, bytes) in inputs {
        let source = source.into();
        let result = validate_file(&source, bytes.as_ref(), config);
        if let Err(err) = &result {
            tracing::warn!(source = %source, error = %err, "file not validated");
        }
        let item = BatchItem { source, result };
        on_done(&item);
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SncapError;

    #[test]
    fn test_empty_input_is_empty_report() {
        let report = validate_file("vazio.csv", b"", &ValidatorConfig::default()).unwrap();
        assert!(report.records.is_empty());
        assert!(report.summary.is_empty());
        assert!(!report.has_violations());
    }

    #[test]
    fn test_batch_isolates_failures() {
        let config = ValidatorConfig::default();
        let mut seen = 0;
        let items = validate_batch(
            vec![
                ("partido.zip", b"PK\x03\x04???".to_vec()),
                ("vazio.csv", Vec::new()),
            ],
            &config,
            |_| seen += 1,
        );
        assert_eq!(seen, 2);
        assert!(matches!(items[0].result, Err(SncapError::Archive(_))));
        assert!(items[1].result.is_ok());
        assert_eq!(items[1].source, "vazio.csv");
    }
}
