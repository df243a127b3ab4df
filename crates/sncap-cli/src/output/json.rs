//! JSON output for validation results.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use sncap_core::VERSION;

use super::FileOutcome;

/// Convert one file outcome to JSON. Annotated records are included only
/// when `with_records` is set.
pub fn outcome_json(outcome: &FileOutcome, with_records: bool) -> serde_json::Value {
    match outcome {
        FileOutcome::Validated {
            path,
            report,
            outputs,
        } => {
            let outputs = outputs.as_ref().map(|o| {
                serde_json::json!({
                    "annotated": o.annotated.display().to_string(),
                    "summary": o.summary.display().to_string(),
                })
            });
            let mut value = serde_json::json!({
                "source": path.display().to_string(),
                "status": outcome.status(),
                "entry": report.entry,
                "ignored_entries": report.ignored_entries,
                "stats": report.stats,
                "totals": report.totals,
                "summary": report.summary,
                "outputs": outputs,
            });
            if with_records {
                value["records"] = serde_json::json!(report.records);
            }
            value
        }
        FileOutcome::Failed { path, error } => serde_json::json!({
            "source": path.display().to_string(),
            "status": outcome.status(),
            "error": error,
        }),
    }
}

/// The whole batch as one JSON document.
pub fn batch_json(
    outcomes: &[FileOutcome],
    config_path: Option<&Path>,
    with_records: bool,
) -> serde_json::Value {
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    let with_violations = outcomes.iter().filter(|o| o.has_violations()).count();
    serde_json::json!({
        "version": VERSION,
        "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "config": config_path.map(|p| p.display().to_string()),
        "files": outcomes
            .iter()
            .map(|o| outcome_json(o, with_records))
            .collect::<Vec<_>>(),
        "counts": {
            "files": outcomes.len(),
            "failed": failed,
            "with_violations": with_violations,
        },
    })
}
