//! Text and table output for validation results.

use sncap_core::export::SUMMARY_HEADER;
use sncap_core::FileReport;

use super::{FileOutcome, WrittenOutputs};
use crate::ui::format::{count, truncate_start};
use crate::ui::{
    badge, blank_line, divider, hint, kv, print, print_error, table, Badge, Column, UiContext,
};

const SUMMARY_COLUMNS: [Column; 2] = [
    Column::new(SUMMARY_HEADER[0]),
    Column::numeric(SUMMARY_HEADER[1]),
];

/// Print one file's result. Failures go to stderr.
pub fn print_outcome(ctx: &UiContext, outcome: &FileOutcome) {
    let label = truncate_start(&outcome.path().display().to_string(), 60);
    match outcome {
        FileOutcome::Failed { error, .. } => {
            let message = format!("{}: {}", label, error);
            print_error(ctx, &message, None);
        }
        FileOutcome::Validated {
            report, outputs, ..
        } => {
            if ctx.mode.is_pretty() {
                print_pretty(ctx, &label, report, outputs.as_ref());
            } else {
                print_plain(ctx, &label, outcome.status(), report, outputs.as_ref());
            }
        }
    }
}

fn print_pretty(
    ctx: &UiContext,
    label: &str,
    report: &FileReport,
    outputs: Option<&WrittenOutputs>,
) {
    let totals = &report.totals;
    let records = count(totals.records, "record", "records");
    let line = if report.has_violations() {
        badge(
            ctx,
            Badge::Warn,
            &format!(
                "{}: {}, {} with errors",
                label, records, totals.records_with_errors
            ),
        )
    } else {
        badge(ctx, Badge::Ok, &format!("{}: {}, no errors", label, records))
    };
    print(ctx, &line);

    for detail in details(ctx, report, outputs) {
        print(ctx, &format!("  {}", detail));
    }

    if !report.summary.is_empty() {
        print(ctx, &table(ctx, &SUMMARY_COLUMNS, &summary_rows(report)));
    }
    blank_line(ctx);
}

fn print_plain(
    ctx: &UiContext,
    label: &str,
    status: &str,
    report: &FileReport,
    outputs: Option<&WrittenOutputs>,
) {
    let totals = &report.totals;
    let mut lines = vec![
        kv(ctx, "File", label),
        kv(ctx, "Status", status),
        kv(ctx, "Records", &totals.records.to_string()),
        kv(ctx, "Records With Errors", &totals.records_with_errors.to_string()),
        kv(ctx, "Violations", &totals.violations.to_string()),
    ];
    lines.extend(details(ctx, report, outputs));
    for line in lines {
        print(ctx, &line);
    }
    if !report.summary.is_empty() {
        print(ctx, &table(ctx, &SUMMARY_COLUMNS, &summary_rows(report)));
    }
    print(ctx, &divider(ctx));
}

/// Optional lines shared by both text modes.
fn details(ctx: &UiContext, report: &FileReport, outputs: Option<&WrittenOutputs>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(entry) = &report.entry {
        lines.push(kv(ctx, "Entry", entry));
    }
    if !report.ignored_entries.is_empty() {
        lines.push(kv(ctx, "Ignored Entries", &report.ignored_entries.join(", ")));
    }
    if report.stats.malformed_rows > 0 {
        lines.push(kv(ctx, "Skipped Rows", &report.stats.malformed_rows.to_string()));
    }
    if report.stats.decode_replacements {
        lines.push(kv(ctx, "Encoding", "some bytes could not be decoded"));
    }
    if report.totals.records > 0 {
        lines.push(kv(ctx, "Debit", &report.totals.debit.to_string()));
        lines.push(kv(ctx, "Credit", &report.totals.credit.to_string()));
    }
    if let Some(outputs) = outputs {
        lines.push(kv(ctx, "Annotated", &outputs.annotated.display().to_string()));
        lines.push(kv(ctx, "Summary", &outputs.summary.display().to_string()));
    }
    lines
}

fn summary_rows(report: &FileReport) -> Vec<Vec<String>> {
    report
        .summary
        .rows()
        .iter()
        .map(|row| vec![row.message.clone(), row.count.to_string()])
        .collect()
}

/// Print the batch totals line, plus a hint when files failed.
pub fn print_batch_footer(ctx: &UiContext, outcomes: &[FileOutcome]) {
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    let with_violations = outcomes.iter().filter(|o| o.has_violations()).count();

    if ctx.mode.is_pretty() {
        let message = format!(
            "{}, {} with violations, {} failed",
            count(outcomes.len(), "file", "files"),
            with_violations,
            failed
        );
        let kind = if failed > 0 {
            Badge::Err
        } else if with_violations > 0 {
            Badge::Warn
        } else {
            Badge::Ok
        };
        print(ctx, &badge(ctx, kind, &message));
    } else {
        print(ctx, &kv(ctx, "Files", &outcomes.len().to_string()));
        print(ctx, &kv(ctx, "With Violations", &with_violations.to_string()));
        print(ctx, &kv(ctx, "Failed", &failed.to_string()));
    }

    if failed > 0 {
        print(ctx, &hint(ctx, "Run with -v for details on the failed files."));
    }
}
