//! Annotated records, the violation frequency summary and per-file totals.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::loader::LoadStats;
use crate::record::{Field, LedgerRecord};
use crate::rules::Violation;

/// Annotation of a record that passed every rule.
pub const NO_ERRORS: &str = "Sem erros";

/// Separator between messages in the annotation column.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// A record together with the violations found on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    pub record: LedgerRecord,
    pub violations: Vec<Violation>,
}

impl AnnotatedRecord {
    pub fn new(record: LedgerRecord, violations: Vec<Violation>) -> Self {
        Self { record, violations }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Value of the `Erro` column: [`NO_ERRORS`] or the joined messages.
    pub fn annotation(&self) -> String {
        if self.is_clean() {
            return NO_ERRORS.to_string();
        }
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }
}

impl Serialize for AnnotatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let fields: serde_json::Map<String, serde_json::Value> = Field::ALL
            .iter()
            .map(|f| (f.label().to_string(), self.record.raw(*f).into()))
            .collect();
        let mut state = serializer.serialize_struct("AnnotatedRecord", 4)?;
        state.serialize_field("line", &self.record.line)?;
        state.serialize_field("fields", &fields)?;
        state.serialize_field("violations", &self.violations)?;
        state.serialize_field("annotation", &self.annotation())?;
        state.end()
    }
}

/// One line of the frequency summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub message: String,
    pub count: usize,
}

/// Violation message frequencies, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    rows: Vec<SummaryRow>,
}

impl Summary {
    /// Count each distinct message once per record.
    ///
    /// Ties keep the order in which messages were first seen.
    pub fn from_annotated(records: &[AnnotatedRecord]) -> Self {
        let mut rows: Vec<SummaryRow> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for annotated in records {
            let mut seen_here: Vec<&str> = Vec::new();
            for violation in &annotated.violations {
                let message = violation.message.as_str();
                if seen_here.contains(&message) {
                    continue;
                }
                seen_here.push(message);
                match positions.get(message) {
                    Some(&pos) => rows[pos].count += 1,
                    None => {
                        positions.insert(message, rows.len());
                        rows.push(SummaryRow {
                            message: message.to_string(),
                            count: 1,
                        });
                    }
                }
            }
        }

        // Vec::sort_by is stable.
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Self { rows }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Occurrences of an exact message.
    pub fn count_of(&self, message: &str) -> usize {
        self.rows
            .iter()
            .find(|row| row.message == message)
            .map(|row| row.count)
            .unwrap_or(0)
    }
}

/// Figures describing one validated file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub records: usize,
    pub records_with_errors: usize,
    pub violations: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub debit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub credit: Decimal,
    /// Non-empty debit/credit values that could not be read as amounts, or
    /// that would overflow the running total
    pub unparsed_amounts: usize,
}

impl Totals {
    pub fn from_annotated(records: &[AnnotatedRecord]) -> Self {
        let mut totals = Totals {
            records: records.len(),
            ..Totals::default()
        };
        for annotated in records {
            if !annotated.is_clean() {
                totals.records_with_errors += 1;
            }
            totals.violations += annotated.violations.len();
            for (field, sum) in [
                (Field::Debit, &mut totals.debit),
                (Field::Credit, &mut totals.credit),
            ] {
                let raw = annotated.record.get(field);
                if raw.is_empty() {
                    continue;
                }
                match parse_amount(raw).and_then(|amount| sum.checked_add(amount)) {
                    Some(total) => *sum = total,
                    None => {
                        totals.unparsed_amounts += 1;
                        tracing::debug!(
                            line = annotated.record.line,
                            value = raw,
                            "amount not parsed or out of range"
                        );
                    }
                }
            }
        }
        totals
    }
}

/// Parse a Portuguese-formatted amount (`1.234,56`, `-12,5`, `1234`).
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Everything produced for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Name of the input as given by the caller
    pub source: String,
    /// Archive entry used, for zipped input
    pub entry: Option<String>,
    pub ignored_entries: Vec<String>,
    pub stats: LoadStats,
    pub totals: Totals,
    pub summary: Summary,
    pub records: Vec<AnnotatedRecord>,
}

impl FileReport {
    pub fn has_violations(&self) -> bool {
        self.totals.records_with_errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record_with;
    use crate::rules::RuleId;

    fn annotated(messages: &[&str]) -> AnnotatedRecord {
        AnnotatedRecord::new(
            record_with(1, &[]),
            messages
                .iter()
                .map(|m| Violation {
                    rule: RuleId::Measure,
                    message: (*m).to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_annotation_sentinel() {
        assert_eq!(annotated(&[]).annotation(), NO_ERRORS);
    }

    #[test]
    fn test_annotation_joined() {
        assert_eq!(annotated(&["a", "b"]).annotation(), "a; b");
    }

    #[test]
    fn test_summary_counts_once_per_record() {
        let records = vec![annotated(&["a", "a", "b"]), annotated(&["a"])];
        let summary = Summary::from_annotated(&records);
        assert_eq!(summary.count_of("a"), 2);
        assert_eq!(summary.count_of("b"), 1);
    }

    #[test]
    fn test_summary_order_count_then_first_seen() {
        let records = vec![
            annotated(&["x"]),
            annotated(&["y"]),
            annotated(&["z", "y"]),
            annotated(&["z"]),
        ];
        let summary = Summary::from_annotated(&records);
        let messages: Vec<&str> = summary.rows().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["y", "z", "x"]);
    }

    #[test]
    fn test_summary_empty() {
        let summary = Summary::from_annotated(&[annotated(&[])]);
        assert!(summary.is_empty());
        assert!(Summary::from_annotated(&[]).is_empty());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.234,56"), Decimal::from_str("1234.56").ok());
        assert_eq!(parse_amount("-12,5"), Decimal::from_str("-12.5").ok());
        assert_eq!(parse_amount("1234"), Decimal::from_str("1234").ok());
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(" "), None);
    }

    #[test]
    fn test_totals() {
        let mut first = annotated(&["a"]);
        first.record = record_with(1, &[(Field::Debit, "1.000,50"), (Field::Credit, "x")]);
        let mut second = annotated(&[]);
        second.record = record_with(2, &[(Field::Credit, "'250,25")]);

        let totals = Totals::from_annotated(&[first, second]);
        assert_eq!(totals.records, 2);
        assert_eq!(totals.records_with_errors, 1);
        assert_eq!(totals.violations, 1);
        assert_eq!(totals.debit, Decimal::from_str("1000.50").unwrap());
        assert_eq!(totals.credit, Decimal::from_str("250.25").unwrap());
        assert_eq!(totals.unparsed_amounts, 1);
    }

    #[test]
    fn test_totals_overflow_is_counted_not_summed() {
        let max = "79228162514264337593543950335";
        let mut first = annotated(&[]);
        first.record = record_with(1, &[(Field::Debit, max)]);
        let mut second = annotated(&[]);
        second.record = record_with(2, &[(Field::Debit, max), (Field::Credit, "10,00")]);

        let totals = Totals::from_annotated(&[first, second]);
        assert_eq!(totals.debit, Decimal::MAX);
        assert_eq!(totals.credit, Decimal::from_str("10.00").unwrap());
        assert_eq!(totals.unparsed_amounts, 1);
    }
}
