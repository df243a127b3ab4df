use std::io::{Cursor, Write};

use sncap_core::export::write_annotated_csv;
use sncap_core::record::COLUMN_COUNT;
use sncap_core::{validate_file, Field, SncapError, ValidatorConfig, NO_ERRORS};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builder for ledger exports in the accounting system's layout.
struct Export {
    rows: Vec<Vec<String>>,
}

impl Export {
    fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn row(mut self, fields: &[(Field, &str)]) -> Self {
        let mut values = vec![String::new(); COLUMN_COUNT];
        for (field, value) in fields {
            values[field.index()] = (*value).to_string();
        }
        self.rows.push(values);
        self
    }

    fn bytes(&self) -> Vec<u8> {
        let mut text = String::new();
        text.push_str("Município de Exemplo\r\n");
        text.push_str("Razão Geral\r\n");
        for i in 0..8 {
            text.push_str(&format!("Parâmetro {};valor\r\n", i));
        }
        let header: Vec<&str> = Field::ALL.iter().map(|f| f.label()).collect();
        text.push_str(&header.join(";"));
        text.push_str("\r\n");
        for row in &self.rows {
            text.push_str(&row.join(";"));
            text.push_str("\r\n");
        }
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
        bytes.into_owned()
    }
}

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(contents).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

fn clean_expense<'a>(document: &'a str, account: &'a str) -> Vec<(Field, &'a str)> {
    vec![
        (Field::Account, account),
        (Field::PostingDate, "2024-03-01"),
        (Field::EntryType, "CO"),
        (Field::DocumentId, document),
        (Field::Debit, "1.500,00"),
        (Field::RevenueExpenseFlag, "D"),
        (Field::FinancingSource, "'511"),
        (Field::OrganizationalClassification, "'0103"),
        (Field::Measure, "022"),
        (Field::FunctionalClassification, "0111"),
    ]
}

#[test]
fn test_opening_balance_never_reaches_output() {
    let export = Export::new()
        .row(&[
            (Field::Account, "0281.02.02.22.H0.00"),
            (Field::PostingDate, "Saldo Inicial"),
        ])
        .row(&clean_expense("CO-1", "0281.02.02.22.H0.00"))
        .row(&[
            (Field::Account, "0272.02.02.22.H0.00"),
            (Field::PostingDate, "2024-03-01"),
            (Field::EntryType, "CO"),
            (Field::DocumentId, "CO-1"),
            (Field::RevenueExpenseFlag, "D"),
        ]);

    let report = validate_file("razao.csv", &export.bytes(), &ValidatorConfig::default())
        .expect("validate should succeed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.opening_balance_rows, 1);
    assert!(report
        .records
        .iter()
        .all(|r| !r.record.raw(Field::PostingDate).contains("Saldo Inicial")));
    assert_eq!(report.records[0].annotation(), NO_ERRORS);

    let total: usize = report.summary.rows().iter().map(|r| r.count).sum();
    let violations: usize = report
        .records
        .iter()
        .map(|r| {
            let mut messages: Vec<&str> = r.violations.iter().map(|v| v.message.as_str()).collect();
            messages.sort_unstable();
            messages.dedup();
            messages.len()
        })
        .sum();
    assert_eq!(total, violations);
}

#[test]
fn test_commitment_rubric_mismatch_end_to_end() {
    let mut credit = clean_expense("CO-7", "0272.02.02.22.H0.01");
    credit.retain(|(f, _)| *f != Field::Debit);
    credit.push((Field::Credit, "1.500,00"));

    let export = Export::new()
        .row(&clean_expense("CO-7", "0281.02.02.22.H0.00"))
        .row(&credit);

    let report = validate_file("razao.csv", &export.bytes(), &ValidatorConfig::default())
        .expect("validate should succeed");

    assert!(report.records[0].is_clean());
    assert_eq!(report.records[1].violations.len(), 1);
    let message = &report.records[1].violations[0].message;
    assert!(message.contains("CO-7"));
    assert!(message.contains("02.02.22.H0.01"));
    assert_eq!(report.summary.rows().len(), 1);
    assert_eq!(report.totals.debit, report.totals.credit);
}

#[test]
fn test_expense_commitment_with_wrong_source() {
    let mut fields = clean_expense("CO-3", "0281.01.01");
    fields.retain(|(f, _)| *f != Field::FinancingSource);
    fields.push((Field::FinancingSource, "521"));

    let report = validate_file(
        "razao.csv",
        &Export::new().row(&fields).bytes(),
        &ValidatorConfig::default(),
    )
    .expect("validate should succeed");

    let annotation = report.records[0].annotation();
    assert!(annotation.contains("CO"));
    assert!(annotation.contains("511"));
}

#[test]
fn test_zero_data_rows() {
    let report = validate_file("razao.csv", &Export::new().bytes(), &ValidatorConfig::default())
        .expect("validate should succeed");
    assert!(report.records.is_empty());
    assert!(report.summary.is_empty());
    assert_eq!(report.stats.header_rows, 1);

    let mut out = Vec::new();
    write_annotated_csv(&mut out, &report.records).expect("write should succeed");
    assert!(!out.is_empty());
}

#[test]
fn test_zipped_export() {
    let export = Export::new().row(&clean_expense("CO-1", "0281.01"));
    let bytes = zip_of(&[("razao_2024.csv", export.bytes().as_slice())]);

    let report = validate_file("razao.zip", &bytes, &ValidatorConfig::default())
        .expect("validate should succeed");
    assert_eq!(report.entry.as_deref(), Some("razao_2024.csv"));
    assert_eq!(report.records.len(), 1);
}

#[test]
fn test_zip_without_data_file() {
    let bytes = zip_of(&[("notas.pdf", "%PDF-1.4".as_bytes())]);
    let err = validate_file("razao.zip", &bytes, &ValidatorConfig::default()).unwrap_err();
    assert!(matches!(err, SncapError::NoDataFound(_)));
}

#[test]
fn test_short_rows_are_counted_not_fatal() {
    let mut bytes = Export::new().row(&clean_expense("CO-1", "0281.01")).bytes();
    bytes.extend_from_slice(b"0281.01;2024-03-01;CO\r\n");

    let report = validate_file("razao.csv", &bytes, &ValidatorConfig::default())
        .expect("validate should succeed");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.malformed_rows, 1);
}

#[test]
fn test_overridden_rules_apply() {
    let config: ValidatorConfig = serde_json::from_value(serde_json::json!({
        "rules": { "expense": { "functional_classification": "0450" } }
    }))
    .expect("partial config should deserialize");
    assert_eq!(config.rules.measure.required, "022");

    let report = validate_file(
        "razao.csv",
        &Export::new().row(&clean_expense("CO-1", "0281.01")).bytes(),
        &config,
    )
    .expect("validate should succeed");
    assert!(report.records[0].annotation().contains("0450"));
}
