//! Ledger loader: bytes in, typed records out.
//!
//! The accounting system writes a fixed metadata preamble, then the column
//! header, then data rows. The header line is parsed like any other row and
//! dropped by the header-label filter, which also catches header rows
//! repeated inside the data (page breaks in the export).

use csv::ReaderBuilder;
use serde::Serialize;

use crate::archive::{extract_data_file, is_archive};
use crate::config::InputFormat;
use crate::decode::decode;
use crate::error::Result;
use crate::record::{Field, LedgerRecord, COLUMN_COUNT};

/// Counters describing what the loader kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Non-blank rows after the preamble
    pub rows_read: usize,
    /// Header rows dropped
    pub header_rows: usize,
    /// Opening balance rows dropped
    pub opening_balance_rows: usize,
    /// Rows shorter than the fixed layout, skipped
    pub malformed_rows: usize,
    /// Decoder substituted undecodable bytes
    pub decode_replacements: bool,
}

/// Result of loading one input file.
#[derive(Debug, Clone)]
pub struct LoadedLedger {
    /// Archive entry the data came from, when the input was an archive
    pub entry: Option<String>,
    /// Eligible archive entries that were not used
    pub ignored_entries: Vec<String>,
    pub records: Vec<LedgerRecord>,
    pub stats: LoadStats,
}

/// Load a ledger export (plain or zipped) into records.
pub fn load(file_name: &str, bytes: &[u8], format: &InputFormat) -> Result<LoadedLedger> {
    if is_archive(file_name, bytes) {
        let entry = extract_data_file(file_name, bytes)?;
        let mut loaded = parse(&entry.bytes, format)?;
        loaded.entry = Some(entry.name);
        loaded.ignored_entries = entry.ignored;
        return Ok(loaded);
    }
    parse(bytes, format)
}

/// Decode and parse an uncompressed export.
pub fn parse(bytes: &[u8], format: &InputFormat) -> Result<LoadedLedger> {
    let delimiter = format.delimiter_byte()?;
    let decoded = decode(bytes, &format.encoding)?;
    let mut stats = LoadStats {
        decode_replacements: decoded.lossy,
        ..LoadStats::default()
    };
    if decoded.lossy {
        tracing::warn!(
            encoding = %format.encoding,
            "input contains bytes the encoding cannot represent; replaced with U+FFFD"
        );
    }

    let body = skip_lines(&decoded.text, format.preamble_lines);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let header_label = Field::Account.label();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                stats.rows_read += 1;
                stats.malformed_rows += 1;
                tracing::debug!(error = %err, "unreadable row skipped");
                continue;
            }
        };
        stats.rows_read += 1;
        let line = format.preamble_lines + row.position().map(|p| p.line() as usize).unwrap_or(0);

        let Some(record) = LedgerRecord::from_values(line, row.iter()) else {
            stats.malformed_rows += 1;
            tracing::debug!(line, fields = row.len(), expected = COLUMN_COUNT, "short row skipped");
            continue;
        };

        if record.account() == header_label {
            stats.header_rows += 1;
            continue;
        }
        if record
            .raw(Field::PostingDate)
            .contains(format.opening_balance_marker.as_str())
        {
            stats.opening_balance_rows += 1;
            continue;
        }
        records.push(record);
    }

    tracing::debug!(
        kept = records.len(),
        header_rows = stats.header_rows,
        opening_balance_rows = stats.opening_balance_rows,
        malformed_rows = stats.malformed_rows,
        "ledger loaded"
    );

    Ok(LoadedLedger {
        entry: None,
        ignored_entries: Vec::new(),
        records,
        stats,
    })
}

/// Text after the first `count` lines (empty if there are fewer).
fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}
