//! CSV writers for the annotated export and the summary.
//!
//! Both are `;`-delimited UTF-8 with a byte-order mark, which spreadsheet
//! applications in Portuguese locales open without an import dialog.

use std::io::Write;

use csv::WriterBuilder;

use crate::error::Result;
use crate::record::{header_labels, ERROR_COLUMN};
use crate::report::{AnnotatedRecord, Summary};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header of the summary export.
pub const SUMMARY_HEADER: [&str; 2] = [ERROR_COLUMN, "Ocorrências"];

/// Write every annotated record with its original values plus the `Erro` column.
pub fn write_annotated_csv<W: Write>(mut w: W, records: &[AnnotatedRecord]) -> Result<()> {
    w.write_all(UTF8_BOM)?;
    let mut wrt = WriterBuilder::new().delimiter(b';').from_writer(&mut w);

    let mut header: Vec<&str> = header_labels().collect();
    header.push(ERROR_COLUMN);
    wrt.write_record(&header)?;

    for annotated in records {
        let annotation = annotated.annotation();
        let row = annotated
            .record
            .values()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(annotation.as_str()));
        wrt.write_record(row)?;
    }
    wrt.flush()?;
    Ok(())
}

/// Write the message frequency table.
pub fn write_summary_csv<W: Write>(mut w: W, summary: &Summary) -> Result<()> {
    w.write_all(UTF8_BOM)?;
    let mut wrt = WriterBuilder::new().delimiter(b';').from_writer(&mut w);
    wrt.write_record(SUMMARY_HEADER)?;
    for row in summary.rows() {
        let count = row.count.to_string();
        wrt.write_record([row.message.as_str(), count.as_str()])?;
    }
    wrt.flush()?;
    Ok(())
}
