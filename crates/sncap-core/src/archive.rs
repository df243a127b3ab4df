//! Zip archive handling for exports delivered compressed.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{Result, SncapError};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Data file extracted from an archive.
#[derive(Debug)]
pub struct ArchiveEntry {
    /// Name of the entry inside the archive
    pub name: String,
    pub bytes: Vec<u8>,
    /// Other eligible entries that were not used
    pub ignored: Vec<String>,
}

/// Whether the input looks like a zip archive (by content or file name).
pub fn is_archive(file_name: &str, bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || file_name.to_ascii_lowercase().ends_with(".zip")
}

fn is_data_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !lower.ends_with('/') && (lower.ends_with(".csv") || lower.ends_with(".txt"))
}

/// Extract the ledger data file from a zip archive.
///
/// The first `.csv`/`.txt` entry in listing order is used. Any further
/// eligible entries are returned in [`ArchiveEntry::ignored`].
pub fn extract_data_file(archive_name: &str, bytes: &[u8]) -> Result<ArchiveEntry> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut eligible = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_dir() && is_data_file(entry.name()) {
            eligible.push((index, entry.name().to_string()));
        }
    }

    let mut eligible = eligible.into_iter();
    let (index, name) = eligible
        .next()
        .ok_or_else(|| SncapError::NoDataFound(archive_name.to_string()))?;
    let ignored: Vec<String> = eligible.map(|(_, name)| name).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            archive = archive_name,
            used = %name,
            ignored = ?ignored,
            "archive holds several data files; using the first"
        );
    }

    let mut entry = archive.by_index(index)?;
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;

    Ok(ArchiveEntry {
        name,
        bytes: data,
        ignored,
    })
}
