//! Decoding of the legacy single-byte exports.

use encoding_rs::Encoding;

use crate::error::{Result, SncapError};

/// Decoded text plus whether the decoder had to substitute characters.
#[derive(Debug)]
pub struct Decoded {
    pub text: String,
    pub lossy: bool,
}

/// Resolve a WHATWG encoding label (`windows-1252`, `latin1`, `utf-8`, ...).
pub fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| SncapError::Config(format!("unknown encoding label: {}", label)))
}

/// Decode `bytes` with the encoding named by `label`.
///
/// Undecodable sequences become U+FFFD and set [`Decoded::lossy`]; a
/// leading byte-order mark overrides the label.
pub fn decode(bytes: &[u8], label: &str) -> Result<Decoded> {
    let encoding = lookup(label)?;
    let (text, used, lossy) = encoding.decode(bytes);
    if used != encoding {
        tracing::debug!(encoding = used.name(), "byte-order mark overrides configured encoding");
    }
    Ok(Decoded {
        text: text.into_owned(),
        lossy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_1252_accents() {
        // "Orgânica" in windows-1252
        let bytes = b"Org\xe2nica";
        let decoded = decode(bytes, "windows-1252").unwrap();
        assert_eq!(decoded.text, "Orgânica");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_latin1_label_accepted() {
        let decoded = decode(b"Cr\xe9dito", "latin1").unwrap();
        assert_eq!(decoded.text, "Crédito");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let decoded = decode(b"ok \xff", "utf-8").unwrap();
        assert!(decoded.lossy);
        assert!(decoded.text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(decode(b"", "nope"), Err(SncapError::Config(_))));
    }
}
