//! Validator configuration.
//!
//! Every constant the loader and evaluator depend on lives here or in
//! [`RuleSet`], so a rule change is a data change that can be reviewed and
//! tested on its own. All sections use `#[serde(default)]`: a config file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SncapError};
use crate::rules::RuleSet;

/// Complete validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub input: InputFormat,
    pub rules: RuleSet,
}

/// Layout of the ledger export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFormat {
    /// Metadata lines before the column header
    pub preamble_lines: usize,
    /// Field delimiter
    pub delimiter: char,
    /// WHATWG encoding label used to decode the export
    pub encoding: String,
    /// Posting-date marker of opening balance rows
    pub opening_balance_marker: String,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            preamble_lines: 10,
            delimiter: ';',
            encoding: "windows-1252".to_string(),
            opening_balance_marker: "Saldo Inicial".to_string(),
        }
    }
}

impl InputFormat {
    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                SncapError::Config(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                ))
            })
    }
}

impl ValidatorConfig {
    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;
        crate::decode::lookup(&self.input.encoding)?;
        self.rules.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.input.preamble_lines, 10);
        assert_eq!(config.input.delimiter_byte().unwrap(), b';');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let input = InputFormat {
            delimiter: '§',
            ..InputFormat::default()
        };
        assert!(matches!(input.delimiter_byte(), Err(SncapError::Config(_))));
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let mut config = ValidatorConfig::default();
        config.input.encoding = "klingon".to_string();
        assert!(matches!(config.validate(), Err(SncapError::Config(_))));
    }
}
