//! Output mode routing.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// A single JSON document on stdout
    Json,
    /// key=value lines, stable for logs and scripts
    #[default]
    Plain,
    /// Tables and badges for a terminal
    Pretty,
}

impl OutputMode {
    /// `--json` wins over `--format`. `--format table` asks for tables even
    /// when stdout is not a terminal; `TERM=dumb` always gets plain text.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> anyhow::Result<Self> {
        if json_flag {
            return Ok(Self::Json);
        }

        match format_flag {
            Some("plain") => return Ok(Self::Plain),
            Some("table") if !term_is_dumb => return Ok(Self::Pretty),
            Some("table") | None => {}
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "Unknown format \"{}\" (expected table or plain)",
                    other
                ))
            }
        }

        if is_tty && !term_is_dumb {
            Ok(Self::Pretty)
        } else {
            Ok(Self::Plain)
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
