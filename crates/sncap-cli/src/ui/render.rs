//! Rendering primitives for CLI output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Sncap · command (context)"
/// Plain mode: "sncap command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Pretty => {
            let title = styled("Sncap", styles::bold(), ctx.color);
            match context {
                Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
                None => format!("{} \u{00B7} {}", title, command),
            }
        }
        OutputMode::Plain => format!("sncap {}", command),
        OutputMode::Json => String::new(),
    }
}

pub fn divider(ctx: &UiContext) -> String {
    if ctx.mode.is_pretty() && ctx.unicode {
        "\u{2500}".repeat(ctx.width.min(60))
    } else {
        "---".to_string()
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let colored_badge = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Column definition for table rendering.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: &'static str,
    pub numeric: bool,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self {
            header,
            numeric: false,
        }
    }

    pub const fn numeric(header: &'static str) -> Self {
        Self {
            header,
            numeric: true,
        }
    }
}

/// Render a table.
///
/// Pretty mode: bordered table sized to the terminal
/// Plain mode: tab-separated rows, no header
pub fn table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = ComfyTable::new();
    if ctx.unicode {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(ASCII_MARKDOWN);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(ctx.width.min(u16::MAX as usize) as u16);
    table.set_header(columns.iter().map(|c| c.header).collect::<Vec<_>>());

    for row in rows {
        let cells = row.iter().zip(columns).map(|(value, column)| {
            let cell = Cell::new(value);
            if column.numeric {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        });
        table.add_row(cells);
    }

    table.to_string()
}

/// Print to stdout unless in JSON mode or quiet.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() && !ctx.quiet {
        println!("{}", message);
    }
}

pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() && !ctx.quiet {
        println!();
    }
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();
    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
    } else {
        lines.push(format!("error={}", message));
    }
    if let Some(h) = error_hint {
        lines.push(hint(ctx, h));
    }
    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn plain_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
            quiet: false,
            progress: false,
        }
    }

    pub(crate) fn pretty_ctx() -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
            quiet: false,
            progress: false,
        }
    }

    #[test]
    fn test_header() {
        let h = header(&pretty_ctx(), "validate", Some("2 files"));
        assert!(h.contains("Sncap"));
        assert!(h.contains("validate (2 files)"));
        assert_eq!(header(&plain_ctx(), "validate", None), "sncap validate");
    }

    #[test]
    fn test_badge() {
        let b = badge(&plain_ctx(), Badge::Warn, "razao.csv");
        assert_eq!(b, "[WARN] razao.csv");
        assert_eq!(badge(&pretty_ctx(), Badge::Ok, ""), "[\u{2713}]");
    }

    #[test]
    fn test_kv() {
        assert_eq!(kv(&plain_ctx(), "Records With Errors", "3"), "records_with_errors=3");
        let line = kv(&pretty_ctx(), "Records", "3");
        assert!(line.contains("Records:"));
        assert!(line.ends_with('3'));
    }

    #[test]
    fn test_hint() {
        assert_eq!(hint(&plain_ctx(), "try this"), "hint=try this");
        assert!(hint(&pretty_ctx(), "try this").starts_with("Hint:"));
    }

    #[test]
    fn test_table_plain_is_tab_separated() {
        let columns = [Column::new("Erro"), Column::numeric("Ocorrências")];
        let rows = vec![vec!["Medida deve ser 022".to_string(), "4".to_string()]];
        assert_eq!(table(&plain_ctx(), &columns, &rows), "Medida deve ser 022\t4");
    }

    #[test]
    fn test_table_pretty() {
        let columns = [Column::new("Erro"), Column::numeric("Ocorrências")];
        let rows = vec![
            vec!["Medida deve ser 022".to_string(), "4".to_string()],
            vec!["Classificação funcional deve ser 0111".to_string(), "1".to_string()],
        ];
        let t = table(&pretty_ctx(), &columns, &rows);
        assert!(t.contains("Ocorrências"));
        assert!(t.contains("Medida deve ser 022"));
        assert!(t.contains("Classificação funcional deve ser 0111"));
    }

    #[test]
    fn test_table_empty_rows_keeps_header() {
        let t = table(&pretty_ctx(), &[Column::new("Erro")], &[]);
        assert!(t.contains("Erro"));
    }

    #[test]
    fn test_divider() {
        assert!(divider(&pretty_ctx()).contains('\u{2500}'));
        assert_eq!(divider(&plain_ctx()), "---");
    }

    #[test]
    fn test_error_message() {
        let e = error_message(&pretty_ctx(), "File not found", Some("Check the path"));
        assert!(e.contains("[\u{2717}] File not found"));
        assert!(e.contains("Hint: Check the path"));

        let e = error_message(&plain_ctx(), "File not found", None);
        assert_eq!(e, "error=File not found");
    }
}
