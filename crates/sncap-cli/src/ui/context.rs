//! Terminal detection for output decisions.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Flags from the command line that affect rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiFlags<'a> {
    pub json: bool,
    pub format: Option<&'a str>,
    pub no_color: bool,
    pub ascii: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
    pub quiet: bool,
    /// Progress goes to stderr and is only drawn when stderr is a terminal.
    pub progress: bool,
}

impl UiContext {
    pub fn from_env(flags: UiFlags<'_>) -> anyhow::Result<Self> {
        let stdout_tty = std::io::stdout().is_terminal();
        let stderr_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        let mode = OutputMode::resolve(flags.json, flags.format, stdout_tty, term_is_dumb)?;

        Ok(Self {
            color: stdout_tty && !flags.no_color && !no_color_env && !term_is_dumb,
            unicode: !flags.ascii,
            width: terminal_width().unwrap_or(80),
            mode,
            quiet: flags.quiet,
            progress: stderr_tty && !term_is_dumb && !flags.quiet && !mode.is_json(),
        })
    }
}

fn terminal_width() -> Option<usize> {
    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 {
                return Some(width);
            }
        }
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ fills the winsize struct; it is read only on success
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_mode_from_flag() {
        let ctx = UiContext::from_env(UiFlags {
            json: true,
            ..UiFlags::default()
        })
        .unwrap();
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.progress);
    }

    #[test]
    fn test_ascii_and_no_color() {
        let ctx = UiContext::from_env(UiFlags {
            ascii: true,
            no_color: true,
            ..UiFlags::default()
        })
        .unwrap();
        assert!(!ctx.unicode);
        assert!(!ctx.color);
        assert!(ctx.width > 0);
    }

    #[test]
    fn test_quiet_disables_progress() {
        let ctx = UiContext::from_env(UiFlags {
            quiet: true,
            ..UiFlags::default()
        })
        .unwrap();
        assert!(ctx.quiet);
        assert!(!ctx.progress);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(UiContext::from_env(UiFlags {
            format: Some("xml"),
            ..UiFlags::default()
        })
        .is_err());
    }
}
