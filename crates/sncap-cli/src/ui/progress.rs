//! Progress counter for batches of files.

use std::io::{self, Write};

use super::context::UiContext;

/// Counts processed files on stderr: `[2/5] razao.csv`.
///
/// Draws nothing unless the context allows progress, so piped and JSON
/// output stay clean.
pub struct ProgressCounter<'a> {
    ctx: &'a UiContext,
    total: usize,
    current: usize,
}

impl<'a> ProgressCounter<'a> {
    pub fn new(ctx: &'a UiContext, total: usize) -> Self {
        Self {
            ctx,
            total,
            current: 0,
        }
    }

    /// Advance by one file and redraw.
    pub fn inc(&mut self, label: &str) {
        self.current = (self.current + 1).min(self.total);
        if self.ctx.progress {
            eprint!("\r\x1b[K{}", self.line(label));
            let _ = io::stderr().flush();
        }
    }

    pub fn line(&self, label: &str) -> String {
        format!("[{}/{}] {}", self.current, self.total, label)
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.ctx.progress {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::render::tests::plain_ctx;

    #[test]
    fn test_counter_advances_and_caps() {
        let ctx = plain_ctx();
        let mut counter = ProgressCounter::new(&ctx, 2);
        counter.inc("a.csv");
        assert_eq!(counter.line("a.csv"), "[1/2] a.csv");
        counter.inc("b.csv");
        counter.inc("c.csv");
        assert_eq!(counter.line("c.csv"), "[2/2] c.csv");
        counter.finish();
    }
}
