//! UI primitives for the sncap CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges and styles
//! - **Render**: tables, headers, hints, key-value lines
//! - **Progress**: file counter on stderr
//! - **Format**: string helpers

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::{UiContext, UiFlags};
pub use progress::ProgressCounter;
pub use theme::Badge;

pub use render::{badge, blank_line, divider, header, hint, kv, print, print_error, table, Column};
