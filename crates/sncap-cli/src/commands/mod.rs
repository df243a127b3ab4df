//! Command handlers.

mod misc;
mod rules;
mod validate;

pub use misc::handle_completions;
pub use rules::handle_rules;
pub use validate::handle_validate;
