//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Usage error (reported by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Input file or config file not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid configuration or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// At least one input file could not be validated.
    pub const FILE_FAILED: i32 = 6;

    /// Records violated the rules and `--fail-on-violations` was set.
    pub const VIOLATIONS: i32 = 7;
}

/// Suffix of the annotated copy written next to each input.
pub const ANNOTATED_SUFFIX: &str = "_validado.csv";

/// Suffix of the message summary written next to each input.
pub const SUMMARY_SUFFIX: &str = "_resumo.csv";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "SNCAP_LOG";
