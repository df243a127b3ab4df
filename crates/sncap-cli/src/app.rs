//! Config resolution, logging setup and exit handling.

use std::fmt;
use std::path::{Path, PathBuf};

use sncap_core::ValidatorConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config};
use crate::constants::{exit_codes, LOG_ENV};

/// An error that ends the process with a specific exit code.
#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
    pub hint: Option<String>,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

/// Print `err` to stderr and return the process exit code for it.
pub fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ExitError>() {
        Some(exit) => {
            eprintln!("Error: {}", exit.message);
            if let Some(hint) = &exit.hint {
                eprintln!("Hint: {}", hint);
            }
            exit.code
        }
        None => {
            eprintln!("Error: {:#}", err);
            1
        }
    }
}

/// Install the stderr subscriber.
///
/// `SNCAP_LOG` takes a tracing filter; otherwise `-v` selects debug and
/// `-vv` trace, and the default is warnings only.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let fallback = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Effective configuration and where it came from.
pub struct ResolvedConfig {
    pub config: ValidatorConfig,
    pub path: Option<PathBuf>,
}

/// Resolve the rules configuration.
///
/// An explicit `--config` (or `SNCAP_CONFIG`) must exist. The default
/// location is optional; without it the built-in rules apply.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(ExitError::new(
                exit_codes::NOT_FOUND,
                format!("Config file not found: {}", path.display()),
            )
            .with_hint("Run `sncap rules > config.toml` to start from the defaults.")
            .into());
        }
        return load_from(path);
    }

    let default_path = default_config_path()?;
    if default_path.exists() {
        return load_from(&default_path);
    }

    tracing::debug!(path = %default_path.display(), "no config file, using built-in rules");
    Ok(ResolvedConfig {
        config: ValidatorConfig::default(),
        path: None,
    })
}

fn load_from(path: &Path) -> anyhow::Result<ResolvedConfig> {
    let config = read_config(path)
        .map_err(|err| ExitError::new(exit_codes::INVALID_INPUT, format!("{:#}", err)))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(ResolvedConfig {
        config,
        path: Some(path.to_path_buf()),
    })
}
