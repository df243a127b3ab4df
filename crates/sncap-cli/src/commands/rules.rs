use crate::app::resolve_config;
use crate::cli::{Cli, RulesArgs};
use crate::config::render_config;

/// Print the effective configuration, defaults included.
pub fn handle_rules(cli: &Cli, args: &RulesArgs) -> anyhow::Result<()> {
    let resolved = resolve_config(cli)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved.config)?);
        return Ok(());
    }

    if !cli.quiet {
        match &resolved.path {
            Some(path) => println!("# Loaded from {}", path.display()),
            None => println!("# Built-in defaults"),
        }
    }
    print!("{}", render_config(&resolved.config)?);
    Ok(())
}
