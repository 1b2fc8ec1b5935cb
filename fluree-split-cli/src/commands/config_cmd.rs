use crate::context::load_config;
use crate::error::CliResult;
use std::path::Path;

/// Print the effective configuration (defaults merged with the config file).
pub fn run(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
