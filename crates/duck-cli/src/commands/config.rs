use anyhow::{bail, Result};
use duck_cli::cli::ConfigCommands;
use duck_cli::config::{save_config, DuckConfig};

pub fn handle(command: &ConfigCommands, config: &DuckConfig) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigCommands::Init { out, force } => {
            if out.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    out.display()
                );
            }
            save_config(&DuckConfig::default(), out)?;
            println!("Wrote default configuration to {}", out.display());
            Ok(())
        }
    }
}
