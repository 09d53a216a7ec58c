use super::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use totp_keeper_lib::config::{config_file, write_config, Config};

#[derive(Debug, Args)]
pub struct InitCommand {
  #[clap(long, help = "Overwrite an existing configuration")]
  pub force: bool,
}

impl InitCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let config_file = config_file();

    if config_file.exists() && !self.force {
      println!(
        "Configuration already exists at '{}', use --force to overwrite",
        config_file.to_string_lossy()
      );
      return Ok(());
    }

    let config = Config {
      accounts_file: Some(context.accounts_file.clone()),
      ..context.config.clone()
    };
    write_config(&config).with_context(|| format!("Writing {}", config_file.to_string_lossy()))?;
    context.open_store()?;
    println!("Configuration written to '{}'", config_file.to_string_lossy());

    Ok(())
  }
}
