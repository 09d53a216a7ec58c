use super::Context;
use anyhow::{anyhow, Result};
use clap::Args;
use crossterm_style::{style, Color};
use log::debug;

#[derive(Debug, Args)]
pub struct VerifyCommand {
  #[clap(help = "Code to verify")]
  pub code: String,
  #[clap(long, help = "Accounts to consider, comma separated. The first match is verified")]
  pub account: Option<String>,
  #[clap(long, help = "Accepted time steps before and after now (default from configuration)")]
  pub window: Option<u32>,
}

impl VerifyCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let accounts = context.select_accounts(self.account.as_deref())?;
    let account = accounts
      .first()
      .ok_or_else(|| anyhow!("No account available to verify against"))?;
    let window = self.window.unwrap_or(context.config.verify_window);
    debug!("Verifying against {} with window {}", account.label, window);

    if context.engine.validate_code(
      &account.secret,
      self.code.trim(),
      account.period,
      window,
      account.algorithm,
    ) {
      println!("{}", style(format!("Verification succeeded ({})", account.label)).with(Color::Green));
    } else {
      println!("{}", style(format!("Verification failed ({})", account.label)).with(Color::Red));
    }

    Ok(())
  }
}
