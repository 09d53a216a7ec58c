use super::Context;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListCommand {
  #[clap(long, help = "Print otpauth:// URIs instead of a summary")]
  pub url: bool,
}

impl ListCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let accounts = context.select_accounts(None)?;

    if !self.url {
      println!("Stored accounts:");
    }
    for account in accounts {
      if self.url {
        println!("{}", account.to_auth_url().to_url());
      } else {
        println!("- {} ({}) [{}]", account.label, account.issuer, account.algorithm);
      }
    }

    Ok(())
  }
}
