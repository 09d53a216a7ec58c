use super::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use totp_keeper_lib::accounts::OTPAccount;
use totp_keeper_lib::otp::OTPAuthUrl;

#[derive(Debug, Args)]
pub struct AddCommand {
  #[clap(help = "otpauth://totp/... URI")]
  pub uri: String,
}

impl AddCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let url = OTPAuthUrl::parse(&self.uri).with_context(|| "Parsing URI")?;

    context.store_account(OTPAccount::from(url))
  }
}
