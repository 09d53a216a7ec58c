use super::Context;
use anyhow::Result;
use clap::Args;
use totp_keeper_lib::accounts::OTPAccount;
use totp_keeper_lib::otp::{OTPAlgorithm, DEFAULT_DIGITS, DEFAULT_PERIOD};

#[derive(Debug, Args)]
pub struct AddKeyCommand {
  #[clap(long, help = "Account label (user name)")]
  pub user: String,
  #[clap(long, help = "Base32 encoded secret")]
  pub key: String,
  #[clap(long, default_value = "", help = "Issuer / service name")]
  pub issuer: String,
  #[clap(long, default_value_t = OTPAlgorithm::SHA1, help = "Hash algorithm: SHA1, SHA256 or SHA512")]
  pub algo: OTPAlgorithm,
  #[clap(long, default_value_t = DEFAULT_PERIOD, value_parser = clap::value_parser!(u64).range(1..), help = "Time step in seconds")]
  pub period: u64,
  #[clap(long, default_value_t = DEFAULT_DIGITS, help = "Number of code digits")]
  pub digits: u8,
}

impl AddKeyCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    context.store_account(OTPAccount {
      label: self.user,
      secret: self.key,
      algorithm: self.algo,
      period: self.period,
      digits: self.digits,
      issuer: self.issuer,
    })
  }
}
