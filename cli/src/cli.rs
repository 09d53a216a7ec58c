use clap::Parser;
use std::path::PathBuf;

use crate::commands::MainCommand;

#[derive(Debug, Parser)]
#[clap(
  name = "totp-keeper",
  about = "Shows and verifies TOTP codes of multiple accounts",
  version = clap::crate_version!()
)]
pub struct Args {
  #[clap(short, long, help = "Enable debug logs")]
  pub debug: bool,

  #[clap(short, long, help = "Accounts file to use instead of the configured one")]
  pub accounts: Option<PathBuf>,

  #[clap(subcommand)]
  pub sub_command: Option<MainCommand>,
}
