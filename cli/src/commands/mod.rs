mod add;
mod add_key;
mod completions;
mod init;
mod list;
mod remove;
mod show;
mod verify;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use crossterm_style::{style, Color};
use log::debug;
use std::path::PathBuf;
use totp_keeper_lib::accounts::{AccountStore, OTPAccount, Upserted};
use totp_keeper_lib::config::Config;
use totp_keeper_lib::otp::{TOTPEngine, DEFAULT_DIGITS};

/// Everything a command needs besides its own arguments.
pub struct Context {
  pub config: Config,
  pub accounts_file: PathBuf,
  pub engine: TOTPEngine,
}

impl Context {
  pub fn open_store(&self) -> Result<AccountStore> {
    AccountStore::open(&self.accounts_file)
      .with_context(|| format!("Failed opening accounts file {}", self.accounts_file.to_string_lossy()))
  }

  /// All accounts, or only those named in a comma separated list.
  pub fn select_accounts(&self, labels: Option<&str>) -> Result<Vec<OTPAccount>> {
    let store = self.open_store()?;

    match labels {
      Some(labels) => Ok(store.select(labels)?),
      None => Ok(store.accounts().to_vec()),
    }
  }

  /// Checks that the secret decodes, then adds or replaces the account.
  pub fn store_account(&self, account: OTPAccount) -> Result<()> {
    self
      .engine
      .codec()
      .decode(&account.secret)
      .with_context(|| format!("Invalid secret for account {}", account.label))?;
    if account.digits != DEFAULT_DIGITS {
      println!(
        "{}",
        style(format!(
          "Note: {} is configured for {} digits, generated codes always have {} digits",
          account.label, account.digits, DEFAULT_DIGITS
        ))
        .with(Color::Yellow)
      );
    }

    let mut store = self.open_store()?;
    let label = account.label.clone();
    let upserted = store.upsert(account);
    store.save().with_context(|| "Saving accounts")?;
    debug!("{:?} account {}", upserted, label);

    match upserted {
      Upserted::Added => println!("{} {}", style("Added:").with(Color::Green), label),
      Upserted::Updated => println!(
        "{} {}",
        style("Account with the same label exists, updated:").with(Color::Yellow),
        label
      ),
    }
    Ok(())
  }
}

#[derive(Debug, Subcommand)]
pub enum MainCommand {
  #[clap(about = "Add an account from an otpauth:// URI")]
  Add(add::AddCommand),
  #[clap(about = "Add an account from a label and a Base32 secret")]
  AddKey(add_key::AddKeyCommand),
  #[clap(about = "Remove an account by label", alias = "rm")]
  Remove(remove::RemoveCommand),
  #[clap(about = "List accounts", alias = "ls")]
  List(list::ListCommand),
  #[clap(about = "Verify a code against an account")]
  Verify(verify::VerifyCommand),
  #[clap(about = "Show live codes with countdown (default)")]
  Show(show::ShowCommand),
  #[clap(about = "Write a default configuration file")]
  Init(init::InitCommand),
  #[clap(about = "Generate shell completions")]
  Completions(completions::CompletionCommand),
}

impl Default for MainCommand {
  fn default() -> Self {
    MainCommand::Show(show::ShowCommand::default())
  }
}

impl MainCommand {
  pub fn run(self, context: Context) -> Result<()> {
    match self {
      MainCommand::Add(cmd) => cmd.run(&context),
      MainCommand::AddKey(cmd) => cmd.run(&context),
      MainCommand::Remove(cmd) => cmd.run(&context),
      MainCommand::List(cmd) => cmd.run(&context),
      MainCommand::Verify(cmd) => cmd.run(&context),
      MainCommand::Show(cmd) => cmd.run(&context),
      MainCommand::Init(cmd) => cmd.run(&context),
      MainCommand::Completions(cmd) => cmd.run(),
    }
  }
}
