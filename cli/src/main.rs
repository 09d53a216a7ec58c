use crate::cli::Args;
use crate::commands::{Context, MainCommand};
use crate::error::ExtResult;
use clap::Parser;
use log::debug;
use totp_keeper_lib::config::read_config;
use totp_keeper_lib::otp::TOTPEngine;

mod cli;
mod commands;
mod error;
mod view;

fn main() {
  let args = Args::parse();

  let mut log_builder = env_logger::Builder::from_default_env();

  if args.debug {
    log_builder.filter(None, log::LevelFilter::Debug);
  } else {
    log_builder.filter(None, log::LevelFilter::Error);
  }
  log_builder.target(env_logger::Target::Stderr);
  log_builder.init();

  let config = read_config().ok_or_exit("Reading configuration: ").unwrap_or_default();
  let accounts_file = args.accounts.unwrap_or_else(|| config.accounts_file());
  debug!("Using accounts file {}", accounts_file.to_string_lossy());

  let context = Context {
    config,
    accounts_file,
    engine: TOTPEngine::new(),
  };

  args
    .sub_command
    .unwrap_or_else(MainCommand::default)
    .run(context)
    .ok_or_exit("");
}
