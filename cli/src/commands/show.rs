use super::Context;
use crate::view::AccountsView;
use anyhow::{Context as _, Result};
use atty::Stream;
use chrono::Utc;
use clap::Args;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TICK: Duration = Duration::from_secs(1);
const POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Args)]
pub struct ShowCommand {
  #[clap(long, help = "Only show these accounts, comma separated")]
  pub account: Option<String>,
}

impl ShowCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let accounts = context.select_accounts(self.account.as_deref())?;

    if accounts.is_empty() {
      println!("No accounts yet, add one with 'totp-keeper add <otpauth-uri>'");
      return Ok(());
    }

    let view = AccountsView::new(&accounts, context.config.warn_seconds);
    let mut stdout = io::stdout();

    if !atty::is(Stream::Stdout) {
      view.snapshot(&mut stdout, &context.engine, Utc::now())?;
      return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = running.clone();
    ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst))
      .with_context(|| "Installing signal handler")?;

    view.draw_frame(&mut stdout)?;
    while running.load(Ordering::SeqCst) {
      view.refresh(&mut stdout, &context.engine, Utc::now())?;
      stdout.flush()?;
      wait_tick(&running);
    }
    view.restore(&mut stdout)?;
    println!("Bye.");

    Ok(())
  }
}

fn wait_tick(running: &AtomicBool) {
  let mut waited = Duration::ZERO;

  while waited < TICK && running.load(Ordering::SeqCst) {
    thread::sleep(POLL);
    waited += POLL;
  }
}
