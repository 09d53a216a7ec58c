use super::progress_bar;
use chrono::{DateTime, Utc};
use crossterm_style::{style, Color};
use std::io::{self, Write};
use totp_keeper_lib::accounts::OTPAccount;
use totp_keeper_lib::otp::{CurrentCode, OTPResult, TOTPEngine};

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
const CLEAR_LINE_END: &str = "\x1b[K";
const CLEAR_LINE: &str = "\r\x1b[2K";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const BELL: &str = "\x07";

const SEPARATOR_WIDTH: usize = 40;
/// Title and separator above the first account block.
const HEADER_LINES: usize = 2;
/// Issuer, account, algorithm, code, remaining time, separator.
const BLOCK_LINES: usize = 6;
const CODE_LINE: usize = 3;

/// Multi account display that is drawn once and then updated in place.
pub struct AccountsView<'a> {
  accounts: &'a [OTPAccount],
  warn_seconds: u64,
}

impl<'a> AccountsView<'a> {
  pub fn new(accounts: &'a [OTPAccount], warn_seconds: u64) -> Self {
    AccountsView { accounts, warn_seconds }
  }

  /// 1-based terminal row of the code line of the account at `index`.
  pub fn code_row(index: usize) -> usize {
    HEADER_LINES + 1 + index * BLOCK_LINES + CODE_LINE
  }

  pub fn draw_frame<W: Write>(&self, out: &mut W) -> io::Result<()> {
    write!(out, "{}{}", HIDE_CURSOR, CLEAR_SCREEN)?;
    writeln!(out, "{}", style("Multi-account TOTP codes").with(Color::Cyan))?;
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    for account in self.accounts {
      let issuer = if account.issuer.is_empty() { "-" } else { &account.issuer };

      writeln!(out, "Issuer   : {}", issuer)?;
      writeln!(out, "Account  : {}", account.label)?;
      writeln!(out, "Algorithm: {} | Period: {}s", account.algorithm, account.period)?;
      writeln!(out, "Code     :")?;
      writeln!(out, "Remaining:")?;
      writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    }
    writeln!(out, "Press Ctrl+C to quit")?;

    out.flush()
  }

  /// Rewrites the code and countdown lines of every account.
  ///
  /// Each account is generated on its own, a failing one is reported in its block only.
  pub fn refresh<W: Write>(&self, out: &mut W, engine: &TOTPEngine, now: DateTime<Utc>) -> io::Result<()> {
    let mut warn = false;

    for (index, account) in self.accounts.iter().enumerate() {
      write!(out, "\x1b[{};1H", Self::code_row(index))?;
      match Self::current_code(engine, account, now) {
        Ok(current) => {
          let total = current.period().num_seconds();
          let left = current.remaining_at(now).num_seconds();

          warn |= u64::try_from(left).unwrap_or_default() <= self.warn_seconds;
          writeln!(out, "Code     : {}{}", style(&current.code).with(Color::Green), CLEAR_LINE_END)?;
          writeln!(
            out,
            "Remaining: {:2}s [{}]{}",
            left,
            progress_bar(total, left),
            CLEAR_LINE_END
          )?;
        }
        Err(error) => {
          writeln!(
            out,
            "Code     : {}{}",
            style(format!("generation failed: {}", error)).with(Color::Red),
            CLEAR_LINE_END
          )?;
          writeln!(out, "Remaining: -{}", CLEAR_LINE_END)?;
        }
      }
    }
    if warn {
      write!(out, "{}", BELL)?;
    }

    Ok(())
  }

  /// Plain one line per account output for non-terminals.
  pub fn snapshot<W: Write>(&self, out: &mut W, engine: &TOTPEngine, now: DateTime<Utc>) -> io::Result<()> {
    for account in self.accounts {
      match Self::current_code(engine, account, now) {
        Ok(current) => writeln!(
          out,
          "{}: {} ({}s left)",
          account.label,
          current.code,
          current.remaining_at(now).num_seconds()
        )?,
        Err(error) => writeln!(out, "{}: generation failed: {}", account.label, error)?,
      }
    }

    Ok(())
  }

  pub fn restore<W: Write>(&self, out: &mut W) -> io::Result<()> {
    write!(out, "{}{}", SHOW_CURSOR, CLEAR_LINE)?;

    out.flush()
  }

  fn current_code(engine: &TOTPEngine, account: &OTPAccount, now: DateTime<Utc>) -> OTPResult<CurrentCode> {
    let timestamp = u64::try_from(now.timestamp()).unwrap_or_default();

    engine.generate_current_code_at(&account.secret, account.algorithm, timestamp)
  }
}
