//! Account records and their JSON file storage.
//!
//! The file is a plain JSON array of [`OTPAccount`]s. Labels identify accounts, duplicates are
//! dropped on load and on save keeping the first occurrence.
//!
use crate::otp::{OTPAlgorithm, OTPAuthUrl, DEFAULT_DIGITS, DEFAULT_PERIOD};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod error;


pub use self::error::*;

fn default_period() -> u64 {
  DEFAULT_PERIOD
}

fn default_digits() -> u8 {
  DEFAULT_DIGITS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OTPAccount {
  pub label: String,
  pub secret: String,
  #[serde(default)]
  pub algorithm: OTPAlgorithm,
  #[serde(default = "default_period")]
  pub period: u64,
  #[serde(default = "default_digits")]
  pub digits: u8,
  #[serde(default)]
  pub issuer: String,
}

impl OTPAccount {
  pub fn to_auth_url(&self) -> OTPAuthUrl {
    OTPAuthUrl {
      algorithm: self.algorithm,
      period: self.period,
      digits: self.digits,
      account_name: self.label.clone(),
      issuer: Some(self.issuer.clone()).filter(|issuer| !issuer.is_empty()),
      secret: self.secret.clone(),
    }
  }
}

impl From<OTPAuthUrl> for OTPAccount {
  fn from(url: OTPAuthUrl) -> Self {
    OTPAccount {
      label: url.account_name,
      secret: url.secret,
      algorithm: url.algorithm,
      period: url.period,
      digits: url.digits,
      issuer: url.issuer.unwrap_or_default(),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upserted {
  Added,
  Updated,
}

pub fn unique_accounts(accounts: Vec<OTPAccount>) -> Vec<OTPAccount> {
  let mut seen = HashSet::new();

  accounts
    .into_iter()
    .filter(|account| seen.insert(account.label.clone()))
    .collect()
}

#[derive(Debug)]
pub struct AccountStore {
  path: PathBuf,
  accounts: Vec<OTPAccount>,
}

impl AccountStore {
  /// Loads the accounts file, creating an empty one if it does not exist yet.
  pub fn open<P: AsRef<Path>>(path: P) -> AccountResult<AccountStore> {
    let path = path.as_ref().to_path_buf();
    let accounts = match fs::read(&path) {
      Ok(content) => unique_accounts(serde_json::from_slice(&content)?),
      Err(ref err) if err.kind() == io::ErrorKind::NotFound => {
        info!("Creating empty accounts file {}", path.to_string_lossy());
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
          fs::create_dir_all(parent)?;
        }
        fs::write(&path, "[]")?;
        vec![]
      }
      Err(err) => return Err(err.into()),
    };
    debug!("Loaded {} accounts from {}", accounts.len(), path.to_string_lossy());

    Ok(AccountStore { path, accounts })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn accounts(&self) -> &[OTPAccount] {
    &self.accounts
  }

  pub fn get(&self, label: &str) -> Option<&OTPAccount> {
    self.accounts.iter().find(|account| account.label == label)
  }

  /// Adds the account or replaces the one with the same label in place.
  pub fn upsert(&mut self, account: OTPAccount) -> Upserted {
    match self.accounts.iter_mut().find(|existing| existing.label == account.label) {
      Some(existing) => {
        *existing = account;
        Upserted::Updated
      }
      None => {
        self.accounts.push(account);
        Upserted::Added
      }
    }
  }

  pub fn remove(&mut self, label: &str) -> bool {
    match self.accounts.iter().position(|account| account.label == label) {
      Some(index) => {
        self.accounts.remove(index);
        true
      }
      None => false,
    }
  }

  /// Accounts named by a comma separated list of labels, in store order.
  ///
  /// Fails with every label that does not exist.
  pub fn select(&self, labels: &str) -> AccountResult<Vec<OTPAccount>> {
    let mut wanted = labels
      .split(',')
      .map(str::trim)
      .filter(|label| !label.is_empty())
      .collect::<BTreeSet<_>>();
    let selected = self
      .accounts
      .iter()
      .filter(|account| wanted.remove(account.label.as_str()))
      .cloned()
      .collect();

    if !wanted.is_empty() {
      return Err(AccountError::NotFound(wanted.into_iter().map(str::to_string).collect()));
    }
    Ok(selected)
  }

  pub fn save(&mut self) -> AccountResult<()> {
    self.accounts = unique_accounts(std::mem::take(&mut self.accounts));
    let content = serde_json::to_string_pretty(&self.accounts)?;

    fs::write(&self.path, content)?;
    debug!("Saved {} accounts to {}", self.accounts.len(), self.path.to_string_lossy());

    Ok(())
  }
}
