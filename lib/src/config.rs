use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

pub const DEFAULT_VERIFY_WINDOW: u32 = 1;
pub const DEFAULT_WARN_SECONDS: u64 = 5;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
  IO(String),
  Format(String),
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      ConfigError::IO(error) => write!(f, "IO: {}", error)?,
      ConfigError::Format(error) => write!(f, "Invalid config file: {}", error)?,
    }
    Ok(())
  }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

error_convert_from!(
  io::Error => ConfigError::IO(display),
  toml::de::Error => ConfigError::Format(display),
  toml::ser::Error => ConfigError::Format(display),
);

fn default_verify_window() -> u32 {
  DEFAULT_VERIFY_WINDOW
}

fn default_warn_seconds() -> u64 {
  DEFAULT_WARN_SECONDS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  pub accounts_file: Option<PathBuf>,
  /// Number of time steps before and after now accepted by `verify`.
  #[serde(default = "default_verify_window")]
  pub verify_window: u32,
  /// Remaining seconds below which the live display rings the terminal bell.
  #[serde(default = "default_warn_seconds")]
  pub warn_seconds: u64,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      accounts_file: None,
      verify_window: DEFAULT_VERIFY_WINDOW,
      warn_seconds: DEFAULT_WARN_SECONDS,
    }
  }
}

impl Config {
  pub fn accounts_file(&self) -> PathBuf {
    self.accounts_file.clone().unwrap_or_else(default_accounts_file)
  }
}

fn home_dir() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_accounts_file() -> PathBuf {
  home_dir().join(".totp_accounts.json")
}

pub fn config_file() -> PathBuf {
  dirs::config_dir()
    .map(|configs| configs.join("totp-keeper"))
    .unwrap_or_else(|| home_dir().join(".totp-keeper"))
    .join("config.toml")
}

pub fn parse_config(content: &str) -> ConfigResult<Config> {
  Ok(toml::from_str::<Config>(content)?)
}

pub fn read_config() -> ConfigResult<Option<Config>> {
  let config_file = config_file();
  match File::open(&config_file) {
    Ok(mut file) => {
      let mut content = String::new();

      file.read_to_string(&mut content)?;

      Ok(Some(parse_config(&content)?))
    }
    Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(err) => Err(err.into()),
  }
}

pub fn write_config(config: &Config) -> ConfigResult<()> {
  let content = toml::to_string_pretty(config)?;
  let config_file = config_file();

  if let Some(parent) = config_file.parent() {
    fs::create_dir_all(parent)?;
  }

  let mut file = File::create(&config_file)?;

  file.write_all(content.as_bytes())?;

  Ok(())
}
