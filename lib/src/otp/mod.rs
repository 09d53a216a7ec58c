//! # Time-based one-time passwords
//!
//! RFC 6238 code generation and validation on top of Base32 encoded shared secrets.
//! Decoding of secrets is memoized by [`SecretCodec`], every [`TOTPEngine`] owns its own codec.
//!
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod auth_url;
mod error;
mod secret;
mod totp;

#[cfg(test)]
mod tests;

pub use self::auth_url::*;
pub use self::error::*;
pub use self::secret::*;
pub use self::totp::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OTPAlgorithm {
  #[default]
  SHA1,
  SHA256,
  SHA512,
}

impl OTPAlgorithm {
  pub const ALL: [OTPAlgorithm; 3] = [OTPAlgorithm::SHA1, OTPAlgorithm::SHA256, OTPAlgorithm::SHA512];
}

impl fmt::Display for OTPAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      OTPAlgorithm::SHA1 => write!(f, "SHA1")?,
      OTPAlgorithm::SHA256 => write!(f, "SHA256")?,
      OTPAlgorithm::SHA512 => write!(f, "SHA512")?,
    }
    Ok(())
  }
}

impl FromStr for OTPAlgorithm {
  type Err = OTPError;

  fn from_str(s: &str) -> OTPResult<Self> {
    match s.trim().to_uppercase().as_str() {
      "SHA1" => Ok(OTPAlgorithm::SHA1),
      "SHA256" => Ok(OTPAlgorithm::SHA256),
      "SHA512" => Ok(OTPAlgorithm::SHA512),
      _ => Err(OTPError::InvalidAlgorithm(s.to_string())),
    }
  }
}

impl TryFrom<String> for OTPAlgorithm {
  type Error = OTPError;

  fn try_from(value: String) -> OTPResult<Self> {
    value.parse()
  }
}

impl From<OTPAlgorithm> for String {
  fn from(algorithm: OTPAlgorithm) -> Self {
    algorithm.to_string()
  }
}
