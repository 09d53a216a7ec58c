use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OTPError {
  /// Secret text is not Base32 under either the padded or the unpadded alphabet.
  InvalidSecret(String),
  InvalidPeriod,
  InvalidUrl(String),
  InvalidScheme,
  InvalidType,
  InvalidAlgorithm(String),
  MissingParameter(String),
  InvalidParameter(String),
}

impl std::error::Error for OTPError {}

impl fmt::Display for OTPError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      OTPError::InvalidSecret(error) => write!(f, "Base32 decoding of secret failed: {}", error)?,
      OTPError::InvalidPeriod => write!(f, "Invalid period. Must be a positive number of seconds")?,
      OTPError::InvalidUrl(error) => write!(f, "Invalid url: {}", error)?,
      OTPError::InvalidScheme => write!(f, "Invalid url scheme. Expected otpauth")?,
      OTPError::InvalidType => write!(f, "Invalid OTP type. Only totp is supported")?,
      OTPError::InvalidAlgorithm(name) => write!(
        f,
        "Invalid OTP algorithm {}. Only SHA1, SHA256, SHA512 are supported",
        name
      )?,
      OTPError::MissingParameter(name) => write!(f, "Missing required parameter: {}", name)?,
      OTPError::InvalidParameter(name) => write!(f, "Invalid value for parameter: {}", name)?,
    }

    Ok(())
  }
}

pub type OTPResult<T> = Result<T, OTPError>;

error_convert_from!(
  url::ParseError => OTPError::InvalidUrl(display),
  data_encoding::DecodeError => OTPError::InvalidSecret(display),
);
