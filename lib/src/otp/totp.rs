use super::{OTPAlgorithm, OTPError, OTPResult, OTPSecret, SecretCodec};
use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Duration, Utc};
use hmac::digest::block_buffer::Eager;
use hmac::digest::core_api::{BlockSizeUser, BufferKindUser, CoreProxy, FixedOutputCore, UpdateCore};
use hmac::digest::typenum::{IsLess, Le, NonZero};
use hmac::digest::HashMarker;
use hmac::{Hmac, Mac};
use log::debug;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use typenum::consts::U256;

/// Time step used when no account specific period is involved.
pub const DEFAULT_PERIOD: u64 = 30;
pub const DEFAULT_DIGITS: u8 = 6;

/// A code together with the interval `[valid_from, valid_until)` it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentCode {
  pub code: String,
  pub valid_from: DateTime<Utc>,
  pub valid_until: DateTime<Utc>,
}

impl CurrentCode {
  pub fn period(&self) -> Duration {
    self.valid_until - self.valid_from
  }

  /// Time left until the code expires, never negative.
  pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
    (self.valid_until - now).max(Duration::zero())
  }
}

fn hmac_digest<D>(key: &[u8], counter: u64) -> OTPResult<Vec<u8>>
where
  D: CoreProxy,
  D::Core: HashMarker + UpdateCore + FixedOutputCore + BufferKindUser<BufferKind = Eager> + Default + Clone,
  <D::Core as BlockSizeUser>::BlockSize: IsLess<U256>,
  Le<<D::Core as BlockSizeUser>::BlockSize, U256>: NonZero,
{
  let mut mac = Hmac::<D>::new_from_slice(key).map_err(|error| OTPError::InvalidSecret(format!("{}", error)))?;
  let mut message = [0u8; 8];

  BigEndian::write_u64(&mut message, counter);
  mac.update(&message);

  Ok(mac.finalize().into_bytes().to_vec())
}

/// Dynamic truncation: four digest bytes at the offset named by the low nibble of the last byte,
/// top bit cleared. The digest must be at least 19 bytes long, true for every supported HMAC.
pub(crate) fn truncate(digest: &[u8]) -> u32 {
  let offset = (digest[digest.len() - 1] & 0x0f) as usize;

  BigEndian::read_u32(&digest[offset..offset + 4]) & 0x7fff_ffff
}

/// Renders `value mod 10^digits` zero-padded to exactly `digits` characters.
///
/// From 10 digits on every `u32` is already below the modulus and is only padded.
pub fn format_code(value: u32, digits: u8) -> String {
  let value = match 10_u32.checked_pow(u32::from(digits)) {
    Some(modulus) => value % modulus,
    None => value,
  };

  format!("{:01$}", value, digits as usize)
}

fn to_datetime(timestamp: u64) -> OTPResult<DateTime<Utc>> {
  i64::try_from(timestamp)
    .ok()
    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    .ok_or_else(|| OTPError::InvalidParameter("timestamp".to_string()))
}

fn shift_steps(timestamp: u64, steps: i64, period: u64) -> Option<u64> {
  let offset = steps.unsigned_abs().checked_mul(period)?;

  if steps < 0 {
    timestamp.checked_sub(offset)
  } else {
    timestamp.checked_add(offset)
  }
}

pub fn unix_now() -> u64 {
  u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Generates and validates TOTP codes.
///
/// The engine is `Sync`, a single instance may be shared by any number of threads. Decoded
/// secrets are memoized in the engine's own [`SecretCodec`].
#[derive(Default)]
pub struct TOTPEngine {
  codec: SecretCodec,
}

impl TOTPEngine {
  pub fn new() -> TOTPEngine {
    TOTPEngine::default()
  }

  pub fn with_codec(codec: SecretCodec) -> TOTPEngine {
    TOTPEngine { codec }
  }

  pub fn codec(&self) -> &SecretCodec {
    &self.codec
  }

  /// Code of the time step containing `timestamp` (Unix seconds).
  pub fn generate_code_at(
    &self,
    secret: &str,
    period: u64,
    timestamp: u64,
    algorithm: OTPAlgorithm,
  ) -> OTPResult<String> {
    let key = self.codec.decode(secret)?;

    Self::code_for_key(&key, period, timestamp, algorithm)
  }

  pub fn generate_current_code(&self, secret: &str, algorithm: OTPAlgorithm) -> OTPResult<CurrentCode> {
    self.generate_current_code_at(secret, algorithm, unix_now())
  }

  /// Code for a fixed 30 second period together with its epoch aligned validity window.
  pub fn generate_current_code_at(
    &self,
    secret: &str,
    algorithm: OTPAlgorithm,
    timestamp: u64,
  ) -> OTPResult<CurrentCode> {
    let code = self.generate_code_at(secret, DEFAULT_PERIOD, timestamp, algorithm)?;
    let start = timestamp / DEFAULT_PERIOD * DEFAULT_PERIOD;

    Ok(CurrentCode {
      code,
      valid_from: to_datetime(start)?,
      valid_until: to_datetime(start + DEFAULT_PERIOD)?,
    })
  }

  pub fn validate_code(
    &self,
    secret: &str,
    candidate: &str,
    period: u64,
    window: u32,
    algorithm: OTPAlgorithm,
  ) -> bool {
    self.validate_code_at(secret, candidate, period, window, algorithm, unix_now())
  }

  /// Checks `candidate` against the codes of `window` steps before and after `timestamp`.
  ///
  /// Never fails: an undecodable secret or an impossible period simply does not match.
  pub fn validate_code_at(
    &self,
    secret: &str,
    candidate: &str,
    period: u64,
    window: u32,
    algorithm: OTPAlgorithm,
    timestamp: u64,
  ) -> bool {
    let key = match self.codec.decode(secret) {
      Ok(key) => key,
      Err(error) => {
        debug!("Validation treated as mismatch: {}", error);
        return false;
      }
    };
    let window = i64::from(window);

    (-window..=window)
      .filter_map(|steps| shift_steps(timestamp, steps, period))
      .any(|instant| match Self::code_for_key(&key, period, instant, algorithm) {
        Ok(code) => code == candidate,
        Err(_) => false,
      })
  }

  fn code_for_key(key: &OTPSecret, period: u64, timestamp: u64, algorithm: OTPAlgorithm) -> OTPResult<String> {
    if period == 0 {
      return Err(OTPError::InvalidPeriod);
    }
    let counter = timestamp / period;
    let digest = match algorithm {
      OTPAlgorithm::SHA1 => hmac_digest::<Sha1>(key.as_bytes(), counter)?,
      OTPAlgorithm::SHA256 => hmac_digest::<Sha256>(key.as_bytes(), counter)?,
      OTPAlgorithm::SHA512 => hmac_digest::<Sha512>(key.as_bytes(), counter)?,
    };

    Ok(format_code(truncate(&digest), DEFAULT_DIGITS))
  }
}
