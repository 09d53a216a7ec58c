use super::{OTPError, OTPResult};
use data_encoding::{Encoding, Specification, BASE32_NOPAD};
use log::{debug, trace};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{OnceLock, RwLock};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_CACHE_CAPACITY: usize = 1;

const BASE32_BLOCK: usize = 8;
const BASE32_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

static BASE32_LENIENT: OnceLock<Result<Encoding, String>> = OnceLock::new();
static BASE32_LENIENT_NOPAD: OnceLock<Result<Encoding, String>> = OnceLock::new();

/// RFC 4648 Base32 that ignores leftover bits in the last symbol, as most authenticator apps do.
fn lenient_base32(padding: Option<char>) -> OTPResult<&'static Encoding> {
  let cell = match padding {
    Some(_) => &BASE32_LENIENT,
    None => &BASE32_LENIENT_NOPAD,
  };
  let encoding = cell.get_or_init(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(BASE32_SYMBOLS);
    spec.padding = padding;
    spec.check_trailing_bits = false;
    spec.encoding().map_err(|error| format!("{}", error))
  });

  encoding.as_ref().map_err(|error| OTPError::InvalidSecret(error.clone()))
}

/// Raw key bytes of a shared secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct OTPSecret(Vec<u8>);

impl OTPSecret {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<u8>> for OTPSecret {
  fn from(bytes: Vec<u8>) -> Self {
    OTPSecret(bytes)
  }
}

impl fmt::Debug for OTPSecret {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "OTPSecret({} bytes)", self.0.len())
  }
}

impl fmt::Display for OTPSecret {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", BASE32_NOPAD.encode(&self.0))
  }
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct CacheEntry {
  text: String,
  key: OTPSecret,
}

/// Memo of decoded secrets keyed by their normalized text.
///
/// Holds at most `capacity` entries, the oldest one is evicted first. A capacity of 0 disables
/// caching altogether. Readers share the lock, a miss takes it exclusively to swap in the new entry.
pub struct SecretCache {
  capacity: usize,
  entries: RwLock<VecDeque<CacheEntry>>,
}

impl SecretCache {
  pub fn new(capacity: usize) -> SecretCache {
    SecretCache {
      capacity,
      entries: RwLock::new(VecDeque::with_capacity(capacity)),
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn len(&self) -> usize {
    self.entries.read().map(|entries| entries.len()).unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Copy of the cached key for `text`, callers never share the cached buffer.
  pub fn get(&self, text: &str) -> Option<OTPSecret> {
    let entries = self.entries.read().ok()?;

    entries.iter().find(|entry| entry.text == text).map(|entry| entry.key.clone())
  }

  pub fn insert(&self, text: &str, key: &OTPSecret) {
    if self.capacity == 0 {
      return;
    }
    // A poisoned cache is simply bypassed, every miss decodes anyway.
    let Ok(mut entries) = self.entries.write() else {
      return;
    };

    entries.retain(|entry| entry.text != text);
    while entries.len() >= self.capacity {
      entries.pop_front();
      debug!("Evicted decoded secret from cache");
    }
    entries.push_back(CacheEntry {
      text: text.to_string(),
      key: key.clone(),
    });
  }

  pub fn clear(&self) {
    if let Ok(mut entries) = self.entries.write() {
      entries.clear();
    }
  }
}

impl Default for SecretCache {
  fn default() -> Self {
    SecretCache::new(DEFAULT_CACHE_CAPACITY)
  }
}

/// Base32 decoding of shared secrets as they are typed or pasted by users.
///
/// Letter case, embedded spaces and missing `=` padding are tolerated.
#[derive(Default)]
pub struct SecretCodec {
  cache: SecretCache,
}

impl SecretCodec {
  pub fn new() -> SecretCodec {
    SecretCodec::default()
  }

  pub fn with_cache_capacity(capacity: usize) -> SecretCodec {
    SecretCodec {
      cache: SecretCache::new(capacity),
    }
  }

  pub fn cache(&self) -> &SecretCache {
    &self.cache
  }

  /// Upper-cases, strips spaces and pads to a multiple of 8 characters.
  pub fn normalize(secret: &str) -> String {
    let mut normalized = secret.to_uppercase().replace(' ', "");
    let remainder = normalized.len() % BASE32_BLOCK;

    if remainder != 0 {
      normalized.extend(std::iter::repeat('=').take(BASE32_BLOCK - remainder));
    }
    normalized
  }

  pub fn decode(&self, secret: &str) -> OTPResult<OTPSecret> {
    let mut normalized = Self::normalize(secret);

    if let Some(key) = self.cache.get(&normalized) {
      trace!("Decoded secret served from cache");
      normalized.zeroize();
      return Ok(key);
    }

    let result = match lenient_base32(Some('='))?.decode(normalized.as_bytes()) {
      Ok(bytes) => Ok(bytes),
      Err(error) => {
        debug!("Padded Base32 decoding failed ({}), retrying without padding", error);
        lenient_base32(None)?.decode(normalized.trim_end_matches('=').as_bytes())
      }
    };
    let key = match result {
      Ok(bytes) => OTPSecret(bytes),
      Err(error) => {
        normalized.zeroize();
        return Err(error.into());
      }
    };

    self.cache.insert(&normalized, &key);
    normalized.zeroize();

    Ok(key)
  }
}
