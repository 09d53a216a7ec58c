use super::totp::truncate;
use super::{
  format_code, OTPAlgorithm, OTPAuthUrl, OTPError, SecretCache, SecretCodec, TOTPEngine, DEFAULT_PERIOD,
};
use data_encoding::BASE32;
use hex_literal::hex;
use quickcheck::quickcheck;
use spectral::prelude::*;
use std::sync::Arc;
use std::thread;
use zeroize::Zeroize;

const EXAMPLE_SECRET: &str = "JBSWY3DPEHPK3PXP";

fn rfc6238_secret(algorithm: OTPAlgorithm) -> String {
  let seed: &[u8] = match algorithm {
    OTPAlgorithm::SHA1 => b"12345678901234567890",
    OTPAlgorithm::SHA256 => b"12345678901234567890123456789012",
    OTPAlgorithm::SHA512 => b"1234567890123456789012345678901234567890123456789012345678901234",
  };
  BASE32.encode(seed)
}

#[test]
fn test_rfc6238_vectors() {
  let engine = TOTPEngine::new();
  let vectors: &[(u64, &str, &str, &str)] = &[
    (59, "287082", "119246", "693936"),
    (1_111_111_109, "081804", "084774", "091201"),
    (1_111_111_111, "050471", "062674", "943326"),
    (1_234_567_890, "005924", "819424", "441116"),
    (2_000_000_000, "279037", "698825", "618901"),
    (20_000_000_000, "353130", "737706", "863826"),
  ];

  for (timestamp, sha1, sha256, sha512) in vectors {
    for (algorithm, expected) in &[
      (OTPAlgorithm::SHA1, sha1),
      (OTPAlgorithm::SHA256, sha256),
      (OTPAlgorithm::SHA512, sha512),
    ] {
      let code = engine
        .generate_code_at(&rfc6238_secret(*algorithm), 30, *timestamp, *algorithm)
        .unwrap();

      assert_that(&code).named(&format!("{} at {}", algorithm, timestamp)).is_equal_to(expected.to_string());
    }
  }
}

#[test]
fn test_known_codes() {
  let engine = TOTPEngine::new();

  assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 30, 1_556_733_311, OTPAlgorithm::SHA1))
    .is_ok_containing("184557".to_string());
  assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 30, 1_556_733_406, OTPAlgorithm::SHA1))
    .is_ok_containing("757120".to_string());
}

#[test]
fn test_dynamic_truncation() {
  let digest = hex!("1f8698690e02ca16618550ef7f19da8e945b555a");

  assert_that(&truncate(&digest)).is_equal_to(0x50ef_7f19);
  assert_that(&format_code(truncate(&digest), 6)).is_equal_to("872921".to_string());
}

#[test]
fn test_format_code_pads() {
  assert_that(&format_code(42, 6)).is_equal_to("000042".to_string());
  assert_that(&format_code(1_000_000, 6)).is_equal_to("000000".to_string());
  assert_that(&format_code(2_147_483_647, 6)).is_equal_to("483647".to_string());
  assert_that(&format_code(2_147_483_647, 8)).is_equal_to("47483647".to_string());
  assert_that(&format_code(2_147_483_647, 10)).is_equal_to("2147483647".to_string());
  assert_that(&format_code(42, 12)).is_equal_to("000000000042".to_string());
}

#[test]
fn test_step_stability() {
  let engine = TOTPEngine::new();
  let first = engine.generate_code_at(EXAMPLE_SECRET, 30, 60, OTPAlgorithm::SHA1).unwrap();

  for timestamp in 60..90 {
    assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 30, timestamp, OTPAlgorithm::SHA1))
      .is_ok_containing(first.clone());
  }
  assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 30, 90, OTPAlgorithm::SHA1).unwrap()).is_not_equal_to(first);
}

#[test]
fn test_algorithms_differ() {
  let engine = TOTPEngine::new();
  let codes = OTPAlgorithm::ALL
    .iter()
    .map(|algorithm| engine.generate_code_at(EXAMPLE_SECRET, 30, 1_234_567_890, *algorithm).unwrap())
    .collect::<Vec<_>>();

  assert_that(&codes[0]).is_not_equal_to(&codes[1]);
  assert_that(&codes[0]).is_not_equal_to(&codes[2]);
  assert_that(&codes[1]).is_not_equal_to(&codes[2]);
}

#[test]
fn test_decode_tolerance() {
  let codec = SecretCodec::with_cache_capacity(0);
  let expected = codec.decode(EXAMPLE_SECRET).unwrap();

  for variant in &["jbswy3dpehpk3pxp", "JBSW Y3DP EHPK 3PXP", "jbsw y3dp ehpk 3pxp", "JBSWY3DPEHPK3PXP=="] {
    assert_that(&codec.decode(variant)).is_ok_containing(expected.clone());
  }

  let unpadded = codec.decode("GEZDGNBV").unwrap();
  assert_that(&codec.decode("gezdgnbvgy")).is_ok();
  assert_that(&unpadded.as_bytes()).is_equal_to(&b"12345"[..]);
  assert_that(&codec.decode("MZXW6").unwrap().as_bytes()).is_equal_to(&b"foo"[..]);
  assert_that(&codec.decode("MZXW6===").unwrap().as_bytes()).is_equal_to(&b"foo"[..]);
}

#[test]
fn test_decode_ignores_trailing_bits() {
  let codec = SecretCodec::with_cache_capacity(0);
  let engine = TOTPEngine::new();

  assert_that(&codec.decode("MZXW7").unwrap().as_bytes()).is_equal_to(&b"foo"[..]);
  assert_that(&codec.decode("mzxw 7===")).is_ok_containing(codec.decode("MZXW6").unwrap());
  assert_that(&codec.decode("JBSWY3DPEHPK3PXPJBSWY3DPEH")).is_ok_containing(codec.decode("JBSWY3DPEHPK3PXPJBSWY3DPEE").unwrap());
  assert_that(&codec.decode("JBSWY3DPEHPK3PXPJBSWY3DPEF").unwrap().len()).is_equal_to(16);

  for secret in &["MZXW7", "JBSWY3DPEHPK3PXPJBSWY3DPEH", "JBSWY3DPEHPK3PXPJBSWY3DPEF"] {
    assert_that(&engine.generate_code_at(secret, 30, 59, OTPAlgorithm::SHA1)).is_ok();
  }
  assert_that(&engine.generate_code_at("MZXW7", 30, 59, OTPAlgorithm::SHA1))
    .is_equal_to(engine.generate_code_at("MZXW6", 30, 59, OTPAlgorithm::SHA1));
}

#[test]
fn test_normalize() {
  assert_that(&SecretCodec::normalize("mzxw 6")).is_equal_to("MZXW6===".to_string());
  assert_that(&SecretCodec::normalize("JBSWY3DPEHPK3PXP")).is_equal_to("JBSWY3DPEHPK3PXP".to_string());
  assert_that(&SecretCodec::normalize("")).is_equal_to("".to_string());
}

#[test]
fn test_decode_failure() {
  let engine = TOTPEngine::new();

  for invalid in &["JBSWY3DPEHPK3PX0", "JBSWY3DP-HPK3PXP", "18181818", "ABC!"] {
    assert_that(&engine.generate_code_at(invalid, 30, 59, OTPAlgorithm::SHA1))
      .is_err()
      .matches(|error| matches!(error, OTPError::InvalidSecret(_)));
    assert_that(&engine.generate_current_code_at(invalid, OTPAlgorithm::SHA1, 59)).is_err();
    assert_that(&engine.validate_code_at(invalid, "000000", 30, 5, OTPAlgorithm::SHA1, 59)).is_false();
  }
  assert_that(&engine.codec().cache().is_empty()).is_true();
}

#[test]
fn test_zero_period_rejected() {
  let engine = TOTPEngine::new();

  assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 0, 59, OTPAlgorithm::SHA1)).is_err_containing(OTPError::InvalidPeriod);
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, "000000", 0, 1, OTPAlgorithm::SHA1, 59)).is_false();
}

#[test]
fn test_current_code_window() {
  let engine = TOTPEngine::new();
  let current = engine
    .generate_current_code_at(EXAMPLE_SECRET, OTPAlgorithm::SHA1, 1_556_733_311)
    .unwrap();

  assert_that(&current.code).is_equal_to("184557".to_string());
  assert_that(&current.valid_from.timestamp()).is_equal_to(1_556_733_300);
  assert_that(&current.valid_until.timestamp()).is_equal_to(1_556_733_330);
  assert_that(&current.period().num_seconds()).is_equal_to(DEFAULT_PERIOD as i64);
  assert_that(&current.remaining_at(current.valid_from).num_seconds()).is_equal_to(30);
  assert_that(&current.remaining_at(current.valid_until + chrono::Duration::seconds(3)).num_seconds())
    .is_equal_to(0);

  let live = engine.generate_current_code(EXAMPLE_SECRET, OTPAlgorithm::SHA256).unwrap();
  assert_that(&(live.valid_from.timestamp() % 30)).is_equal_to(0);
  assert_that(&live.code.len()).is_equal_to(6);
}

#[test]
fn test_validate_drift_window() {
  let engine = TOTPEngine::new();
  let now = 1_700_000_015;
  let code_at = |timestamp: u64| {
    engine
      .generate_code_at(EXAMPLE_SECRET, 30, timestamp, OTPAlgorithm::SHA1)
      .unwrap()
  };

  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now), 30, 0, OTPAlgorithm::SHA1, now)).is_true();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now - 30), 30, 0, OTPAlgorithm::SHA1, now)).is_false();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now - 30), 30, 1, OTPAlgorithm::SHA1, now)).is_true();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now + 30), 30, 1, OTPAlgorithm::SHA1, now)).is_true();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now - 60), 30, 1, OTPAlgorithm::SHA1, now)).is_false();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now + 60), 30, 1, OTPAlgorithm::SHA1, now)).is_false();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now - 60), 30, 2, OTPAlgorithm::SHA1, now)).is_true();
  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code_at(now), 30, 1, OTPAlgorithm::SHA256, now)).is_false();

  let current = engine.generate_current_code(EXAMPLE_SECRET, OTPAlgorithm::SHA1).unwrap();
  assert_that(&engine.validate_code(EXAMPLE_SECRET, &current.code, 30, 1, OTPAlgorithm::SHA1)).is_true();
}

#[test]
fn test_validate_near_epoch() {
  let engine = TOTPEngine::new();
  let code = engine.generate_code_at(EXAMPLE_SECRET, 30, 10, OTPAlgorithm::SHA1).unwrap();

  assert_that(&engine.validate_code_at(EXAMPLE_SECRET, &code, 30, 3, OTPAlgorithm::SHA1, 10)).is_true();
}

#[test]
fn test_cache_single_entry() {
  let engine = TOTPEngine::new();
  let other_secret = rfc6238_secret(OTPAlgorithm::SHA1);

  engine.generate_code_at(EXAMPLE_SECRET, 30, 59, OTPAlgorithm::SHA1).unwrap();
  assert_that(&engine.codec().cache().len()).is_equal_to(1);
  assert_that(&engine.codec().cache().get(EXAMPLE_SECRET)).is_some();

  engine.generate_code_at(&other_secret, 30, 59, OTPAlgorithm::SHA1).unwrap();
  assert_that(&engine.codec().cache().len()).is_equal_to(1);
  assert_that(&engine.codec().cache().get(EXAMPLE_SECRET)).is_none();

  assert_that(&engine.generate_code_at(EXAMPLE_SECRET, 30, 1_556_733_311, OTPAlgorithm::SHA1))
    .is_ok_containing("184557".to_string());
  assert_that(&engine.generate_code_at(&other_secret, 30, 59, OTPAlgorithm::SHA1))
    .is_ok_containing("287082".to_string());
}

#[test]
fn test_cache_capacity() {
  let cache = SecretCache::new(2);
  let codec = SecretCodec::with_cache_capacity(0);

  for text in &["MZXW6===", "GEZDGNBV", "JBSWY3DPEHPK3PXP"] {
    cache.insert(text, &codec.decode(text).unwrap());
  }
  assert_that(&cache.capacity()).is_equal_to(2);
  assert_that(&cache.len()).is_equal_to(2);
  assert_that(&cache.get("MZXW6===")).is_none();
  assert_that(&cache.get("GEZDGNBV")).is_some();

  cache.clear();
  assert_that(&cache.is_empty()).is_true();

  let disabled = SecretCache::new(0);
  disabled.insert("MZXW6===", &codec.decode("MZXW6").unwrap());
  assert_that(&disabled.is_empty()).is_true();
}

#[test]
fn test_cache_returns_copies() {
  let codec = SecretCodec::new();
  let mut first = codec.decode(EXAMPLE_SECRET).unwrap();

  first.zeroize();
  let second = codec.decode(EXAMPLE_SECRET).unwrap();

  assert_that(&first.is_empty()).is_true();
  assert_that(&second.len()).is_equal_to(10);
  assert_that(&second.to_string()).is_equal_to(EXAMPLE_SECRET.to_string());
}

#[test]
fn test_engines_are_isolated() {
  let first = TOTPEngine::new();
  let second = TOTPEngine::new();

  first.generate_code_at(EXAMPLE_SECRET, 30, 59, OTPAlgorithm::SHA1).unwrap();

  assert_that(&first.codec().cache().len()).is_equal_to(1);
  assert_that(&second.codec().cache().is_empty()).is_true();
}

#[test]
fn test_concurrent_generation() {
  let engine = Arc::new(TOTPEngine::new());
  let secrets = [EXAMPLE_SECRET.to_string(), rfc6238_secret(OTPAlgorithm::SHA1)];
  let expected = ["184557", "050471"];
  let timestamps = [1_556_733_311, 1_111_111_111];

  let handles = (0..8)
    .map(|i| {
      let engine = engine.clone();
      let secret = secrets[i % 2].clone();
      let timestamp = timestamps[i % 2];
      thread::spawn(move || {
        (0..200)
          .map(|_| engine.generate_code_at(&secret, 30, timestamp, OTPAlgorithm::SHA1).unwrap())
          .collect::<Vec<_>>()
      })
    })
    .collect::<Vec<_>>();

  for (i, handle) in handles.into_iter().enumerate() {
    for code in handle.join().unwrap() {
      assert_that(&code.as_str()).is_equal_to(expected[i % 2]);
    }
  }
}

#[test]
fn test_cache_does_not_change_results() {
  fn check(seed: Vec<u8>, timestamp: u64, period: u8) -> bool {
    let period = u64::from(period.max(1));
    let secret = BASE32.encode(&seed);
    let cached = TOTPEngine::new();
    let uncached = TOTPEngine::with_codec(SecretCodec::with_cache_capacity(0));

    OTPAlgorithm::ALL.iter().all(|algorithm| {
      let first = cached.generate_code_at(&secret, period, timestamp, *algorithm).unwrap();
      let second = cached.generate_code_at(&secret, period, timestamp, *algorithm).unwrap();
      let third = uncached.generate_code_at(&secret, period, timestamp, *algorithm).unwrap();

      first == second && first == third && first.len() == 6 && first.chars().all(|c| c.is_ascii_digit())
    })
  }

  quickcheck(check as fn(Vec<u8>, u64, u8) -> bool);
}

#[test]
fn test_algorithm_names() {
  assert_that(&"sha256".parse::<OTPAlgorithm>()).is_ok_containing(OTPAlgorithm::SHA256);
  assert_that(&"SHA512".parse::<OTPAlgorithm>()).is_ok_containing(OTPAlgorithm::SHA512);
  assert_that(&"MD5".parse::<OTPAlgorithm>()).is_err();
  assert_that(&OTPAlgorithm::default()).is_equal_to(OTPAlgorithm::SHA1);
  assert_that(&serde_json::to_string(&OTPAlgorithm::SHA256).unwrap()).is_equal_to("\"SHA256\"".to_string());
  assert_that(&serde_json::from_str::<OTPAlgorithm>("\"sha1\"").unwrap()).is_equal_to(OTPAlgorithm::SHA1);
}

#[test]
fn test_totp_url_std() {
  let totp_url = "otpauth://totp/Example:someone@somewhere.com?secret=JBSWY3DPEHPK3PXP&issuer=Example";
  let otpauth = OTPAuthUrl::parse(totp_url).unwrap();

  assert_that(&otpauth.algorithm).is_equal_to(OTPAlgorithm::SHA1);
  assert_that(&otpauth.digits).is_equal_to(6);
  assert_that(&otpauth.period).is_equal_to(30);
  assert_that(&otpauth.issuer).is_equal_to(Some("Example".to_string()));
  assert_that(&otpauth.account_name).is_equal_to("someone@somewhere.com".to_string());
  assert_that(&otpauth.secret).is_equal_to(EXAMPLE_SECRET.to_string());

  assert_that(&otpauth.to_url())
    .is_equal_to("otpauth://totp/Example:someone%40somewhere.com?secret=JBSWY3DPEHPK3PXP&issuer=Example".to_string());
}

#[test]
fn test_totp_url_long() {
  let totp_url =
    "otpauth://totp/someone%40somewhere.com?secret=LPD4D5FLWUBYFEB66SKYQGJBDS5HWYNT&period=60&digits=8&algorithm=sha256";
  let otpauth = OTPAuthUrl::parse(totp_url).unwrap();

  assert_that(&otpauth.algorithm).is_equal_to(OTPAlgorithm::SHA256);
  assert_that(&otpauth.digits).is_equal_to(8);
  assert_that(&otpauth.period).is_equal_to(60);
  assert_that(&otpauth.issuer).is_none();
  assert_that(&otpauth.account_name).is_equal_to("someone@somewhere.com".to_string());

  assert_that(&otpauth.to_url()).is_equal_to(
    "otpauth://totp/someone%40somewhere.com?secret=LPD4D5FLWUBYFEB66SKYQGJBDS5HWYNT&period=60&digits=8&algorithm=SHA256"
      .to_string(),
  );
}

#[test]
fn test_totp_url_errors() {
  assert_that(&OTPAuthUrl::parse("https://totp/alice?secret=JBSWY3DPEHPK3PXP")).is_err_containing(OTPError::InvalidScheme);
  assert_that(&OTPAuthUrl::parse("otpauth://hotp/alice?secret=JBSWY3DPEHPK3PXP&counter=1"))
    .is_err_containing(OTPError::InvalidType);
  assert_that(&OTPAuthUrl::parse("otpauth://totp/alice?issuer=Example"))
    .is_err_containing(OTPError::MissingParameter("secret".to_string()));
  assert_that(&OTPAuthUrl::parse("otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP&algorithm=MD5"))
    .is_err_containing(OTPError::InvalidAlgorithm("MD5".to_string()));
  assert_that(&OTPAuthUrl::parse("otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP&period=abc"))
    .is_err_containing(OTPError::InvalidParameter("period".to_string()));
  assert_that(&OTPAuthUrl::parse("otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP&period=0"))
    .is_err_containing(OTPError::InvalidPeriod);
  assert_that(&OTPAuthUrl::parse("not a url")).is_err();
}
