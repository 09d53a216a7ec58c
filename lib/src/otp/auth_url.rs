use super::{OTPAlgorithm, OTPError, OTPResult, DEFAULT_DIGITS, DEFAULT_PERIOD};
use percent_encoding::percent_decode_str;
use std::str::FromStr;
use url::{form_urlencoded, Url};

const OTP_URL_SCHEME: &str = "otpauth";
const OTP_URL_TYPE: &str = "totp";

/// Content of an `otpauth://totp/...` provisioning URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OTPAuthUrl {
  pub algorithm: OTPAlgorithm,
  pub period: u64,
  pub digits: u8,
  pub account_name: String,
  pub issuer: Option<String>,
  pub secret: String,
}

impl OTPAuthUrl {
  pub fn parse<S: AsRef<str>>(url_str: S) -> OTPResult<OTPAuthUrl> {
    let url = Url::parse(url_str.as_ref())?;
    if url.scheme() != OTP_URL_SCHEME {
      return Err(OTPError::InvalidScheme);
    }
    if url.host_str() != Some(OTP_URL_TYPE) {
      return Err(OTPError::InvalidType);
    }
    let label = percent_decode_str(url.path().trim_start_matches('/'))
      .decode_utf8()
      .map_err(|_| OTPError::InvalidParameter("label".to_string()))?;
    let (label_issuer, account_name) = match label.split_once(':') {
      Some((issuer, account)) => (Some(issuer.trim().to_string()), account.trim().to_string()),
      None => (None, label.to_string()),
    };
    let issuer = Self::find_parameter::<String>(&url, "issuer")?
      .filter(|issuer| !issuer.is_empty())
      .or(label_issuer);
    let algorithm = match Self::find_parameter::<String>(&url, "algorithm")? {
      Some(name) => name.parse()?,
      None => OTPAlgorithm::default(),
    };
    let period = Self::find_parameter(&url, "period")?.unwrap_or(DEFAULT_PERIOD);
    if period == 0 {
      return Err(OTPError::InvalidPeriod);
    }
    let digits = Self::find_parameter(&url, "digits")?.unwrap_or(DEFAULT_DIGITS);
    let secret = Self::find_required_parameter::<String>(&url, "secret")?;
    if secret.is_empty() {
      return Err(OTPError::MissingParameter("secret".to_string()));
    }

    Ok(OTPAuthUrl {
      algorithm,
      period,
      digits,
      account_name,
      issuer,
      secret,
    })
  }

  pub fn to_url(&self) -> String {
    let mut result = format!("{}://{}/", OTP_URL_SCHEME, OTP_URL_TYPE);

    if let Some(issuer) = &self.issuer {
      result.extend(form_urlencoded::byte_serialize(issuer.as_bytes()));
      result += ":"
    }
    result.extend(form_urlencoded::byte_serialize(self.account_name.as_bytes()));
    result += "?secret=";
    result.extend(form_urlencoded::byte_serialize(self.secret.replace(' ', "").as_bytes()));
    if self.period != DEFAULT_PERIOD {
      result += &format!("&period={}", self.period);
    }
    if self.digits != DEFAULT_DIGITS {
      result += &format!("&digits={}", self.digits);
    }
    if let Some(issuer) = &self.issuer {
      result += "&issuer=";
      result.extend(form_urlencoded::byte_serialize(issuer.as_bytes()));
    }
    if self.algorithm != OTPAlgorithm::SHA1 {
      result += &format!("&algorithm={}", self.algorithm);
    }

    result
  }

  fn find_parameter<T: FromStr>(url: &Url, name: &str) -> OTPResult<Option<T>> {
    match url.query_pairs().find(|(key, _)| key == name) {
      Some((_, value)) => {
        let t = value
          .trim()
          .parse::<T>()
          .map_err(|_| OTPError::InvalidParameter(name.to_string()))?;
        Ok(Some(t))
      }
      None => Ok(None),
    }
  }

  fn find_required_parameter<T: FromStr>(url: &Url, name: &str) -> OTPResult<T> {
    Self::find_parameter(url, name)?.ok_or_else(|| OTPError::MissingParameter(name.to_string()))
  }
}
