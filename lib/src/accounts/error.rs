use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
  #[error("IO: {0}")]
  IO(#[from] std::io::Error),
  #[error("Invalid accounts file: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Account not found: {}", .0.join(", "))]
  NotFound(Vec<String>),
}

pub type AccountResult<T> = Result<T, AccountError>;
