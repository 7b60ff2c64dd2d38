//! Error type for `showtimes-normalize`.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("unrecognised date: {0:?}")]
  InvalidDate(String),

  #[error("unrecognised time: {0:?}")]
  InvalidTime(String),

  #[error("{0} does not exist in the theater time zone")]
  NonexistentLocalTime(NaiveDateTime),
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
