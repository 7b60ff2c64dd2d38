//! Error types for `showtimes-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown format tag: {0:?}")]
  UnknownFormat(String),

  #[error("latitude {0} is out of range")]
  InvalidLatitude(f64),

  #[error("longitude {0} is out of range")]
  InvalidLongitude(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
