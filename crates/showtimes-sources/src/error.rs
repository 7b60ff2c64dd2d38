//! Error types for `showtimes-sources`.

use showtimes_core::theater::VenueId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid selector {selector:?}: {message}")]
  Selector { selector: String, message: String },

  #[error("malformed feed payload: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("page for {url} was fetched without a venue")]
  MissingRequestVenue { url: String },

  #[error("source {0:?} is already registered")]
  DuplicateSource(String),

  #[error("venue {0} is already registered")]
  DuplicateVenue(VenueId),

  #[error("source {source_id:?} covers venue {venue} but no seed data was given for it")]
  UnseededVenue { source_id: String, venue: VenueId },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Transport failure for one request. The request is skipped; the rest of
/// the run continues.
#[derive(Debug, Error)]
#[error("fetch of {url} failed: {message}")]
pub struct FetchError {
  pub url:     String,
  pub message: String,
}

impl FetchError {
  pub fn new(url: impl Into<String>, message: impl ToString) -> Self {
    Self { url: url.into(), message: message.to_string() }
  }
}
