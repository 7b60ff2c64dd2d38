//! Error types for `showtimes-reconcile`.

use showtimes_core::theater::VenueId;
use showtimes_normalize::ParseError;
use thiserror::Error;

/// A record names a venue the registry has no seed data for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("venue {venue_id} is not registered")]
pub struct MissingVenueError {
  pub venue_id: VenueId,
}

/// Failures that abort the current source's run.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  MissingVenue(#[from] MissingVenueError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single record was skipped. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipCause {
  #[error("title is empty after cleaning")]
  EmptyTitle,

  #[error(transparent)]
  Parse(#[from] ParseError),
}
