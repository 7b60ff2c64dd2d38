//! Screenings: one showing of a movie at a theater at an instant.
//!
//! The triple (movie, theater, starts_at) is the sole deduplication key.
//! Screenings are never updated: a changed showtime becomes a new row and
//! the old one is left in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  movie::{FormatTag, MovieId},
  theater::TheaterId,
};

/// Row id of a persisted screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreeningId(pub i64);

/// Input for [`ShowtimeStore::insert_screening`](crate::store::ShowtimeStore::insert_screening).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScreening {
  pub movie_id:   MovieId,
  pub theater_id: TheaterId,
  pub starts_at:  DateTime<Utc>,
  pub ticket_url: Option<String>,
  /// Free-text notes such as "Double feature with Night Moves".
  pub notes:      Option<String>,
}

/// A persisted screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screening {
  pub id:         ScreeningId,
  pub movie_id:   MovieId,
  pub theater_id: TheaterId,
  pub starts_at:  DateTime<Utc>,
  pub ticket_url: Option<String>,
  pub notes:      Option<String>,
  /// Server-assigned insertion time.
  pub created_at: DateTime<Utc>,
}

/// Result of an insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted(Screening),
  /// The (movie, theater, starts_at) triple already exists. Raised by the
  /// store's uniqueness constraint, so it also covers concurrent runs.
  Duplicate,
}

/// A screening joined with the display fields needed by a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingScreening {
  pub screening:    Screening,
  pub movie_title:  String,
  pub theater_name: String,
  pub format:       Option<FormatTag>,
}
