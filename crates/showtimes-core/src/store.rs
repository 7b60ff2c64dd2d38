//! The `ShowtimeStore` trait and supporting types.
//!
//! Implemented by storage backends (e.g. `showtimes-store-sqlite`). The
//! reconciliation engine and the CLI depend on this abstraction only.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  movie::{Movie, MovieId, MovieKey, NewMovie},
  screening::{InsertOutcome, NewScreening, UpcomingScreening},
  theater::{Coordinates, NewTheater, Theater, TheaterId},
};

// ─── Supporting types ────────────────────────────────────────────────────────

/// Row counts per entity, for run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
  pub theaters:   u64,
  pub movies:     u64,
  pub screenings: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a showtimes store backend.
///
/// Movies and screenings are insert-only. Uniqueness of a movie's identity
/// triple and of a screening's (movie, theater, starts_at) triple must be
/// enforced by the backend itself, not just by callers checking first.
pub trait ShowtimeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Theaters ──────────────────────────────────────────────────────────

  /// Return the theater named `theater.name`, creating it if absent.
  ///
  /// An existing row is never overwritten, except that missing coordinates
  /// are filled in when `theater.coordinates` is set.
  fn ensure_theater(
    &self,
    theater: NewTheater,
  ) -> impl Future<Output = Result<Theater, Self::Error>> + Send + '_;

  fn get_theater(
    &self,
    id: TheaterId,
  ) -> impl Future<Output = Result<Option<Theater>, Self::Error>> + Send + '_;

  fn list_theaters(
    &self,
  ) -> impl Future<Output = Result<Vec<Theater>, Self::Error>> + Send + '_;

  /// Backfill a theater's position. Returns the updated theater, or `None`
  /// if no such theater exists.
  fn set_theater_coordinates(
    &self,
    id: TheaterId,
    coordinates: Coordinates,
  ) -> impl Future<Output = Result<Option<Theater>, Self::Error>> + Send + '_;

  // ── Movies ────────────────────────────────────────────────────────────

  fn find_movie<'a>(
    &'a self,
    key: &'a MovieKey,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + 'a;

  /// Return the movie with `movie.key`'s identity, creating it if absent.
  /// The boolean is `true` when a row was created by this call.
  fn find_or_create_movie(
    &self,
    movie: NewMovie,
  ) -> impl Future<Output = Result<(Movie, bool), Self::Error>> + Send + '_;

  // ── Screenings ────────────────────────────────────────────────────────

  fn screening_exists(
    &self,
    movie_id: MovieId,
    theater_id: TheaterId,
    starts_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert a screening. A uniqueness conflict yields
  /// [`InsertOutcome::Duplicate`] rather than an error.
  ///
  /// Fails if the referenced movie or theater does not exist.
  fn insert_screening(
    &self,
    screening: NewScreening,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// Screenings starting at or after `from`, soonest first.
  fn upcoming_screenings(
    &self,
    from: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<UpcomingScreening>, Self::Error>> + Send + '_;

  fn counts(&self) -> impl Future<Output = Result<StoreCounts, Self::Error>> + Send + '_;
}
