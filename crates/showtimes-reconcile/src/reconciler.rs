//! Per-record reconciliation.
//!
//! Each [`RawScreening`] ends in exactly one [`Outcome`]:
//!   normalise title ─▶ resolve theater ─▶ parse datetime ─▶ resolve movie
//!     ─▶ existence check ─▶ insert
//!
//! Records that fail to parse stop before the movie step, so they never
//! leave orphan movie rows behind.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use showtimes_core::{
  movie::{FormatTag, MovieId, MovieKey, NewMovie},
  raw::RawScreening,
  screening::{InsertOutcome, NewScreening, ScreeningId},
  store::ShowtimeStore,
  theater::{TheaterId, VenueId},
};
use showtimes_normalize::{
  clean_title, extract_director, extract_format, parse_datetime, split_release_year,
  strip_event_prefix,
};
use showtimes_sources::Registry;

use crate::{Error, MissingVenueError, Result, SkipCause};

/// Engine policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
  /// Format recorded when neither the title nor the hint names one.
  pub default_format: Option<FormatTag>,
}

/// Terminal state of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Inserted(ScreeningId),
  SkippedDuplicate,
  SkippedError(SkipCause),
}

/// Normalised identity parts of a record's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NormalizedTitle {
  pub title:    String,
  pub year:     Option<i32>,
  pub director: Option<String>,
}

pub(crate) fn normalize_title(raw: &RawScreening) -> Option<NormalizedTitle> {
  let cleaned = clean_title(&strip_event_prefix(&raw.title_text));
  let (title, year) = split_release_year(&cleaned);
  if title.is_empty() {
    return None;
  }
  let director = raw
    .director
    .clone()
    .filter(|d| !d.trim().is_empty())
    .or_else(|| raw.format_hint.as_deref().and_then(extract_director));
  Some(NormalizedTitle { title, year, director })
}

/// Reconciles records from one run into a store.
///
/// Theater and movie lookups are cached for the lifetime of the value, so
/// build one per run.
pub struct Reconciler<'a, S> {
  store:    &'a S,
  registry: &'a Registry,
  options:  ReconcileOptions,
  today:    NaiveDate,
  theaters: HashMap<VenueId, TheaterId>,
  movies:   HashMap<String, MovieId>,
  /// Movie rows created by this reconciler.
  created:  u64,
}

impl<'a, S: ShowtimeStore> Reconciler<'a, S> {
  pub fn new(store: &'a S, registry: &'a Registry, today: NaiveDate, options: ReconcileOptions) -> Self {
    Self {
      store,
      registry,
      options,
      today,
      theaters: HashMap::new(),
      movies: HashMap::new(),
      created: 0,
    }
  }

  pub fn movies_created(&self) -> u64 { self.created }

  /// Reconcile one record.
  ///
  /// Errors are fatal for the current source: an unregistered venue or a
  /// store failure. Everything else is an [`Outcome`].
  pub async fn reconcile(&mut self, raw: RawScreening) -> Result<Outcome> {
    let Some(normalized) = normalize_title(&raw) else {
      tracing::debug!(raw_title = %raw.title_text, "skipping record with empty title");
      return Ok(Outcome::SkippedError(SkipCause::EmptyTitle));
    };

    let theater_id = self.theater_for(&raw.venue_id).await?;

    let starts_at = match parse_datetime(&raw.date_text, &raw.time_text, self.today) {
      Ok(at) => at.with_timezone(&Utc),
      Err(e) => {
        tracing::debug!(
          title = %normalized.title,
          date = %raw.date_text,
          time = %raw.time_text,
          error = %e,
          "skipping unparseable showtime"
        );
        return Ok(Outcome::SkippedError(e.into()));
      }
    };

    let format = extract_format(&raw.title_text)
      .or_else(|| raw.format_hint.as_deref().and_then(extract_format))
      .or(self.options.default_format);
    let key = MovieKey::new(normalized.title)
      .with_director(normalized.director)
      .with_year(normalized.year);
    let movie_id = self.movie_for(key, raw.runtime_minutes, format).await?;

    if self
      .store
      .screening_exists(movie_id, theater_id, starts_at)
      .await
      .map_err(Error::store)?
    {
      return Ok(Outcome::SkippedDuplicate);
    }

    let outcome = self
      .store
      .insert_screening(NewScreening {
        movie_id,
        theater_id,
        starts_at,
        ticket_url: raw.ticket_url,
        notes: raw.notes,
      })
      .await
      .map_err(Error::store)?;

    Ok(match outcome {
      InsertOutcome::Inserted(screening) => Outcome::Inserted(screening.id),
      // Lost a race with a concurrent run.
      InsertOutcome::Duplicate => Outcome::SkippedDuplicate,
    })
  }

  async fn theater_for(&mut self, venue_id: &VenueId) -> Result<TheaterId> {
    if let Some(id) = self.theaters.get(venue_id) {
      return Ok(*id);
    }
    let venue = self
      .registry
      .venue(venue_id)
      .ok_or_else(|| MissingVenueError { venue_id: venue_id.clone() })?;
    let theater = self
      .store
      .ensure_theater(venue.theater.clone())
      .await
      .map_err(Error::store)?;
    self.theaters.insert(venue_id.clone(), theater.id);
    Ok(theater.id)
  }

  async fn movie_for(
    &mut self,
    key:             MovieKey,
    runtime_minutes: Option<u32>,
    format:          Option<FormatTag>,
  ) -> Result<MovieId> {
    let identity = key.identity_key();
    if let Some(id) = self.movies.get(&identity) {
      return Ok(*id);
    }
    let (movie, created) = self
      .store
      .find_or_create_movie(NewMovie { key, runtime_minutes, format })
      .await
      .map_err(Error::store)?;
    if created {
      self.created += 1;
      tracing::debug!(title = %movie.title, id = movie.id.0, "created movie");
    }
    self.movies.insert(identity, movie.id);
    Ok(movie.id)
  }
}
