//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Instants are stored as RFC 3339 UTC strings with whole seconds and a `Z`
//! suffix, so lexical order is chronological order. Format tags are stored
//! by label.

use chrono::{DateTime, SecondsFormat, Utc};
use showtimes_core::{
  movie::{FormatTag, Movie, MovieId},
  screening::{Screening, ScreeningId, UpcomingScreening},
  theater::{Coordinates, Theater, TheaterId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Secs, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FormatTag ───────────────────────────────────────────────────────────────

pub fn encode_format(format: Option<FormatTag>) -> Option<&'static str> { format.map(FormatTag::label) }

pub fn decode_format(s: Option<&str>) -> Result<Option<FormatTag>> {
  Ok(s.map(str::parse::<FormatTag>).transpose()?)
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_runtime(value: Option<i64>) -> Result<Option<u32>> {
  value
    .map(|v| u32::try_from(v).map_err(|_| Error::OutOfRange { column: "runtime", value: v }))
    .transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values read directly from a `theaters` row.
pub struct TheaterRow {
  pub id:        i64,
  pub name:      String,
  pub address:   Option<String>,
  pub city:      Option<String>,
  pub state:     Option<String>,
  pub zip:       Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
  pub website:   Option<String>,
}

pub const THEATER_COLUMNS: &str =
  "id, name, address, city, state, zip, latitude, longitude, website";

impl TheaterRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      name:      row.get(1)?,
      address:   row.get(2)?,
      city:      row.get(3)?,
      state:     row.get(4)?,
      zip:       row.get(5)?,
      latitude:  row.get(6)?,
      longitude: row.get(7)?,
      website:   row.get(8)?,
    })
  }

  pub fn into_theater(self) -> Theater {
    let coordinates = match (self.latitude, self.longitude) {
      (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
      _ => None,
    };
    Theater {
      id:      TheaterId(self.id),
      name:    self.name,
      address: self.address,
      city:    self.city,
      state:   self.state,
      zip:     self.zip,
      coordinates,
      website: self.website,
    }
  }
}

/// Column values read directly from a `movies` row.
pub struct MovieRow {
  pub id:       i64,
  pub title:    String,
  pub director: Option<String>,
  pub year:     Option<i32>,
  pub runtime:  Option<i64>,
  pub format:   Option<String>,
}

pub const MOVIE_COLUMNS: &str = "id, title, director, year, runtime, format";

impl MovieRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      title:    row.get(1)?,
      director: row.get(2)?,
      year:     row.get(3)?,
      runtime:  row.get(4)?,
      format:   row.get(5)?,
    })
  }

  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      id:              MovieId(self.id),
      title:           self.title,
      director:        self.director,
      year:            self.year,
      runtime_minutes: decode_runtime(self.runtime)?,
      format:          decode_format(self.format.as_deref())?,
    })
  }
}

/// A `screenings` row joined with its movie title, format and theater name.
pub struct UpcomingRow {
  pub id:                 i64,
  pub movie_id:           i64,
  pub theater_id:         i64,
  pub screening_datetime: String,
  pub ticket_url:         Option<String>,
  pub special_notes:      Option<String>,
  pub created_at:         String,
  pub movie_title:        String,
  pub movie_format:       Option<String>,
  pub theater_name:       String,
}

impl UpcomingRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      movie_id:           row.get(1)?,
      theater_id:         row.get(2)?,
      screening_datetime: row.get(3)?,
      ticket_url:         row.get(4)?,
      special_notes:      row.get(5)?,
      created_at:         row.get(6)?,
      movie_title:        row.get(7)?,
      movie_format:       row.get(8)?,
      theater_name:       row.get(9)?,
    })
  }

  pub fn into_upcoming(self) -> Result<UpcomingScreening> {
    Ok(UpcomingScreening {
      screening:    Screening {
        id:         ScreeningId(self.id),
        movie_id:   MovieId(self.movie_id),
        theater_id: TheaterId(self.theater_id),
        starts_at:  decode_dt(&self.screening_datetime)?,
        ticket_url: self.ticket_url,
        notes:      self.special_notes,
        created_at: decode_dt(&self.created_at)?,
      },
      movie_title:  self.movie_title,
      theater_name: self.theater_name,
      format:       decode_format(self.movie_format.as_deref())?,
    })
  }
}
