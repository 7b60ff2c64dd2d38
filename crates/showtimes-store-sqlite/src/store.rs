//! [`SqliteStore`], the SQLite implementation of [`ShowtimeStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use showtimes_core::{
  movie::{Movie, MovieId, MovieKey, NewMovie},
  screening::{InsertOutcome, NewScreening, Screening, ScreeningId, UpcomingScreening},
  store::{ShowtimeStore, StoreCounts},
  theater::{Coordinates, NewTheater, Theater, TheaterId},
};

use crate::{
  Error, Result,
  encode::{
    MOVIE_COLUMNS, MovieRow, THEATER_COLUMNS, TheaterRow, UpcomingRow, decode_dt, encode_dt,
    encode_format,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A showtimes store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn movie_by_identity(&self, identity_key: String) -> Result<Option<Movie>> {
    let row: Option<MovieRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE identity_key = ?1"),
              rusqlite::params![identity_key],
              MovieRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    row.map(MovieRow::into_movie).transpose()
  }
}

// ─── ShowtimeStore impl ──────────────────────────────────────────────────────

impl ShowtimeStore for SqliteStore {
  type Error = Error;

  // ── Theaters ──────────────────────────────────────────────────────────

  async fn ensure_theater(&self, theater: NewTheater) -> Result<Theater> {
    let latitude  = theater.coordinates.map(|c| c.latitude);
    let longitude = theater.coordinates.map(|c| c.longitude);

    let row: TheaterRow = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO theaters (name, address, city, state, zip, latitude, longitude, website)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(name) DO NOTHING",
          rusqlite::params![
            theater.name,
            theater.address,
            theater.city,
            theater.state,
            theater.zip,
            latitude,
            longitude,
            theater.website,
          ],
        )?;
        // Existing rows only ever gain coordinates they were missing.
        if latitude.is_some() && longitude.is_some() {
          tx.execute(
            "UPDATE theaters SET latitude = ?2, longitude = ?3
             WHERE name = ?1 AND (latitude IS NULL OR longitude IS NULL)",
            rusqlite::params![theater.name, latitude, longitude],
          )?;
        }
        let row = tx.query_row(
          &format!("SELECT {THEATER_COLUMNS} FROM theaters WHERE name = ?1"),
          rusqlite::params![theater.name],
          TheaterRow::from_row,
        )?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    Ok(row.into_theater())
  }

  async fn get_theater(&self, id: TheaterId) -> Result<Option<Theater>> {
    let row: Option<TheaterRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {THEATER_COLUMNS} FROM theaters WHERE id = ?1"),
              rusqlite::params![id.0],
              TheaterRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row.map(TheaterRow::into_theater))
  }

  async fn list_theaters(&self) -> Result<Vec<Theater>> {
    let rows: Vec<TheaterRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {THEATER_COLUMNS} FROM theaters ORDER BY name"))?;
        let rows = stmt
          .query_map([], TheaterRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().map(TheaterRow::into_theater).collect())
  }

  async fn set_theater_coordinates(
    &self,
    id:          TheaterId,
    coordinates: Coordinates,
  ) -> Result<Option<Theater>> {
    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE theaters SET latitude = ?2, longitude = ?3 WHERE id = ?1",
          rusqlite::params![id.0, coordinates.latitude, coordinates.longitude],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_theater(id).await
  }

  // ── Movies ────────────────────────────────────────────────────────────

  async fn find_movie<'a>(&'a self, key: &'a MovieKey) -> Result<Option<Movie>> {
    self.movie_by_identity(key.identity_key()).await
  }

  async fn find_or_create_movie(&self, movie: NewMovie) -> Result<(Movie, bool)> {
    let identity_key = movie.key.identity_key();
    let format       = encode_format(movie.format);
    let runtime      = movie.runtime_minutes.map(i64::from);

    let (created, row): (bool, MovieRow) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = tx.execute(
          "INSERT INTO movies (title, director, year, runtime, format, identity_key)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(identity_key) DO NOTHING",
          rusqlite::params![
            movie.key.title,
            movie.key.director,
            movie.key.year,
            runtime,
            format,
            identity_key,
          ],
        )?;
        let row = tx.query_row(
          &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE identity_key = ?1"),
          rusqlite::params![identity_key],
          MovieRow::from_row,
        )?;
        tx.commit()?;
        Ok((inserted == 1, row))
      })
      .await?;

    Ok((row.into_movie()?, created))
  }

  // ── Screenings ────────────────────────────────────────────────────────

  async fn screening_exists(
    &self,
    movie_id:   MovieId,
    theater_id: TheaterId,
    starts_at:  DateTime<Utc>,
  ) -> Result<bool> {
    let at_str = encode_dt(starts_at);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM screenings
               WHERE movie_id = ?1 AND theater_id = ?2 AND screening_datetime = ?3",
              rusqlite::params![movie_id.0, theater_id.0, at_str],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn insert_screening(&self, screening: NewScreening) -> Result<InsertOutcome> {
    let created_at  = Utc::now();
    let at_str      = encode_dt(screening.starts_at);
    let created_str = encode_dt(created_at);
    let ticket_url  = screening.ticket_url.clone();
    let notes       = screening.notes.clone();
    let movie_id    = screening.movie_id;
    let theater_id  = screening.theater_id;

    // The UNIQUE triple is the final word on duplicates, whatever callers
    // checked beforehand.
    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO screenings
             (movie_id, theater_id, screening_datetime, ticket_url, special_notes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(movie_id, theater_id, screening_datetime) DO NOTHING",
          rusqlite::params![movie_id.0, theater_id.0, at_str, ticket_url, notes, created_str],
        )?;
        Ok((changed == 1).then(|| conn.last_insert_rowid()))
      })
      .await?;

    let Some(id) = inserted else {
      return Ok(InsertOutcome::Duplicate);
    };

    // Stored with whole seconds; report what a read would return.
    Ok(InsertOutcome::Inserted(Screening {
      id:         ScreeningId(id),
      movie_id,
      theater_id,
      starts_at:  decode_dt(&encode_dt(screening.starts_at))?,
      ticket_url: screening.ticket_url,
      notes:      screening.notes,
      created_at: decode_dt(&encode_dt(created_at))?,
    }))
  }

  async fn upcoming_screenings(
    &self,
    from:  DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<UpcomingScreening>> {
    let from_str  = encode_dt(from);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows: Vec<UpcomingRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.id, s.movie_id, s.theater_id, s.screening_datetime,
             s.ticket_url, s.special_notes, s.created_at,
             m.title, m.format, t.name
           FROM screenings s
           JOIN movies   m ON m.id = s.movie_id
           JOIN theaters t ON t.id = s.theater_id
           WHERE s.screening_datetime >= ?1
           ORDER BY s.screening_datetime, s.id
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![from_str, limit_val], UpcomingRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(UpcomingRow::into_upcoming).collect()
  }

  async fn counts(&self) -> Result<StoreCounts> {
    let (theaters, movies, screenings): (i64, i64, i64) = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<i64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        };
        Ok((count("theaters")?, count("movies")?, count("screenings")?))
      })
      .await?;

    let to_u64 = |column: &'static str, value: i64| {
      u64::try_from(value).map_err(|_| Error::OutOfRange { column, value })
    };
    Ok(StoreCounts {
      theaters:   to_u64("theaters", theaters)?,
      movies:     to_u64("movies", movies)?,
      screenings: to_u64("screenings", screenings)?,
    })
  }
}
