//! SQL schema for the showtimes SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE … IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS theaters (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    address     TEXT,
    city        TEXT,
    state       TEXT,
    zip         TEXT,
    latitude    REAL,
    longitude   REAL,
    website     TEXT
);

-- identity_key is the folded (title, director, year) triple. A UNIQUE over
-- the raw columns would not hold, since NULLs never compare equal.
CREATE TABLE IF NOT EXISTS movies (
    id           INTEGER PRIMARY KEY,
    title        TEXT NOT NULL,
    director     TEXT,
    year         INTEGER,
    runtime      INTEGER,
    format       TEXT,
    identity_key TEXT NOT NULL UNIQUE
);

-- Insert-only. screening_datetime is RFC 3339 UTC with a `Z` suffix and
-- whole seconds, so string equality is instant equality.
CREATE TABLE IF NOT EXISTS screenings (
    id                 INTEGER PRIMARY KEY,
    movie_id           INTEGER NOT NULL REFERENCES movies(id),
    theater_id         INTEGER NOT NULL REFERENCES theaters(id),
    screening_datetime TEXT NOT NULL,
    ticket_url         TEXT,
    special_notes      TEXT,
    created_at         TEXT NOT NULL,
    UNIQUE (movie_id, theater_id, screening_datetime)
);

CREATE INDEX IF NOT EXISTS screenings_datetime_idx ON screenings(screening_datetime);
CREATE INDEX IF NOT EXISTS screenings_theater_idx  ON screenings(theater_id);
CREATE INDEX IF NOT EXISTS screenings_created_idx  ON screenings(created_at);

PRAGMA user_version = 1;
";
