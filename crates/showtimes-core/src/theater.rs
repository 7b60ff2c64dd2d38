//! Theaters, one per physical venue.
//!
//! Theaters are never scraped. They are seeded from the static venue table
//! owned by the source registry, and the only mutation ever applied is a
//! coordinate backfill.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Row id of a persisted theater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TheaterId(pub i64);

/// Stable slug naming a venue in the registry (e.g. `new-beverly`).
///
/// Adapters tag every record with one of these; the reconciliation engine
/// resolves it to a [`Theater`] through the registry's seed data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
  pub fn new(slug: impl Into<String>) -> Self { Self(slug.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for VenueId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for VenueId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Coordinates ─────────────────────────────────────────────────────────────

/// A WGS 84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Coordinates {
  /// Build a position, rejecting values outside the valid ranges.
  pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
    if !(-90.0..=90.0).contains(&latitude) {
      return Err(Error::InvalidLatitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
      return Err(Error::InvalidLongitude(longitude));
    }
    Ok(Self { latitude, longitude })
  }
}

// ─── Theater ─────────────────────────────────────────────────────────────────

/// Input for [`ShowtimeStore::ensure_theater`](crate::store::ShowtimeStore::ensure_theater).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTheater {
  /// Unique per physical venue.
  pub name:        String,
  pub address:     Option<String>,
  pub city:        Option<String>,
  pub state:       Option<String>,
  pub zip:         Option<String>,
  /// `None` until resolved by a geocoding pass.
  pub coordinates: Option<Coordinates>,
  pub website:     Option<String>,
}

impl NewTheater {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      address:     None,
      city:        None,
      state:       None,
      zip:         None,
      coordinates: None,
      website:     None,
    }
  }
}

/// A persisted theater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theater {
  pub id:          TheaterId,
  pub name:        String,
  pub address:     Option<String>,
  pub city:        Option<String>,
  pub state:       Option<String>,
  pub zip:         Option<String>,
  pub coordinates: Option<Coordinates>,
  pub website:     Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coordinates_reject_out_of_range() {
    assert!(Coordinates::new(34.07, -118.34).is_ok());
    assert!(matches!(Coordinates::new(91.0, 0.0), Err(Error::InvalidLatitude(_))));
    assert!(matches!(
      Coordinates::new(0.0, -181.0),
      Err(Error::InvalidLongitude(_))
    ));
  }

  #[test]
  fn venue_id_serialises_as_plain_string() {
    let id = VenueId::from("laemmle-royal");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"laemmle-royal\"");
  }
}
