//! Movies: the canonical film entity shared by screenings across venues.
//!
//! A movie is identified by the triple (title, director, year). Both text
//! parts are compared case- and whitespace-insensitively, so `"The  Long
//! Goodbye"` and `"the long goodbye"` resolve to the same row.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Row id of a persisted movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovieId(pub i64);

// ─── Format tag ──────────────────────────────────────────────────────────────

/// A physical or projection format label.
///
/// Variants are declared in priority order: when several formats are
/// mentioned in one piece of text the first variant wins. Physical film
/// outranks `Digital`, which is usually the unstated default.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum FormatTag {
  #[serde(rename = "70mm")]
  Film70mm,
  #[serde(rename = "IB Technicolor 35mm")]
  IbTechnicolor,
  #[serde(rename = "35mm")]
  Film35mm,
  #[serde(rename = "16mm")]
  Film16mm,
  #[serde(rename = "Technicolor")]
  Technicolor,
  #[serde(rename = "Digital")]
  Digital,
}

impl FormatTag {
  pub const ALL: [FormatTag; 6] = [
    FormatTag::Film70mm,
    FormatTag::IbTechnicolor,
    FormatTag::Film35mm,
    FormatTag::Film16mm,
    FormatTag::Technicolor,
    FormatTag::Digital,
  ];

  pub fn label(self) -> &'static str {
    match self {
      FormatTag::Film70mm => "70mm",
      FormatTag::IbTechnicolor => "IB Technicolor 35mm",
      FormatTag::Film35mm => "35mm",
      FormatTag::Film16mm => "16mm",
      FormatTag::Technicolor => "Technicolor",
      FormatTag::Digital => "Digital",
    }
  }
}

impl fmt::Display for FormatTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for FormatTag {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    FormatTag::ALL
      .into_iter()
      .find(|tag| tag.label().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| Error::UnknownFormat(s.to_owned()))
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Separator between the parts of an identity key. Never survives whitespace
/// normalisation of the parts, so keys cannot collide across boundaries.
const KEY_SEPARATOR: char = '\u{1f}';

/// The identity triple of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieKey {
  pub title:    String,
  pub director: Option<String>,
  pub year:     Option<i32>,
}

impl MovieKey {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), director: None, year: None }
  }

  pub fn with_director(mut self, director: Option<String>) -> Self {
    self.director = director;
    self
  }

  pub fn with_year(mut self, year: Option<i32>) -> Self {
    self.year = year;
    self
  }

  /// The normalised string stored in the `identity_key` column.
  ///
  /// Absent director and year map to empty parts so the store's UNIQUE
  /// constraint also covers rows where they are NULL.
  pub fn identity_key(&self) -> String {
    let title = fold(&self.title);
    let director = self.director.as_deref().map(fold).unwrap_or_default();
    let year = self.year.map(|y| y.to_string()).unwrap_or_default();
    format!("{title}{KEY_SEPARATOR}{director}{KEY_SEPARATOR}{year}")
  }
}

/// Lowercase, trim and collapse runs of whitespace (and stray separators).
fn fold(s: &str) -> String {
  s.split(|c: char| c.is_whitespace() || c == KEY_SEPARATOR)
    .filter(|part| !part.is_empty())
    .map(str::to_lowercase)
    .collect::<Vec<_>>()
    .join(" ")
}

// ─── Movie ───────────────────────────────────────────────────────────────────

/// Input for [`ShowtimeStore::find_or_create_movie`](crate::store::ShowtimeStore::find_or_create_movie).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
  pub key:             MovieKey,
  pub runtime_minutes: Option<u32>,
  pub format:          Option<FormatTag>,
}

/// A persisted movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
  pub id:              MovieId,
  /// Display title as first seen (cleaned, original casing).
  pub title:           String,
  pub director:        Option<String>,
  pub year:            Option<i32>,
  pub runtime_minutes: Option<u32>,
  /// First-seen format. A title screening in several formats keeps only
  /// the first one recorded here.
  pub format:          Option<FormatTag>,
}
