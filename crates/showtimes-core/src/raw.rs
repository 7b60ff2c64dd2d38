//! Unnormalised records as extracted by source adapters.

use serde::{Deserialize, Serialize};

use crate::theater::VenueId;

/// One screening as it appears on a source page, before any cleaning.
///
/// Every text field is verbatim (modulo whitespace trimming). The
/// reconciliation engine owns normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScreening {
  pub venue_id:        VenueId,
  pub title_text:      String,
  pub date_text:       String,
  pub time_text:       String,
  /// Surrounding text about this film alone. May name a projection format
  /// or a director.
  pub format_hint:     Option<String>,
  pub ticket_url:      Option<String>,
  pub notes:           Option<String>,
  /// Director when the source lists one explicitly.
  pub director:        Option<String>,
  pub runtime_minutes: Option<u32>,
}

impl RawScreening {
  pub fn new(
    venue_id: VenueId,
    title_text: impl Into<String>,
    date_text: impl Into<String>,
    time_text: impl Into<String>,
  ) -> Self {
    Self {
      venue_id,
      title_text:      title_text.into(),
      date_text:       date_text.into(),
      time_text:       time_text.into(),
      format_hint:     None,
      ticket_url:      None,
      notes:           None,
      director:        None,
      runtime_minutes: None,
    }
  }
}

/// Why an adapter dropped an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
  MissingTitle,
  MissingDate,
  MissingTime,
  MissingVenue,
  Malformed,
}

/// A malformed entry, reported instead of a [`RawScreening`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
  pub reason:  SkipReason,
  /// Short excerpt of the offending entry, for logs.
  pub excerpt: String,
}

impl SkippedEntry {
  pub fn new(reason: SkipReason, excerpt: impl AsRef<str>) -> Self {
    let excerpt: String = excerpt.as_ref().chars().take(80).collect();
    Self { reason, excerpt }
  }
}
