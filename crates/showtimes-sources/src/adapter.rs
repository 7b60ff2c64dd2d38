//! The `SourceAdapter` trait and the types crossing the fetch boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use showtimes_core::{
  raw::{RawScreening, SkippedEntry},
  theater::VenueId,
};

use crate::Result;

// ─── Fetch boundary ──────────────────────────────────────────────────────────

/// Reference values for one scrape. Adapters never read a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeContext {
  /// Today's date in the theaters' zone.
  pub today: NaiveDate,
}

/// One page an adapter wants fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
  pub url:      String,
  /// The venue this page belongs to; `None` for multi-venue feeds whose
  /// entries carry their own location.
  pub venue_id: Option<VenueId>,
  /// The calendar day this page covers, for date-paginated sources.
  pub date:     Option<NaiveDate>,
}

impl FetchRequest {
  pub fn for_venue(url: impl Into<String>, venue_id: VenueId) -> Self {
    Self { url: url.into(), venue_id: Some(venue_id), date: None }
  }
}

/// Raw content returned for a [`FetchRequest`].
#[derive(Debug, Clone)]
pub struct FetchedPage {
  pub request: FetchRequest,
  pub body:    String,
}

/// Finite sequence of records from one page. Malformed entries surface as
/// `Err(SkippedEntry)` so callers can count them.
pub type RawScreenings = Box<dyn Iterator<Item = Result<RawScreening, SkippedEntry>> + Send>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// One family of theater website.
///
/// Implementations hold no mutable state, so independent sources can be
/// scraped concurrently.
pub trait SourceAdapter: Send + Sync {
  /// Stable identifier, e.g. `laemmle`.
  fn source_id(&self) -> &str;

  /// Human-readable name for logs and listings.
  fn display_name(&self) -> &str;

  /// Every venue this adapter may attribute records to.
  fn venue_ids(&self) -> Vec<VenueId>;

  /// Pages to fetch for a run on `ctx.today`.
  fn requests(&self, ctx: &ScrapeContext) -> Vec<FetchRequest>;

  /// Extract records from one fetched page.
  ///
  /// Errors only when the page as a whole is unusable (e.g. an unparseable
  /// JSON payload); individual bad entries are yielded as skips.
  fn list_raw_screenings(&self, page: &FetchedPage, ctx: &ScrapeContext) -> Result<RawScreenings>;
}
