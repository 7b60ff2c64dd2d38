//! Run summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Outcome;

/// Counters for one source's run.
///
/// Unless the run was aborted, every fetched record lands in exactly one of
/// `inserted`, `skipped_duplicate` or `skipped_error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
  pub source_id:         String,
  /// Pages requested.
  pub requests:          u64,
  /// Records yielded by the adapter, malformed entries included.
  pub fetched:           u64,
  pub inserted:          u64,
  pub skipped_duplicate: u64,
  pub skipped_error:     u64,
  pub fetch_failures:    u64,
  pub movies_created:    u64,
  /// Why the run stopped early, if it did.
  pub aborted:           Option<String>,
}

impl SourceSummary {
  pub fn new(source_id: impl Into<String>) -> Self {
    Self { source_id: source_id.into(), ..Self::default() }
  }

  pub fn record(&mut self, outcome: &Outcome) {
    match outcome {
      Outcome::Inserted(_) => self.inserted += 1,
      Outcome::SkippedDuplicate => self.skipped_duplicate += 1,
      Outcome::SkippedError(_) => self.skipped_error += 1,
    }
  }

  pub fn is_aborted(&self) -> bool { self.aborted.is_some() }
}

/// Aggregate over every source in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
  pub fetched:           u64,
  pub inserted:          u64,
  pub skipped_duplicate: u64,
  pub skipped_error:     u64,
  pub fetch_failures:    u64,
  pub aborted_sources:   u64,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
  /// The reference date the run was performed for.
  pub today:   NaiveDate,
  pub sources: Vec<SourceSummary>,
  pub totals:  Totals,
}

impl RunSummary {
  pub fn new(today: NaiveDate, sources: Vec<SourceSummary>) -> Self {
    let totals = sources.iter().fold(Totals::default(), |mut t, s| {
      t.fetched += s.fetched;
      t.inserted += s.inserted;
      t.skipped_duplicate += s.skipped_duplicate;
      t.skipped_error += s.skipped_error;
      t.fetch_failures += s.fetch_failures;
      t.aborted_sources += u64::from(s.is_aborted());
      t
    });
    Self { today, sources, totals }
  }

  pub fn source(&self, source_id: &str) -> Option<&SourceSummary> {
    self.sources.iter().find(|s| s.source_id == source_id)
  }
}
