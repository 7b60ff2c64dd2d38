//! Plain-text rendering for command output.

use std::fmt::Write as _;

use showtimes_core::{screening::UpcomingScreening, store::StoreCounts};
use showtimes_normalize::THEATER_TZ;
use showtimes_reconcile::RunSummary;
use showtimes_sources::Registry;

const RUN_HEADER: [&str; 7] = ["source", "requests", "fetched", "inserted", "dup", "error", "fetch fail"];

/// One row per source, then totals and any abort reasons.
pub fn run_table(summary: &RunSummary) -> String {
  let width = summary
    .sources
    .iter()
    .map(|s| s.source_id.len())
    .chain([RUN_HEADER[0].len(), "total".len()])
    .max()
    .unwrap_or_default();

  let mut out = format!("Run for {}\n\n", summary.today);
  let _ = write!(out, "{:<width$}", RUN_HEADER[0]);
  for col in &RUN_HEADER[1..] {
    let _ = write!(out, "  {col:>10}");
  }
  out.push('\n');

  let mut row = |label: &str, cells: [u64; 6]| {
    let _ = write!(out, "{label:<width$}");
    for cell in cells {
      let _ = write!(out, "  {cell:>10}");
    }
    out.push('\n');
  };
  for s in &summary.sources {
    row(&s.source_id, [
      s.requests,
      s.fetched,
      s.inserted,
      s.skipped_duplicate,
      s.skipped_error,
      s.fetch_failures,
    ]);
  }
  let t = &summary.totals;
  let requests: u64 = summary.sources.iter().map(|s| s.requests).sum();
  row("total", [requests, t.fetched, t.inserted, t.skipped_duplicate, t.skipped_error, t.fetch_failures]);

  for s in summary.sources.iter().filter(|s| s.is_aborted()) {
    let reason = s.aborted.as_deref().unwrap_or_default();
    let _ = writeln!(out, "\naborted {}: {reason}", s.source_id);
  }
  out
}

/// Row counts followed by the next screenings in theater-local time.
pub fn store_summary(counts: &StoreCounts, upcoming: &[UpcomingScreening]) -> String {
  let mut out = format!(
    "theaters: {}\nmovies: {}\nscreenings: {}\n",
    counts.theaters, counts.movies, counts.screenings
  );
  if upcoming.is_empty() {
    out.push_str("\nNo upcoming screenings.\n");
    return out;
  }

  out.push_str("\nUpcoming:\n");
  for u in upcoming {
    let local = u.screening.starts_at.with_timezone(&THEATER_TZ);
    let _ = write!(out, "  {}  {} @ {}", local.format("%a %b %-d %-I:%M %p"), u.movie_title, u.theater_name);
    if let Some(format) = u.format {
      let _ = write!(out, " [{format}]");
    }
    if let Some(notes) = &u.screening.notes {
      let _ = write!(out, " ({notes})");
    }
    if let Some(url) = &u.screening.ticket_url {
      let _ = write!(out, "\n      {url}");
    }
    out.push('\n');
  }
  out
}

/// Registered sources and the venues each covers.
pub fn source_list(registry: &Registry) -> String {
  let mut out = String::new();
  for adapter in registry.sources() {
    let _ = writeln!(out, "{}  {}", adapter.source_id(), adapter.display_name());
    for venue in registry.venues_for(adapter.source_id()) {
      let _ = write!(out, "  - {}: {}", venue.id, venue.theater.name);
      if let Some(city) = &venue.theater.city {
        let _ = write!(out, ", {city}");
      }
      out.push('\n');
    }
  }
  out
}
