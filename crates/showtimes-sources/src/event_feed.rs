//! Multi-venue JSON event feeds (e.g. the American Cinematheque API).
//!
//! A single request covers a forward window. Each hit names its location by
//! a numeric id that the adapter maps to one of its venues.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use showtimes_core::{
  raw::{RawScreening, SkipReason, SkippedEntry},
  theater::VenueId,
};
use showtimes_normalize::{THEATER_TZ, parse_date, parse_time, strip_event_prefix};

use crate::{
  FetchRequest, FetchedPage, RawScreenings, Result, ScrapeContext, SourceAdapter,
  html::{plain_lines, plain_text},
};

pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Excerpt words that make a line worth keeping as a screening note.
const NOTE_KEYWORDS: &[&str] = &["q&a", "masterclass", "discussion", "introduction", "in person"];

// ─── Configuration ───────────────────────────────────────────────────────────

/// Maps a feed location id to a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocation {
  pub location: i64,
  pub venue_id: VenueId,
}

#[derive(Debug, Clone)]
pub struct EventFeedConfig {
  pub source_id:    String,
  pub display_name: String,
  pub api_url:      String,
  pub locations:    Vec<FeedLocation>,
  /// Days covered by the single request, starting at today's midnight.
  pub window_days:  u32,
}

// ─── Payload ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FeedPayload {
  #[serde(default)]
  hits: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FeedHit {
  title:              Option<String>,
  #[serde(default)]
  event_location:     Vec<LocationRef>,
  event_start_date:   Option<String>,
  event_start_time:   Option<String>,
  event_end_time:     Option<String>,
  url:                Option<String>,
  event_card_excerpt: Option<String>,
}

/// Location ids arrive as numbers or as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocationRef {
  Id(i64),
  Text(String),
}

impl LocationRef {
  fn id(&self) -> Option<i64> {
    match self {
      Self::Id(id) => Some(*id),
      Self::Text(text) => text.trim().parse().ok(),
    }
  }

  fn label(&self) -> String {
    match self {
      Self::Id(id) => id.to_string(),
      Self::Text(text) => text.trim().to_owned(),
    }
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

pub struct EventFeedAdapter {
  config: EventFeedConfig,
}

impl EventFeedAdapter {
  pub fn new(config: EventFeedConfig) -> Self { Self { config } }

  /// Venue for a location id. Unknown ids get a venue id no registry
  /// seeds, so the engine reports them instead of guessing.
  fn venue_for(&self, location: &LocationRef) -> VenueId {
    location
      .id()
      .and_then(|id| self.config.locations.iter().find(|l| l.location == id))
      .map(|l| l.venue_id.clone())
      .unwrap_or_else(|| VenueId::new(format!("{}-location-{}", self.config.source_id, location.label())))
  }

  fn window_url(&self, today: NaiveDate) -> String {
    let midnight = today.and_time(NaiveTime::MIN);
    let start = THEATER_TZ
      .from_local_datetime(&midnight)
      .earliest()
      .map(|at| at.timestamp())
      .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).timestamp());
    let end = start + Duration::days(i64::from(self.config.window_days)).num_seconds();
    let separator = if self.config.api_url.contains('?') { '&' } else { '?' };
    format!(
      "{}{separator}environment=production&startDate={start}&endDate={end}",
      self.config.api_url
    )
  }

  fn parse_hit(&self, value: serde_json::Value, ctx: &ScrapeContext) -> Option<Result<RawScreening, SkippedEntry>> {
    let excerpt_of = |value: &serde_json::Value| value.to_string();
    let hit: FeedHit = match serde_json::from_value(value.clone()) {
      Ok(hit) => hit,
      Err(_) => return Some(Err(SkippedEntry::new(SkipReason::Malformed, excerpt_of(&value)))),
    };

    let raw_title = non_empty(hit.title).unwrap_or_default();
    let title = strip_event_prefix(&plain_text(&raw_title));
    if title.is_empty() {
      return Some(Err(SkippedEntry::new(SkipReason::MissingTitle, excerpt_of(&value))));
    }
    let Some(location) = hit.event_location.first() else {
      return Some(Err(SkippedEntry::new(SkipReason::MissingVenue, &title)));
    };
    let Some(date_text) = non_empty(hit.event_start_date) else {
      return Some(Err(SkippedEntry::new(SkipReason::MissingDate, &title)));
    };
    let Some(time_text) = non_empty(hit.event_start_time) else {
      return Some(Err(SkippedEntry::new(SkipReason::MissingTime, &title)));
    };

    if let Ok(date) = parse_date(&date_text, ctx.today)
      && date < ctx.today
    {
      tracing::debug!(source = %self.config.source_id, %title, %date, "dropping stale event");
      return None;
    }

    let excerpt = non_empty(hit.event_card_excerpt).map(|e| plain_lines(&e)).unwrap_or_default();
    let notes = excerpt
      .iter()
      .find(|line| {
        let line = line.to_lowercase();
        NOTE_KEYWORDS.iter().any(|k| line.contains(k))
      })
      .cloned();

    let mut raw = RawScreening::new(self.venue_for(location), title, date_text, time_text.clone());
    raw.format_hint = Some(format!("{} {}", plain_text(&raw_title), excerpt.join(" ")));
    raw.ticket_url = non_empty(hit.url);
    raw.notes = notes;
    raw.runtime_minutes = non_empty(hit.event_end_time).and_then(|end| runtime_between(&time_text, &end));
    Some(Ok(raw))
  }
}

/// Whole minutes from `start` to `end`, when positive.
fn runtime_between(start: &str, end: &str) -> Option<u32> {
  let minutes = (parse_time(end).ok()? - parse_time(start).ok()?).num_minutes();
  u32::try_from(minutes).ok().filter(|m| *m > 0)
}

impl SourceAdapter for EventFeedAdapter {
  fn source_id(&self) -> &str { &self.config.source_id }

  fn display_name(&self) -> &str { &self.config.display_name }

  fn venue_ids(&self) -> Vec<VenueId> {
    self.config.locations.iter().map(|l| l.venue_id.clone()).collect()
  }

  fn requests(&self, ctx: &ScrapeContext) -> Vec<FetchRequest> {
    vec![FetchRequest { url: self.window_url(ctx.today), venue_id: None, date: None }]
  }

  fn list_raw_screenings(&self, page: &FetchedPage, ctx: &ScrapeContext) -> Result<RawScreenings> {
    let payload: FeedPayload = serde_json::from_str(&page.body)?;
    let records: Vec<_> = payload
      .hits
      .into_iter()
      .filter_map(|hit| self.parse_hit(hit, ctx))
      .collect();

    tracing::debug!(
      source = %self.config.source_id,
      url = %page.request.url,
      entries = records.len(),
      "parsed event feed"
    );
    Ok(Box::new(records.into_iter()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn adapter() -> EventFeedAdapter {
    EventFeedAdapter::new(EventFeedConfig {
      source_id:    "american-cinematheque".into(),
      display_name: "American Cinematheque".into(),
      api_url:      "https://example.org/wp-json/wp/v2/algolia_get_events".into(),
      locations:    vec![
        FeedLocation { location: 54, venue_id: VenueId::from("aero") },
        FeedLocation { location: 55, venue_id: VenueId::from("egyptian") },
      ],
      window_days:  DEFAULT_WINDOW_DAYS,
    })
  }

  fn ctx() -> ScrapeContext { ScrapeContext { today: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap() } }

  fn list(body: &str) -> Vec<Result<RawScreening, SkippedEntry>> {
    let adapter = adapter();
    let page = FetchedPage { request: adapter.requests(&ctx()).remove(0), body: body.to_owned() };
    adapter.list_raw_screenings(&page, &ctx()).unwrap().collect()
  }

  #[test]
  fn request_spans_window_from_local_midnight() {
    let requests = adapter().requests(&ctx());
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].venue_id, None);
    // 2026-01-20T00:00-08:00 and fourteen days later.
    assert!(requests[0].url.ends_with("?environment=production&startDate=1768896000&endDate=1770105600"));
  }

  #[test]
  fn maps_hits_to_raw_screenings() {
    let body = r#"{"hits": [{
      "title": "Masterclass / Ren&eacute;e&#8217;s Night (70mm)",
      "event_location": [54],
      "event_start_date": "20260125",
      "event_start_time": "17:00:00",
      "event_end_time": "19:10:00",
      "url": "https://example.org/event/renee",
      "event_card_excerpt": "<p>New restoration</p><p>Q&amp;A with the director</p>"
    }]}"#;
    let records = list(body);
    assert_eq!(records.len(), 1);
    let raw = records[0].as_ref().unwrap();
    assert_eq!(raw.title_text, "Renée’s Night (70mm)");
    assert_eq!(raw.venue_id.as_str(), "aero");
    assert_eq!(raw.date_text, "20260125");
    assert_eq!(raw.time_text, "17:00:00");
    assert_eq!(raw.runtime_minutes, Some(130));
    assert_eq!(raw.notes.as_deref(), Some("Q&A with the director"));
    assert_eq!(raw.ticket_url.as_deref(), Some("https://example.org/event/renee"));
    assert!(raw.format_hint.as_deref().unwrap().contains("70mm"));
  }

  #[test]
  fn string_locations_and_unknown_locations() {
    let body = r#"{"hits": [
      {"title": "Heat", "event_location": ["55"], "event_start_date": "20260125", "event_start_time": "19:30:00"},
      {"title": "Thief", "event_location": [999], "event_start_date": "20260125", "event_start_time": "21:30:00"}
    ]}"#;
    let records: Vec<_> = list(body).into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(records[0].venue_id.as_str(), "egyptian");
    assert_eq!(records[1].venue_id.as_str(), "american-cinematheque-location-999");
    assert_eq!(records[0].runtime_minutes, None);
  }

  #[test]
  fn stale_and_malformed_hits() {
    let body = r#"{"hits": [
      {"title": "Yesterday", "event_location": [54], "event_start_date": "20260119", "event_start_time": "19:30:00"},
      {"title": "No Location", "event_location": [], "event_start_date": "20260125", "event_start_time": "19:30:00"},
      {"title": "Broken", "event_location": {"id": 54}},
      {"title": "No Time", "event_location": [54], "event_start_date": "20260125", "event_start_time": ""}
    ]}"#;
    let reasons: Vec<_> = list(body).into_iter().map(|r| r.unwrap_err().reason).collect();
    assert_eq!(
      reasons,
      vec![SkipReason::MissingVenue, SkipReason::Malformed, SkipReason::MissingTime]
    );
  }

  #[test]
  fn unparseable_payload_is_a_page_error() {
    let adapter = adapter();
    let page = FetchedPage { request: adapter.requests(&ctx()).remove(0), body: "<html>".into() };
    let err = adapter.list_raw_screenings(&page, &ctx()).err().unwrap();
    assert!(matches!(err, Error::Payload(_)));
  }
}
