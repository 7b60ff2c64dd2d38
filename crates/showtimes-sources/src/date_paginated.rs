//! Chains serving one schedule page per venue per day (e.g. Laemmle).
//!
//! Requests cover a fixed window of consecutive days starting today:
//! `<venue url>?date=YYYY-MM-DD`. Each film block on a page carries a title
//! link, a detail line ("113 min. R") and a list of showtimes, some of which
//! may already be marked past.

use chrono::{Duration, NaiveDate};
use scraper::{ElementRef, Html, Selector};
use showtimes_core::{
  raw::{RawScreening, SkipReason, SkippedEntry},
  theater::VenueId,
};
use showtimes_normalize::{extract_director, parse_date, parse_runtime};

use crate::{
  Error, FetchRequest, FetchedPage, RawScreenings, Result, ScrapeContext, SourceAdapter,
  html::{absolute_url, compile, link_of, text_of},
};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

// ─── Configuration ───────────────────────────────────────────────────────────

/// One venue of the chain and its schedule page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedVenue {
  pub venue_id: VenueId,
  pub url:      String,
}

/// CSS selectors describing a per-day schedule page.
#[derive(Debug, Clone)]
pub struct DatePaginatedLayout {
  /// One film with its showtimes.
  pub block:        String,
  /// Title link, relative to a block.
  pub title:        String,
  /// Runtime / rating line, relative to a block.
  pub detail:       String,
  /// One showtime, relative to a block.
  pub showtime:     String,
  /// Class fragments marking a showtime as already started.
  pub past_markers: Vec<String>,
}

impl DatePaginatedLayout {
  pub fn laemmle() -> Self {
    Self {
      block:        "div.info".to_owned(),
      title:        "div.film-info-wrapper div.title a".to_owned(),
      detail:       "div.film-info-wrapper div.detail".to_owned(),
      showtime:     "div.showtimes div.showtime".to_owned(),
      past_markers: vec!["showtime-past".to_owned(), "engagement-3d-past".to_owned()],
    }
  }
}

#[derive(Debug, Clone)]
pub struct DatePaginatedConfig {
  pub source_id:    String,
  pub display_name: String,
  /// Base for relative film links.
  pub base_url:     String,
  pub venues:       Vec<PaginatedVenue>,
  /// Number of consecutive days requested, today included.
  pub window_days:  u32,
  pub layout:       DatePaginatedLayout,
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

pub struct DatePaginatedAdapter {
  config:   DatePaginatedConfig,
  block:    Selector,
  title:    Selector,
  detail:   Selector,
  showtime: Selector,
  links:    Selector,
}

impl DatePaginatedAdapter {
  pub fn new(config: DatePaginatedConfig) -> Result<Self> {
    Ok(Self {
      block: compile(&config.layout.block)?,
      title: compile(&config.layout.title)?,
      detail: compile(&config.layout.detail)?,
      showtime: compile(&config.layout.showtime)?,
      links: compile("a[href]")?,
      config,
    })
  }

  fn page_url(url: &str, day: NaiveDate) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}date={}", day.format("%Y-%m-%d"))
  }

  fn is_past(&self, showtime: &ElementRef<'_>) -> bool {
    showtime.value().classes().any(|class| {
      self
        .config
        .layout
        .past_markers
        .iter()
        .any(|marker| class.contains(marker.as_str()))
    })
  }

  /// The block's or showtime's own `data-date`, when it parses.
  fn own_date(element: &ElementRef<'_>, ctx: &ScrapeContext) -> Option<NaiveDate> {
    let raw = element.value().attr("data-date")?;
    parse_date(raw, ctx.today).ok()
  }

  fn parse_block(
    &self,
    block: ElementRef<'_>,
    venue_id: &VenueId,
    page_date: NaiveDate,
    ctx: &ScrapeContext,
    out: &mut Vec<Result<RawScreening, SkippedEntry>>,
  ) {
    let block_text = text_of(block);

    let Some(title_el) = block.select(&self.title).next() else {
      out.push(Err(SkippedEntry::new(SkipReason::MissingTitle, &block_text)));
      return;
    };
    let title_text = text_of(title_el);
    if title_text.is_empty() {
      out.push(Err(SkippedEntry::new(SkipReason::MissingTitle, &block_text)));
      return;
    }

    let film_url = title_el
      .value()
      .attr("href")
      .map(|href| absolute_url(&self.config.base_url, href));
    let detail = block.select(&self.detail).next().map(text_of).unwrap_or_default();
    let runtime_minutes = parse_runtime(&detail);
    let director = extract_director(&detail).or_else(|| extract_director(&block_text));

    let showtimes: Vec<ElementRef<'_>> = block.select(&self.showtime).collect();
    if showtimes.is_empty() {
      out.push(Err(SkippedEntry::new(SkipReason::MissingTime, &block_text)));
      return;
    }

    let block_date = Self::own_date(&block, ctx);
    for showtime in showtimes {
      if self.is_past(&showtime) {
        continue;
      }
      let time_text = text_of(showtime);
      if time_text.is_empty() {
        out.push(Err(SkippedEntry::new(SkipReason::MissingTime, &block_text)));
        continue;
      }

      let date = Self::own_date(&showtime, ctx).or(block_date).unwrap_or(page_date);
      if date < ctx.today {
        tracing::debug!(
          source = %self.config.source_id,
          title = %title_text,
          %date,
          "dropping stale showtime"
        );
        continue;
      }

      let ticket_url = link_of(showtime, &self.links)
        .map(|href| absolute_url(&self.config.base_url, &href))
        .or_else(|| film_url.clone());

      let mut raw = RawScreening::new(
        venue_id.clone(),
        title_text.clone(),
        date.format("%Y-%m-%d").to_string(),
        time_text,
      );
      raw.format_hint = Some(block_text.clone());
      raw.ticket_url = ticket_url;
      raw.director = director.clone();
      raw.runtime_minutes = runtime_minutes;
      out.push(Ok(raw));
    }
  }
}

impl SourceAdapter for DatePaginatedAdapter {
  fn source_id(&self) -> &str { &self.config.source_id }

  fn display_name(&self) -> &str { &self.config.display_name }

  fn venue_ids(&self) -> Vec<VenueId> {
    self.config.venues.iter().map(|v| v.venue_id.clone()).collect()
  }

  fn requests(&self, ctx: &ScrapeContext) -> Vec<FetchRequest> {
    let mut requests = Vec::with_capacity(self.config.venues.len() * self.config.window_days as usize);
    for venue in &self.config.venues {
      for offset in 0..self.config.window_days {
        let day = ctx.today + Duration::days(i64::from(offset));
        requests.push(FetchRequest {
          url:      Self::page_url(&venue.url, day),
          venue_id: Some(venue.venue_id.clone()),
          date:     Some(day),
        });
      }
    }
    requests
  }

  fn list_raw_screenings(&self, page: &FetchedPage, ctx: &ScrapeContext) -> Result<RawScreenings> {
    let venue_id = page
      .request
      .venue_id
      .clone()
      .ok_or_else(|| Error::MissingRequestVenue { url: page.request.url.clone() })?;
    let page_date = page.request.date.unwrap_or(ctx.today);

    let document = Html::parse_document(&page.body);
    let mut records = Vec::new();
    for block in document.select(&self.block) {
      self.parse_block(block, &venue_id, page_date, ctx, &mut records);
    }

    tracing::debug!(
      source = %self.config.source_id,
      url = %page.request.url,
      entries = records.len(),
      "parsed schedule page"
    );
    Ok(Box::new(records.into_iter()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn adapter() -> DatePaginatedAdapter {
    DatePaginatedAdapter::new(DatePaginatedConfig {
      source_id:    "laemmle".into(),
      display_name: "Laemmle Theatres".into(),
      base_url:     "https://www.laemmle.com".into(),
      venues:       vec![
        PaginatedVenue {
          venue_id: VenueId::from("laemmle-royal"),
          url:      "https://www.laemmle.com/theater/royal".into(),
        },
        PaginatedVenue {
          venue_id: VenueId::from("laemmle-glendale"),
          url:      "https://www.laemmle.com/theater/glendale".into(),
        },
      ],
      window_days:  DEFAULT_WINDOW_DAYS,
      layout:       DatePaginatedLayout::laemmle(),
    })
    .unwrap()
  }

  fn ctx() -> ScrapeContext { ScrapeContext { today: day(2026, 1, 7) } }

  fn page(date: NaiveDate, body: &str) -> FetchedPage {
    FetchedPage {
      request: FetchRequest {
        url:      DatePaginatedAdapter::page_url("https://www.laemmle.com/theater/royal", date),
        venue_id: Some(VenueId::from("laemmle-royal")),
        date:     Some(date),
      },
      body:    body.to_owned(),
    }
  }

  const PAGE: &str = r#"
    <div class="info">
      <div class="film-info-wrapper">
        <div class="title"><a href="/film/the-long-goodbye">The Long Goodbye (35mm)</a></div>
        <div class="detail">112 min. R</div>
      </div>
      <div class="showtimes">
        <div class="showtime showtime-past">1:10pm</div>
        <div class="showtime">4:20pm</div>
        <div class="showtime"><a href="/tickets/123">7:30pm</a></div>
      </div>
    </div>
    <div class="info">
      <div class="film-info-wrapper"><div class="detail">95 min.</div></div>
      <div class="showtimes"><div class="showtime">5:00pm</div></div>
    </div>"#;

  #[test]
  fn requests_cover_window_for_every_venue() {
    let requests = adapter().requests(&ctx());
    assert_eq!(requests.len(), 7 * 2);
    assert_eq!(
      requests[0].url,
      "https://www.laemmle.com/theater/royal?date=2026-01-07"
    );
    assert_eq!(
      requests[6].url,
      "https://www.laemmle.com/theater/royal?date=2026-01-13"
    );
    assert_eq!(requests[7].venue_id, Some(VenueId::from("laemmle-glendale")));
    assert_eq!(requests[13].date, Some(day(2026, 1, 13)));
  }

  #[test]
  fn emits_one_record_per_upcoming_showtime() {
    let records: Vec<_> = adapter()
      .list_raw_screenings(&page(day(2026, 1, 8), PAGE), &ctx())
      .unwrap()
      .collect();

    let ok: Vec<_> = records.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(ok.len(), 2, "past showtime must be skipped");
    assert_eq!(ok[0].time_text, "4:20pm");
    assert_eq!(ok[1].time_text, "7:30pm");
    for raw in &ok {
      assert_eq!(raw.title_text, "The Long Goodbye (35mm)");
      assert_eq!(raw.date_text, "2026-01-08");
      assert_eq!(raw.venue_id.as_str(), "laemmle-royal");
      assert_eq!(raw.runtime_minutes, Some(112));
    }
    assert_eq!(
      ok[0].ticket_url.as_deref(),
      Some("https://www.laemmle.com/film/the-long-goodbye")
    );
    assert_eq!(
      ok[1].ticket_url.as_deref(),
      Some("https://www.laemmle.com/tickets/123")
    );

    let skipped: Vec<_> = records.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].reason, SkipReason::MissingTitle);
  }

  #[test]
  fn data_date_overrides_request_date_and_stale_entries_drop() {
    let body = r#"
      <div class="info" data-date="2026-01-06">
        <div class="film-info-wrapper"><div class="title"><a href="/f/old">Old Film</a></div></div>
        <div class="showtimes"><div class="showtime">7:00pm</div></div>
      </div>
      <div class="info">
        <div class="film-info-wrapper"><div class="title"><a href="/f/new">New Film</a></div></div>
        <div class="showtimes"><div class="showtime" data-date="2026-01-09">8:00pm</div></div>
      </div>"#;
    let records: Vec<_> = adapter()
      .list_raw_screenings(&page(day(2026, 1, 7), body), &ctx())
      .unwrap()
      .map(|r| r.unwrap())
      .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title_text, "New Film");
    assert_eq!(records[0].date_text, "2026-01-09");
  }

  #[test]
  fn page_without_venue_is_rejected() {
    let mut page = page(day(2026, 1, 7), PAGE);
    page.request.venue_id = None;
    let err = adapter().list_raw_screenings(&page, &ctx()).err().unwrap();
    assert!(matches!(err, Error::MissingRequestVenue { .. }));
  }
}
