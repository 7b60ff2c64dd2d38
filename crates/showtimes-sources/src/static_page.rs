//! Single-document schedules (e.g. the New Beverly calendar).
//!
//! The whole schedule lives on one always-current page. Entries and date
//! headings are walked in document order: an entry that spells out its own
//! date keeps it, otherwise it inherits the most recent heading. Date and
//! time values are often split over several text nodes ("Tue,", "January",
//! "06", "7:30 pm", "/ 9:25 pm"), so they are reassembled from fragments.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use showtimes_core::{
  raw::{RawScreening, SkipReason, SkippedEntry},
  theater::VenueId,
};
use showtimes_normalize::{clean_title, parse_date, parse_runtime, split_double_feature};

use crate::{
  FetchRequest, FetchedPage, RawScreenings, Result, ScrapeContext, SourceAdapter,
  html::{absolute_url, compile, fragments, link_of, text_of},
};

static TIME_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*[ap]\.?\s*m\b").expect("invalid time fragment pattern")
});

static DATE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)^(?:(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?|\d{1,2}(?:st|nd|rd|th)?,?|\d{1,2}/\d{1,2}(?:/\d{2,4})?)$",
  )
  .expect("invalid date fragment pattern")
});

// ─── Layout ──────────────────────────────────────────────────────────────────

/// CSS selectors describing a static schedule page.
#[derive(Debug, Clone)]
pub struct StaticPageLayout {
  /// One screening entry (possibly a double feature).
  pub entry:   String,
  /// A date heading whose date applies to the entries that follow it.
  pub heading: Option<String>,
  /// The title element inside an entry.
  pub title:   String,
}

impl StaticPageLayout {
  /// Program cards linking to `/program/…`, titles in `<h4>`.
  pub fn new_beverly() -> Self {
    Self {
      entry:   "a[href*='/program/']".to_owned(),
      heading: Some("h2.schedule-date, h3.schedule-date".to_owned()),
      title:   "h4".to_owned(),
    }
  }
}

/// Static-page adapter settings.
#[derive(Debug, Clone)]
pub struct StaticPageConfig {
  pub source_id:    String,
  pub display_name: String,
  pub venue_id:     VenueId,
  /// Base for relative links.
  pub base_url:     String,
  pub schedule_url: String,
  pub layout:       StaticPageLayout,
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

pub struct StaticPageAdapter {
  config:  StaticPageConfig,
  items:   Selector,
  heading: Option<Selector>,
  title:   Selector,
  links:   Selector,
}

impl StaticPageAdapter {
  pub fn new(config: StaticPageConfig) -> Result<Self> {
    let items = match &config.layout.heading {
      Some(heading) => compile(&format!("{heading}, {}", config.layout.entry))?,
      None => compile(&config.layout.entry)?,
    };
    let heading = config.layout.heading.as_deref().map(compile).transpose()?;
    let title = compile(&config.layout.title)?;
    let links = compile("a[href]")?;
    Ok(Self { config, items, heading, title, links })
  }

  fn is_heading(&self, element: &ElementRef<'_>) -> bool {
    self.heading.as_ref().is_some_and(|h| h.matches(element))
  }

  fn parse_entry(
    &self,
    entry: ElementRef<'_>,
    heading_date: Option<&str>,
    ctx: &ScrapeContext,
  ) -> Vec<Result<RawScreening, SkippedEntry>> {
    let entry_text = text_of(entry);

    let Some(title_el) = entry.select(&self.title).next() else {
      return vec![Err(SkippedEntry::new(SkipReason::MissingTitle, &entry_text))];
    };
    let title_text = text_of(title_el);
    let title_fragments = fragments(title_el);

    let mut date_parts: Vec<String> = Vec::new();
    let mut times: Vec<String> = Vec::new();
    for fragment in fragments(entry) {
      if title_fragments.contains(&fragment) {
        continue;
      }
      if TIME_FRAGMENT.is_match(&fragment) {
        times.extend(
          fragment
            .split('/')
            .map(str::trim)
            .filter(|t| TIME_FRAGMENT.is_match(t))
            .map(str::to_owned),
        );
      } else if DATE_FRAGMENT.is_match(&fragment) {
        date_parts.push(fragment);
      }
    }

    let own_date = date_parts.join(" ");
    let date_text = if parse_date(&own_date, ctx.today).is_ok() {
      own_date
    } else if let Some(inherited) = heading_date {
      inherited.to_owned()
    } else {
      return vec![Err(SkippedEntry::new(SkipReason::MissingDate, &entry_text))];
    };

    if let Ok(date) = parse_date(&date_text, ctx.today)
      && date < ctx.today
    {
      tracing::debug!(
        source = %self.config.source_id,
        title = %title_text,
        %date,
        "dropping stale entry"
      );
      return Vec::new();
    }

    let films = split_double_feature(&title_text);
    if films.is_empty() {
      return vec![Err(SkippedEntry::new(SkipReason::MissingTitle, &entry_text))];
    }
    if times.is_empty() {
      return vec![Err(SkippedEntry::new(SkipReason::MissingTime, &entry_text))];
    }

    let ticket_url = link_of(entry, &self.links).map(|href| absolute_url(&self.config.base_url, &href));
    // Details outside the title (director, runtime, format) can't be
    // attributed to one film of a double bill.
    let single = films.len() == 1;
    let runtime_minutes = if single { parse_runtime(&entry_text) } else { None };

    // One time per film when the counts line up, otherwise every film at
    // every listed time.
    let slots: Vec<(usize, &String)> = if films.len() > 1 && times.len() == films.len() {
      times.iter().enumerate().collect()
    } else {
      (0..films.len())
        .flat_map(|i| times.iter().map(move |t| (i, t)))
        .collect()
    };

    slots
      .into_iter()
      .map(|(i, time)| {
        let mut raw = RawScreening::new(
          self.config.venue_id.clone(),
          films[i].clone(),
          date_text.clone(),
          time.clone(),
        );
        raw.format_hint = single.then(|| entry_text.clone());
        raw.ticket_url = ticket_url.clone();
        raw.runtime_minutes = runtime_minutes;
        raw.notes = double_feature_note(&films, i);
        Ok(raw)
      })
      .collect()
  }
}

/// "Double feature with B" for film `index` of a multi-film entry.
fn double_feature_note(films: &[String], index: usize) -> Option<String> {
  if films.len() < 2 {
    return None;
  }
  let others: Vec<String> = films
    .iter()
    .enumerate()
    .filter(|(i, _)| *i != index)
    .map(|(_, f)| clean_title(f))
    .collect();
  Some(format!("Double feature with {}", others.join(" / ")))
}

impl SourceAdapter for StaticPageAdapter {
  fn source_id(&self) -> &str { &self.config.source_id }

  fn display_name(&self) -> &str { &self.config.display_name }

  fn venue_ids(&self) -> Vec<VenueId> { vec![self.config.venue_id.clone()] }

  fn requests(&self, _ctx: &ScrapeContext) -> Vec<FetchRequest> {
    vec![FetchRequest::for_venue(
      self.config.schedule_url.clone(),
      self.config.venue_id.clone(),
    )]
  }

  fn list_raw_screenings(&self, page: &FetchedPage, ctx: &ScrapeContext) -> Result<RawScreenings> {
    let document = Html::parse_document(&page.body);
    let mut heading_date: Option<String> = None;
    let mut records = Vec::new();

    for element in document.select(&self.items) {
      if self.is_heading(&element) {
        heading_date = Some(text_of(element));
        continue;
      }
      records.extend(self.parse_entry(element, heading_date.as_deref(), ctx));
    }

    tracing::debug!(
      source = %self.config.source_id,
      url = %page.request.url,
      entries = records.len(),
      "parsed static schedule page"
    );
    Ok(Box::new(records.into_iter()))
  }
}
