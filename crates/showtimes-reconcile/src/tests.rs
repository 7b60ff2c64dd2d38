//! Engine tests against an in-memory SQLite store and canned pages.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use showtimes_core::{
  movie::{FormatTag, MovieKey},
  raw::{RawScreening, SkippedEntry},
  store::ShowtimeStore,
  theater::{NewTheater, VenueId},
};
use showtimes_sources::{
  FetchError, FetchRequest, FetchedPage, Fetcher, RawScreenings, Registry, ScrapeContext,
  SourceAdapter, Venue,
  static_page::{StaticPageAdapter, StaticPageConfig, StaticPageLayout},
};
use showtimes_store_sqlite::SqliteStore;

use crate::{Engine, Outcome, ReconcileOptions, Reconciler, SkipCause};

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CannedFetcher {
  pages: HashMap<String, String>,
}

impl CannedFetcher {
  fn with(mut self, url: &str, body: &str) -> Self {
    self.pages.insert(url.to_owned(), body.to_owned());
    self
  }
}

impl Fetcher for CannedFetcher {
  async fn fetch<'a>(&'a self, request: &'a FetchRequest) -> Result<String, FetchError> {
    self
      .pages
      .get(&request.url)
      .cloned()
      .ok_or_else(|| FetchError::new(request.url.as_str(), "404 Not Found"))
  }
}

/// Yields fixed records for a single `stub://<id>` page.
struct StubAdapter {
  id:      &'static str,
  venues:  Vec<VenueId>,
  records: Vec<RawScreening>,
}

impl SourceAdapter for StubAdapter {
  fn source_id(&self) -> &str { self.id }

  fn display_name(&self) -> &str { self.id }

  fn venue_ids(&self) -> Vec<VenueId> { self.venues.clone() }

  fn requests(&self, _ctx: &ScrapeContext) -> Vec<FetchRequest> {
    vec![FetchRequest { url: format!("stub://{}", self.id), venue_id: None, date: None }]
  }

  fn list_raw_screenings(
    &self,
    _page: &FetchedPage,
    _ctx: &ScrapeContext,
  ) -> showtimes_sources::Result<RawScreenings> {
    Ok(Box::new(self.records.clone().into_iter().map(Ok::<_, SkippedEntry>)))
  }
}

fn new_year() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() }

fn ctx() -> ScrapeContext { ScrapeContext { today: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() } }

fn venue(slug: &str) -> Venue {
  Venue { id: VenueId::from(slug), theater: NewTheater::named(format!("{slug} theater")) }
}

fn raw(venue: &str, title: &str, date: &str, time: &str) -> RawScreening {
  RawScreening::new(VenueId::from(venue), title, date, time)
}

fn stub(id: &'static str, venues: &[&str], records: Vec<RawScreening>) -> StubAdapter {
  StubAdapter { id, venues: venues.iter().map(|v| VenueId::from(*v)).collect(), records }
}

async fn store() -> SqliteStore { SqliteStore::open_in_memory().await.expect("in-memory store") }

fn fetcher_for(ids: &[&str]) -> CannedFetcher {
  ids
    .iter()
    .fold(CannedFetcher::default(), |f, id| f.with(&format!("stub://{id}"), ""))
}

// ─── Reconciler ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reconcile_outcomes() {
  let store = store().await;
  let mut registry = Registry::new();
  registry.register(stub("bev", &["bev"], vec![]), [venue("bev")]).unwrap();
  let mut reconciler = Reconciler::new(&store, &registry, ctx().today, ReconcileOptions::default());

  let record = raw("bev", "The Long Goodbye (35mm)", "Jan 7", "7:30 pm");
  assert!(matches!(reconciler.reconcile(record.clone()).await.unwrap(), Outcome::Inserted(_)));
  assert_eq!(reconciler.reconcile(record).await.unwrap(), Outcome::SkippedDuplicate);

  let garbage = raw("bev", "Night Moves", "not a date", "whenever");
  assert!(matches!(
    reconciler.reconcile(garbage).await.unwrap(),
    Outcome::SkippedError(SkipCause::Parse(_))
  ));

  let blank = raw("bev", "(70mm)", "Jan 7", "7:30 pm");
  assert_eq!(
    reconciler.reconcile(blank).await.unwrap(),
    Outcome::SkippedError(SkipCause::EmptyTitle)
  );

  // Unparseable records never create movies.
  assert_eq!(store.counts().await.unwrap().movies, 1);
  assert_eq!(reconciler.movies_created(), 1);

  let upcoming = store.upcoming_screenings(new_year(), 10).await.unwrap();
  assert_eq!(upcoming.len(), 1);
  assert_eq!(upcoming[0].movie_title, "The Long Goodbye");
  assert_eq!(upcoming[0].format, Some(FormatTag::Film35mm));
  assert_eq!(
    upcoming[0].screening.starts_at,
    Utc.with_ymd_and_hms(2026, 1, 8, 3, 30, 0).unwrap()
  );
}

#[tokio::test]
async fn same_film_different_spelling_is_one_movie() {
  let store = store().await;
  let mut registry = Registry::new();
  registry.register(stub("bev", &["bev"], vec![]), [venue("bev")]).unwrap();
  let mut reconciler = Reconciler::new(&store, &registry, ctx().today, ReconcileOptions::default());

  for title in ["Vertigo (70mm)", "VERTIGO", "Vertigo in 70mm"] {
    reconciler.reconcile(raw("bev", title, "Jan 9", "8 pm")).await.unwrap();
  }
  let counts = store.counts().await.unwrap();
  assert_eq!((counts.movies, counts.screenings), (1, 1));
}

#[tokio::test]
async fn default_format_fills_unstated_formats() {
  let store = store().await;
  let mut registry = Registry::new();
  registry.register(stub("bev", &["bev"], vec![]), [venue("bev")]).unwrap();
  let options = ReconcileOptions { default_format: Some(FormatTag::Digital) };
  let mut reconciler = Reconciler::new(&store, &registry, ctx().today, options);

  reconciler.reconcile(raw("bev", "Past Lives", "Jan 9", "8 pm")).await.unwrap();
  let upcoming = store.upcoming_screenings(new_year(), 1).await.unwrap();
  assert_eq!(upcoming[0].format, Some(FormatTag::Digital));
}

// ─── Engine ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rerunning_a_batch_inserts_nothing_new() {
  let store = store().await;
  let mut registry = Registry::new();
  let records = vec![
    raw("bev", "The Long Goodbye", "Jan 7", "7:30 pm"),
    raw("bev", "Night Moves", "Jan 7", "9:25 pm"),
  ];
  registry.register(stub("bev", &["bev"], records), [venue("bev")]).unwrap();
  let fetcher = fetcher_for(&["bev"]);
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let first = engine.run_batch(&[], &ctx()).await;
  assert_eq!(first.totals.inserted, 2);
  assert_eq!(first.totals.skipped_duplicate, 0);

  let second = engine.run_batch(&[], &ctx()).await;
  assert_eq!(second.totals.inserted, 0);
  assert_eq!(second.totals.skipped_duplicate, 2);

  let counts = store.counts().await.unwrap();
  assert_eq!((counts.theaters, counts.movies, counts.screenings), (1, 2, 2));
}

#[tokio::test]
async fn parse_errors_are_counted_and_the_batch_continues() {
  let store = store().await;
  let mut registry = Registry::new();
  let records = vec![
    raw("bev", "Broken", "not a date", "whenever"),
    raw("bev", "Heat", "Jan 10", "7 pm"),
  ];
  registry.register(stub("bev", &["bev"], records), [venue("bev")]).unwrap();
  let fetcher = fetcher_for(&["bev"]);
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_batch(&[], &ctx()).await;
  let bev = summary.source("bev").unwrap();
  assert_eq!((bev.fetched, bev.inserted, bev.skipped_error), (2, 1, 1));
  assert!(!bev.is_aborted());
}

#[tokio::test]
async fn missing_venue_aborts_only_its_source() {
  let store = store().await;
  let mut registry = Registry::new();
  let stray = vec![
    raw("nowhere", "Lost Film", "Jan 7", "7 pm"),
    raw("nowhere", "Also Lost", "Jan 8", "7 pm"),
  ];
  registry.register(stub("stray", &[], stray), []).unwrap();
  registry
    .register(stub("good", &["good"], vec![raw("good", "Heat", "Jan 7", "7 pm")]), [venue("good")])
    .unwrap();
  let fetcher = fetcher_for(&["stray", "good"]);
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_batch(&[], &ctx()).await;

  let stray = summary.source("stray").unwrap();
  assert!(stray.aborted.as_deref().unwrap().contains("nowhere"));
  assert_eq!(stray.inserted, 0);
  assert_eq!(stray.fetched, 1, "processing stops at the first stray record");

  let good = summary.source("good").unwrap();
  assert!(!good.is_aborted());
  assert_eq!(good.inserted, 1);
  assert_eq!(summary.totals.aborted_sources, 1);
}

#[tokio::test]
async fn fetch_failures_are_counted() {
  let store = store().await;
  let mut registry = Registry::new();
  registry
    .register(stub("offline", &["v"], vec![raw("v", "Heat", "Jan 7", "7 pm")]), [venue("v")])
    .unwrap();
  let fetcher = CannedFetcher::default();
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_source(registry.source("offline").unwrap(), &ctx()).await;
  assert_eq!((summary.requests, summary.fetch_failures, summary.fetched), (1, 1, 0));
  assert!(!summary.is_aborted());
}

#[tokio::test]
async fn unknown_selection_is_reported() {
  let store = store().await;
  let registry = Registry::new();
  let fetcher = CannedFetcher::default();
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_batch(&["regal".to_owned()], &ctx()).await;
  assert_eq!(summary.sources.len(), 1);
  assert!(summary.source("regal").unwrap().is_aborted());

  let json = serde_json::to_value(&summary).unwrap();
  assert_eq!(json["today"], "2026-01-01");
  assert_eq!(json["totals"]["aborted_sources"], 1);
}

fn new_beverly_registry() -> Registry {
  let mut registry = Registry::new();
  let adapter = StaticPageAdapter::new(StaticPageConfig {
    source_id:    "new-beverly".into(),
    display_name: "New Beverly Cinema".into(),
    venue_id:     VenueId::from("new-beverly"),
    base_url:     "https://thenewbev.com".into(),
    schedule_url: "https://thenewbev.com/schedule/".into(),
    layout:       StaticPageLayout::new_beverly(),
  })
  .unwrap();
  registry.register(adapter, [venue("new-beverly")]).unwrap();
  registry
}

#[tokio::test]
async fn double_feature_page_end_to_end() {
  let store = store().await;
  let registry = new_beverly_registry();

  let page = r#"
    <a href="/program/altman-penn/">
      <span>Fri,</span><span>January</span><span>09</span>
      <span>7:30 pm</span><span>/ 9:25 pm</span>
      <h4>The Long Goodbye (35mm) / Night Moves (35mm)</h4>
    </a>"#;
  let fetcher = CannedFetcher::default().with("https://thenewbev.com/schedule/", page);
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_batch(&["new-beverly".to_owned()], &ctx()).await;
  assert_eq!(summary.totals.inserted, 2);

  let upcoming = store.upcoming_screenings(new_year(), 10).await.unwrap();
  let listed: Vec<_> = upcoming
    .iter()
    .map(|u| (u.movie_title.as_str(), u.screening.notes.as_deref()))
    .collect();
  assert_eq!(
    listed,
    vec![
      ("The Long Goodbye", Some("Double feature with Night Moves")),
      ("Night Moves", Some("Double feature with The Long Goodbye")),
    ]
  );
  assert!(upcoming.iter().all(|u| u.format == Some(FormatTag::Film35mm)));
  assert_eq!(
    upcoming[0].screening.ticket_url.as_deref(),
    Some("https://thenewbev.com/program/altman-penn/")
  );
}

#[tokio::test]
async fn double_feature_director_line_is_not_shared() {
  let store = store().await;
  let registry = new_beverly_registry();

  let page = r#"
    <a href="/program/lean-altman/">
      <span>Fri,</span><span>January</span><span>09</span>
      <span>7:30 pm</span><span>/ 11:30 pm</span>
      <h4>Lawrence of Arabia (70mm) / Night Moves</h4>
      <p>Directed by David Lean</p>
    </a>"#;
  let fetcher = CannedFetcher::default().with("https://thenewbev.com/schedule/", page);
  let engine = Engine::new(&store, &registry, &fetcher, ReconcileOptions::default());

  let summary = engine.run_batch(&[], &ctx()).await;
  assert_eq!(summary.totals.inserted, 2);
  assert_eq!(store.counts().await.unwrap().movies, 2);

  let night_moves = store.find_movie(&MovieKey::new("Night Moves")).await.unwrap().unwrap();
  assert_eq!(night_moves.director, None);
  assert_eq!(night_moves.format, None);

  let lawrence = store
    .find_movie(&MovieKey::new("Lawrence of Arabia"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(lawrence.format, Some(FormatTag::Film70mm));
}
