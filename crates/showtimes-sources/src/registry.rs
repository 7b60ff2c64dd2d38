//! Source registry: adapters by source id, plus venue seed data.

use std::collections::{BTreeMap, HashSet};

use showtimes_core::theater::{NewTheater, VenueId};

use crate::{
  Error, Result, SourceAdapter,
  date_paginated::{DatePaginatedAdapter, DatePaginatedConfig, DatePaginatedLayout, PaginatedVenue},
  event_feed::{EventFeedAdapter, EventFeedConfig, FeedLocation},
  static_page::{StaticPageAdapter, StaticPageConfig, StaticPageLayout},
  venues,
};

/// Static seed data for one physical venue.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
  pub id:      VenueId,
  pub theater: NewTheater,
}

/// Knobs for [`Registry::builtin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinOptions {
  /// Days requested from date-paginated sources.
  pub window_days:      u32,
  /// Days covered by event-feed requests.
  pub feed_window_days: u32,
}

impl Default for BuiltinOptions {
  fn default() -> Self {
    Self {
      window_days:      crate::date_paginated::DEFAULT_WINDOW_DAYS,
      feed_window_days: crate::event_feed::DEFAULT_WINDOW_DAYS,
    }
  }
}

/// Adapters in registration order, and every venue they may report.
#[derive(Default)]
pub struct Registry {
  sources: Vec<Box<dyn SourceAdapter>>,
  venues:  BTreeMap<VenueId, Venue>,
}

impl Registry {
  pub fn new() -> Self { Self::default() }

  /// Add an adapter with the seed data for its venues.
  ///
  /// Every venue the adapter declares must be seeded, either here or by an
  /// earlier registration. Nothing is registered on error.
  pub fn register<A>(&mut self, adapter: A, venues: impl IntoIterator<Item = Venue>) -> Result<()>
  where
    A: SourceAdapter + 'static,
  {
    let source_id = adapter.source_id().to_owned();
    if self.source(&source_id).is_some() {
      return Err(Error::DuplicateSource(source_id));
    }

    let venues: Vec<Venue> = venues.into_iter().collect();
    let mut seen = HashSet::new();
    for venue in &venues {
      if self.venues.contains_key(&venue.id) || !seen.insert(&venue.id) {
        return Err(Error::DuplicateVenue(venue.id.clone()));
      }
    }
    for venue in adapter.venue_ids() {
      if !seen.contains(&venue) && !self.venues.contains_key(&venue) {
        return Err(Error::UnseededVenue { source_id, venue });
      }
    }

    tracing::debug!(source = %source_id, venues = venues.len(), "registered source");
    self
      .venues
      .extend(venues.into_iter().map(|venue| (venue.id.clone(), venue)));
    self.sources.push(Box::new(adapter));
    Ok(())
  }

  pub fn source(&self, source_id: &str) -> Option<&dyn SourceAdapter> {
    self
      .sources
      .iter()
      .find(|s| s.source_id() == source_id)
      .map(|s| &**s as &dyn SourceAdapter)
  }

  pub fn sources(&self) -> impl Iterator<Item = &dyn SourceAdapter> {
    self.sources.iter().map(|s| &**s as &dyn SourceAdapter)
  }

  pub fn venue(&self, id: &VenueId) -> Option<&Venue> { self.venues.get(id) }

  pub fn venues(&self) -> impl Iterator<Item = &Venue> { self.venues.values() }

  /// Seed data for the venues `source_id` declares.
  pub fn venues_for(&self, source_id: &str) -> Vec<&Venue> {
    self
      .source(source_id)
      .map(|s| s.venue_ids().iter().filter_map(|id| self.venues.get(id)).collect())
      .unwrap_or_default()
  }

  /// The curated source list: New Beverly, the Laemmle chain and the
  /// American Cinematheque venues.
  pub fn builtin(options: &BuiltinOptions) -> Result<Self> {
    let mut registry = Self::new();

    let new_beverly = StaticPageAdapter::new(StaticPageConfig {
      source_id:    "new-beverly".to_owned(),
      display_name: "New Beverly Cinema".to_owned(),
      venue_id:     venues::NEW_BEVERLY.id(),
      base_url:     venues::NEW_BEVERLY_BASE.to_owned(),
      schedule_url: venues::NEW_BEVERLY_SCHEDULE.to_owned(),
      layout:       StaticPageLayout::new_beverly(),
    })?;
    registry.register(new_beverly, [venues::NEW_BEVERLY.venue()])?;

    let laemmle = DatePaginatedAdapter::new(DatePaginatedConfig {
      source_id:    "laemmle".to_owned(),
      display_name: "Laemmle Theatres".to_owned(),
      base_url:     venues::LAEMMLE_BASE.to_owned(),
      venues:       venues::LAEMMLE
        .iter()
        .map(|seed| PaginatedVenue { venue_id: seed.id(), url: seed.website.to_owned() })
        .collect(),
      window_days:  options.window_days,
      layout:       DatePaginatedLayout::laemmle(),
    })?;
    registry.register(laemmle, venues::LAEMMLE.iter().map(|seed| seed.venue()))?;

    let cinematheque = EventFeedAdapter::new(EventFeedConfig {
      source_id:    "american-cinematheque".to_owned(),
      display_name: "American Cinematheque".to_owned(),
      api_url:      venues::CINEMATHEQUE_API.to_owned(),
      locations:    venues::CINEMATHEQUE
        .iter()
        .map(|(location, seed)| FeedLocation { location: *location, venue_id: seed.id() })
        .collect(),
      window_days:  options.feed_window_days,
    });
    registry.register(cinematheque, venues::CINEMATHEQUE.iter().map(|(_, seed)| seed.venue()))?;

    Ok(registry)
  }
}
