//! Batch driver: fetch, list and reconcile, one page at a time.

use showtimes_core::{raw::RawScreening, store::ShowtimeStore};
use showtimes_sources::{FetchedPage, Fetcher, Registry, ScrapeContext, SourceAdapter};

use crate::{Reconciler, ReconcileOptions, RunSummary, SourceSummary};

/// Drives sources from a registry into a store.
pub struct Engine<'a, S, F> {
  store:    &'a S,
  registry: &'a Registry,
  fetcher:  &'a F,
  options:  ReconcileOptions,
}

impl<'a, S, F> Engine<'a, S, F>
where
  S: ShowtimeStore,
  F: Fetcher,
{
  pub fn new(store: &'a S, registry: &'a Registry, fetcher: &'a F, options: ReconcileOptions) -> Self {
    Self { store, registry, fetcher, options }
  }

  /// Run one adapter to completion, or until it aborts.
  ///
  /// Fetch failures and unusable pages are counted and skipped. An
  /// unregistered venue or a store failure stops this source; the reason
  /// is recorded on the summary.
  pub async fn run_source(&self, adapter: &dyn SourceAdapter, ctx: &ScrapeContext) -> SourceSummary {
    let source_id = adapter.source_id();
    let mut summary = SourceSummary::new(source_id);
    let mut reconciler = Reconciler::new(self.store, self.registry, ctx.today, self.options);

    'pages: for request in adapter.requests(ctx) {
      summary.requests += 1;

      let body = match self.fetcher.fetch(&request).await {
        Ok(body) => body,
        Err(e) => {
          tracing::warn!(source = %source_id, url = %request.url, error = %e, "fetch failed");
          summary.fetch_failures += 1;
          continue;
        }
      };

      let page = FetchedPage { request, body };
      let records = match adapter.list_raw_screenings(&page, ctx) {
        Ok(records) => records,
        Err(e) => {
          tracing::warn!(source = %source_id, url = %page.request.url, error = %e, "unusable page");
          summary.fetch_failures += 1;
          continue;
        }
      };

      for record in records {
        summary.fetched += 1;
        let raw: RawScreening = match record {
          Ok(raw) => raw,
          Err(skipped) => {
            tracing::debug!(
              source = %source_id,
              reason = ?skipped.reason,
              excerpt = %skipped.excerpt,
              "adapter skipped entry"
            );
            summary.skipped_error += 1;
            continue;
          }
        };

        match reconciler.reconcile(raw).await {
          Ok(outcome) => summary.record(&outcome),
          Err(e) => {
            tracing::warn!(source = %source_id, error = %e, "aborting source");
            summary.aborted = Some(e.to_string());
            break 'pages;
          }
        }
      }
    }

    summary.movies_created = reconciler.movies_created();
    tracing::info!(
      source = %source_id,
      requests = summary.requests,
      fetched = summary.fetched,
      inserted = summary.inserted,
      skipped_duplicate = summary.skipped_duplicate,
      skipped_error = summary.skipped_error,
      fetch_failures = summary.fetch_failures,
      aborted = summary.is_aborted(),
      "source finished"
    );
    summary
  }

  /// Run the selected sources in registration order. An empty selection
  /// means every registered source. Unknown ids are reported as aborted.
  pub async fn run_batch(&self, selection: &[String], ctx: &ScrapeContext) -> RunSummary {
    let mut sources = Vec::new();

    if selection.is_empty() {
      for adapter in self.registry.sources() {
        sources.push(self.run_source(adapter, ctx).await);
      }
    } else {
      for source_id in selection {
        match self.registry.source(source_id) {
          Some(adapter) => sources.push(self.run_source(adapter, ctx).await),
          None => {
            tracing::warn!(source = %source_id, "unknown source");
            sources.push(SourceSummary {
              aborted: Some(format!("unknown source {source_id:?}")),
              ..SourceSummary::new(source_id.as_str())
            });
          }
        }
      }
    }

    let summary = RunSummary::new(ctx.today, sources);
    tracing::info!(
      sources = summary.sources.len(),
      inserted = summary.totals.inserted,
      skipped_duplicate = summary.totals.skipped_duplicate,
      skipped_error = summary.totals.skipped_error,
      fetch_failures = summary.totals.fetch_failures,
      "batch finished"
    );
    summary
  }
}
