//! Reconciliation engine: raw records in, deduplicated rows out.
//!
//! [`Reconciler`] maps one [`RawScreening`] at a time onto canonical
//! theater, movie and screening rows through a [`ShowtimeStore`].
//! [`Engine`] drives whole sources: fetch a page, list its records,
//! reconcile them, move on.
//!
//! [`RawScreening`]: showtimes_core::raw::RawScreening
//! [`ShowtimeStore`]: showtimes_core::store::ShowtimeStore

mod driver;
pub mod error;
mod reconciler;
mod summary;

pub use driver::Engine;
pub use error::{Error, MissingVenueError, Result, SkipCause};
pub use reconciler::{Outcome, ReconcileOptions, Reconciler};
pub use summary::{RunSummary, SourceSummary, Totals};

#[cfg(test)]
mod tests;
