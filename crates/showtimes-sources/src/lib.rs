//! Source adapters for theater websites.
//!
//! An adapter turns fetched page content into [`RawScreening`] records. It
//! never performs network I/O: it says which pages it wants
//! ([`SourceAdapter::requests`]) and parses whatever a [`Fetcher`] hands
//! back. The [`Registry`] ties each adapter to the static seed data of the
//! venues it covers.
//!
//! [`RawScreening`]: showtimes_core::raw::RawScreening

pub mod adapter;
pub mod date_paginated;
pub mod error;
pub mod event_feed;
pub mod fetch;
mod html;
pub mod registry;
pub mod static_page;
mod venues;

pub use adapter::{FetchRequest, FetchedPage, RawScreenings, ScrapeContext, SourceAdapter};
pub use error::{Error, FetchError, Result};
pub use fetch::Fetcher;
pub use registry::{BuiltinOptions, Registry, Venue};
