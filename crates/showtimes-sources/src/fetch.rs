//! The network boundary. Adapters never fetch; a [`Fetcher`] does.

use std::future::Future;

use crate::{FetchError, FetchRequest};

/// Retrieves the raw body for a [`FetchRequest`].
///
/// The binary provides an HTTP implementation; tests provide canned pages.
pub trait Fetcher: Send + Sync {
  fn fetch<'a>(
    &'a self,
    request: &'a FetchRequest,
  ) -> impl Future<Output = Result<String, FetchError>> + Send + 'a;
}
