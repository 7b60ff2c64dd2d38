//! Core types and trait definitions for the showtimes aggregator.
//!
//! This crate has no HTTP, HTML or database dependencies. Every other crate
//! in the workspace depends on it.

pub mod error;
pub mod movie;
pub mod raw;
pub mod screening;
pub mod store;
pub mod theater;

pub use error::{Error, Result};
