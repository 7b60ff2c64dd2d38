//! Text normalisation for scraped showtimes.
//!
//! Pure synchronous functions; no I/O and no clock. Anything that depends on
//! "today" takes the reference date as an argument.
//!
//! # Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use showtimes_core::movie::FormatTag;
//! use showtimes_normalize::{clean_title, extract_format, parse_datetime};
//!
//! let raw = "Lawrence of Arabia (70mm)";
//! assert_eq!(clean_title(raw), "Lawrence of Arabia");
//! assert_eq!(extract_format(raw), Some(FormatTag::Film70mm));
//!
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let at = parse_datetime("Jan 7", "7:30 PM", today).unwrap();
//! assert_eq!(at.to_rfc3339(), "2026-01-07T19:30:00-08:00");
//! ```

mod datetime;
mod details;
pub mod error;
mod format;
mod title;

pub use datetime::{
  ROLLOVER_MONTHS, THEATER_TZ, parse_date, parse_datetime, parse_time, theater_today,
};
pub use details::{extract_director, parse_runtime};
pub use error::{ParseError, Result};
pub use format::extract_format;
pub use title::{
  clean_title, collapse_whitespace, split_double_feature, split_release_year,
  strip_event_prefix,
};
