//! Date and time parsing across the shapes theater sites actually use.
//!
//! Dates: `2026-01-07`, `20260107`, `1/7`, `1/7/2026`, `Jan 7`,
//! `Mon, January 05`, `Sunday, February 1st`, `January 7, 2026`.
//! Times: `7:30 PM`, `7:30pm`, `7 pm`, `11:59 p.m.`, `17:00`, `17:00:00`,
//! `noon`, `midnight`.
//!
//! Every result is an instant in [`THEATER_TZ`]. Input never carries a zone.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::{ParseError, Result};

/// The single zone every listed theater sits in.
pub const THEATER_TZ: Tz = chrono_tz::America::Los_Angeles;

/// How far in the past a year-less date may fall before it is read as next
/// year's.
pub const ROLLOVER_MONTHS: u32 = 6;

// ─── Patterns ────────────────────────────────────────────────────────────────

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:$|[T\s])").expect("invalid ISO date pattern")
});

static COMPACT_DATE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("invalid compact date pattern"));

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?:[A-Za-z]+,?\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?$")
    .expect("invalid numeric date pattern")
});

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+(\d{4})\b)?",
  )
  .expect("invalid month date pattern")
});

static TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?\s*m\b\.?").expect("invalid 12h pattern")
});

static TWENTY_FOUR_HOUR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").expect("invalid 24h pattern")
});

// ─── Public API ──────────────────────────────────────────────────────────────

/// "Today" in the theaters' zone for a given instant.
pub fn theater_today(now: DateTime<Utc>) -> NaiveDate {
  now.with_timezone(&THEATER_TZ).date_naive()
}

/// Parse a date and a time of day into an instant in [`THEATER_TZ`].
///
/// `reference` is today's date. It supplies the year when the date text has
/// none. A date that would land more than [`ROLLOVER_MONTHS`] before
/// `reference` rolls into next year, so a January listing seen in December
/// resolves to next January. A date only days past keeps its year and is
/// left for the caller to drop as stale.
pub fn parse_datetime(
  raw_date: &str,
  raw_time: &str,
  reference: NaiveDate,
) -> Result<DateTime<Tz>> {
  let date = parse_date(raw_date, reference)?;
  let time = parse_time(raw_time)?;
  let local = date.and_time(time);

  match THEATER_TZ.from_local_datetime(&local) {
    LocalResult::Single(at) => Ok(at),
    // Clocks fall back: take the first occurrence.
    LocalResult::Ambiguous(earliest, _) => Ok(earliest),
    LocalResult::None => Err(ParseError::NonexistentLocalTime(local)),
  }
}

/// Parse a calendar date. See [`parse_datetime`] for year inference.
pub fn parse_date(raw: &str, reference: NaiveDate) -> Result<NaiveDate> {
  let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
  let invalid = || ParseError::InvalidDate(raw.to_owned());

  if let Some(caps) = ISO_DATE.captures(&text).or_else(|| COMPACT_DATE.captures(&text)) {
    let year = caps[1].parse().map_err(|_| invalid())?;
    let month = caps[2].parse().map_err(|_| invalid())?;
    let day = caps[3].parse().map_err(|_| invalid())?;
    return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid);
  }

  if let Some(caps) = NUMERIC_DATE.captures(&text) {
    let month = caps[1].parse().map_err(|_| invalid())?;
    let day = caps[2].parse().map_err(|_| invalid())?;
    let year = caps
      .get(3)
      .map(|m| expand_year(m.as_str()))
      .transpose()
      .map_err(|_| invalid())?;
    return resolve(year, month, day, reference).ok_or_else(invalid);
  }

  if let Some(caps) = MONTH_DATE.captures(&text) {
    let month = month_number(&caps[1]).ok_or_else(invalid)?;
    let day = caps[2].parse().map_err(|_| invalid())?;
    let year = caps
      .get(3)
      .map(|m| m.as_str().parse::<i32>())
      .transpose()
      .map_err(|_| invalid())?;
    return resolve(year, month, day, reference).ok_or_else(invalid);
  }

  Err(invalid())
}

/// Parse a time of day in 12-hour or 24-hour notation.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
  let text = raw.trim().to_lowercase();
  let invalid = || ParseError::InvalidTime(raw.to_owned());

  match text.as_str() {
    "noon" => return NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(invalid),
    "midnight" => return NaiveTime::from_hms_opt(0, 0, 0).ok_or_else(invalid),
    _ => {}
  }

  if let Some(caps) = TWELVE_HOUR.captures(&text) {
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = caps
      .get(2)
      .map_or(Ok(0), |m| m.as_str().parse())
      .map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
      return Err(invalid());
    }
    let hour = match (&caps[3], hour) {
      ("a", 12) => 0,
      ("a", h) => h,
      ("p", 12) => 12,
      (_, h) => h + 12,
    };
    return NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid);
  }

  if let Some(caps) = TWENTY_FOUR_HOUR.captures(&text) {
    let hour = caps[1].parse().map_err(|_| invalid())?;
    let minute = caps[2].parse().map_err(|_| invalid())?;
    let second = caps
      .get(3)
      .map_or(Ok(0), |m| m.as_str().parse())
      .map_err(|_| invalid())?;
    return NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid);
  }

  Err(invalid())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn month_number(name: &str) -> Option<u32> {
  let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
  let month = match prefix.as_str() {
    "jan" => 1,
    "feb" => 2,
    "mar" => 3,
    "apr" => 4,
    "may" => 5,
    "jun" => 6,
    "jul" => 7,
    "aug" => 8,
    "sep" => 9,
    "oct" => 10,
    "nov" => 11,
    "dec" => 12,
    _ => return None,
  };
  Some(month)
}

fn expand_year(s: &str) -> std::result::Result<i32, std::num::ParseIntError> {
  let year: i32 = s.parse()?;
  Ok(if s.len() == 2 { 2000 + year } else { year })
}

/// Build a date, inferring the year from `reference` when absent.
fn resolve(year: Option<i32>, month: u32, day: u32, reference: NaiveDate) -> Option<NaiveDate> {
  if let Some(year) = year {
    return NaiveDate::from_ymd_opt(year, month, day);
  }
  let rollover = reference
    .checked_sub_months(Months::new(ROLLOVER_MONTHS))
    .unwrap_or(NaiveDate::MIN);
  let this_year = NaiveDate::from_ymd_opt(reference.year(), month, day);
  match this_year {
    Some(date) if date >= rollover => Some(date),
    _ => NaiveDate::from_ymd_opt(reference.year() + 1, month, day).or(this_year),
  }
}
