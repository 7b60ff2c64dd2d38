//! Title cleaning.
//!
//! Pipeline applied by [`clean_title`]:
//!   raw &str
//!     └─ drop bracketed format/edition annotations   "(70mm)", "[4K Restoration]"
//!          └─ drop inline format phrases              "in 35mm", "on IB Technicolor"
//!               └─ drop bare gauge / process tokens   "70MM", "IB Tech"
//!                    └─ merge separators left adjacent           "Heat, , Alien", "The Thing -!"
//!                         └─ collapse whitespace, trim dangling punctuation
//!                              └─ drop promotional prefixes       "IN PERSON:", "SPECIAL EVENT:"

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A bracketed group with no nested brackets inside.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*[(\[]([^()\[\]]*)[)\]]").expect("invalid bracket pattern")
});

/// Contents that mark a bracketed group as a format or edition annotation.
static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)\b(?:\d{2}\s?mm|IB\s+Tech(?:nicolor)?|technicolor|digital|DCP|[24]K|restor(?:ation|ed)|remaster(?:ed)?|anniversary)\b",
  )
  .expect("invalid annotation pattern")
});

/// "in 70mm", "on glorious 35mm", "in IB Technicolor".
static INLINE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)\s*\b(?:in|on)\s+(?:glorious\s+)?(?:(?:IB\s+)?technicolor\s*)?(?:\d{2}\s?mm|IB\s+Tech(?:nicolor)?|technicolor)\b",
  )
  .expect("invalid inline phrase pattern")
});

/// Gauge and process tokens anywhere in the title.
static BARE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(?:\d{2}\s?mm|IB\s+Tech(?:nicolor)?)\b").expect("invalid token pattern")
});

/// Two or more separators with only whitespace between them.
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"([,;:/|+\-–—])(?:\s*[,;:/|+\-–—])+").expect("invalid separator run pattern")
});

/// A separator stranded right before a closing `!` or `?`.
static SEPARATOR_BEFORE_MARK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*[,;:/|+\-–—]\s*([!?])").expect("invalid separator mark pattern")
});

/// Promotional labels ahead of the title proper.
static PROMO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?:in person|special event|sneak preview|members only|premiere)\s*:\s*")
    .expect("invalid promo prefix pattern")
});

/// Event-type prefixes used by some calendars: "Masterclass / Heat".
static EVENT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?i)^\s*(?:masterclass|q\s*&\s*a|discussion|screening|in person|special event|sneak preview|members only)\s*[:/|\-–—]\s*",
  )
  .expect("invalid event prefix pattern")
});

/// A trailing release year: "Night Moves (1975)".
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*[(\[]((?:18|19|20)\d{2})[)\]]\s*$").expect("invalid year pattern")
});

const DANGLING_LEADING: &[char] = &['-', '–', '—', ':', '/', ',', '|', '+'];
const DANGLING_TRAILING: &[char] = &['-', '–', '—', ':', '/', ',', '|', '+', '(', '['];

/// Strip format and edition annotations from a raw title.
///
/// Idempotent: `clean_title(&clean_title(x)) == clean_title(x)`.
pub fn clean_title(raw: &str) -> String {
  let without_groups = BRACKETED.replace_all(raw, |caps: &Captures<'_>| {
    if ANNOTATION.is_match(&caps[1]) {
      String::new()
    } else {
      caps[0].to_owned()
    }
  });
  let without_phrases = INLINE_PHRASE.replace_all(&without_groups, "");
  let without_tokens = BARE_TOKEN.replace_all(&without_phrases, " ");
  let merged = SEPARATOR_RUN.replace_all(&without_tokens, "$1");
  let merged = SEPARATOR_BEFORE_MARK.replace_all(&merged, "$1");

  let mut title = trim_dangling(&collapse_whitespace(&merged));
  while let Some(m) = PROMO_PREFIX.find(&title) {
    title = trim_dangling(&title[m.end()..]);
  }
  title
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_dangling(s: &str) -> String {
  let mut out = s;
  loop {
    let next = out
      .trim()
      .trim_start_matches(DANGLING_LEADING)
      .trim_end_matches(DANGLING_TRAILING);
    if next.len() == out.len() {
      return next.to_owned();
    }
    out = next;
  }
}

/// Remove an event-type prefix such as `"Q&A - "` or `"Masterclass / "`.
pub fn strip_event_prefix(title: &str) -> String {
  EVENT_PREFIX.replace(title, "").into_owned()
}

/// Split a double-feature title into its films.
///
/// Recognised separators are `" / "` and `" + "`. `" & "` is not one: it
/// occurs inside ordinary titles ("Thelma & Louise").
pub fn split_double_feature(title: &str) -> Vec<String> {
  for separator in [" / ", " + "] {
    if title.contains(separator) {
      return title
        .split(separator)
        .map(collapse_whitespace)
        .filter(|part| !part.is_empty())
        .collect();
    }
  }
  let single = collapse_whitespace(title);
  if single.is_empty() { Vec::new() } else { vec![single] }
}

/// Split a trailing parenthesised release year off a title.
pub fn split_release_year(title: &str) -> (String, Option<i32>) {
  match TRAILING_YEAR.captures(title) {
    Some(caps) => {
      let year = caps[1].parse().ok();
      let start = caps.get(0).map_or(title.len(), |m| m.start());
      (title[..start].trim().to_owned(), year)
    }
    None => (title.trim().to_owned(), None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::extract_format;

  // ── clean_title ─────────────────────────────────────────────────────────

  #[test]
  fn strips_parenthetical_gauges() {
    assert_eq!(clean_title("Vertigo (70mm)"), "Vertigo");
    assert_eq!(clean_title("The Red Shoes (IB Technicolor)"), "The Red Shoes");
    assert_eq!(clean_title("Heat (New 35mm Print)"), "Heat");
    assert_eq!(clean_title("Jaws [4K Restoration]"), "Jaws");
  }

  #[test]
  fn strips_inline_phrases_and_tokens() {
    assert_eq!(clean_title("The Shining in 70mm"), "The Shining");
    assert_eq!(clean_title("THE SHINING IN 70MM"), "THE SHINING");
    assert_eq!(clean_title("70MM Lawrence of Arabia"), "Lawrence of Arabia");
    assert_eq!(clean_title("Heat - 35mm"), "Heat");
    assert_eq!(clean_title("Black Narcissus on IB Tech"), "Black Narcissus");
  }

  #[test]
  fn keeps_ordinary_parentheticals_and_digits() {
    assert_eq!(clean_title("(500) Days of Summer"), "(500) Days of Summer");
    assert_eq!(clean_title("2001: A Space Odyssey"), "2001: A Space Odyssey");
    assert_eq!(clean_title("Solaris (1972)"), "Solaris (1972)");
  }

  #[test]
  fn removal_leaves_no_stray_separators() {
    assert_eq!(clean_title("Heat, 35mm, Alien"), "Heat, Alien");
    assert_eq!(clean_title("The Thing - in 70mm!"), "The Thing!");
    assert_eq!(clean_title("Heat - (35mm) - Alien"), "Heat - Alien");
    assert_eq!(clean_title("What's Up, Doc?"), "What's Up, Doc?");
    assert_eq!(clean_title("Mission: Impossible - Fallout"), "Mission: Impossible - Fallout");
  }

  #[test]
  fn strips_promotional_prefixes() {
    assert_eq!(clean_title("IN PERSON: Heat (35mm)"), "Heat");
    assert_eq!(clean_title("Special Event: Sneak Preview: Alien"), "Alien");
    assert_eq!(clean_title("In Person with the Director"), "In Person with the Director");
  }

  #[test]
  fn collapses_whitespace() {
    assert_eq!(clean_title("  The   Long\n Goodbye  "), "The Long Goodbye");
  }

  #[test]
  fn is_idempotent() {
    for raw in [
      "Vertigo (70mm)",
      "The Shining in 70mm",
      "Heat - 35mm",
      "  The Thing (35mm) (Director's Cut)  ",
      "Film (Y (35mm))",
      "Unclosed (35mm",
      "Tron: Legacy",
      "- IN PERSON: - Heat",
      "Heat, 35mm, Alien",
      "The Thing - in 70mm!",
      "",
    ] {
      let once = clean_title(raw);
      assert_eq!(clean_title(&once), once, "not idempotent for {raw:?}");
    }
  }

  #[test]
  fn cleaned_titles_carry_no_format_text() {
    for raw in [
      "Vertigo (70mm)",
      "The Red Shoes (IB Technicolor)",
      "The Shining in 70mm",
      "Night of the Hunter 35mm",
      "Eraserhead (16mm)",
    ] {
      assert!(extract_format(raw).is_some());
      let cleaned = clean_title(raw);
      assert_eq!(extract_format(&cleaned), None, "{cleaned:?} still has a format");
    }
  }

  // ── helpers ─────────────────────────────────────────────────────────────

  #[test]
  fn splits_double_features() {
    assert_eq!(
      split_double_feature("The Long Goodbye / Night Moves"),
      vec!["The Long Goodbye", "Night Moves"]
    );
    assert_eq!(split_double_feature("Alien + Aliens"), vec!["Alien", "Aliens"]);
    assert_eq!(split_double_feature("Thelma & Louise"), vec!["Thelma & Louise"]);
    assert!(split_double_feature("   ").is_empty());
  }

  #[test]
  fn splits_release_year() {
    assert_eq!(
      split_release_year("Night Moves (1975)"),
      ("Night Moves".to_owned(), Some(1975))
    );
    assert_eq!(split_release_year("1917"), ("1917".to_owned(), None));
    assert_eq!(
      split_release_year("(500) Days of Summer"),
      ("(500) Days of Summer".to_owned(), None)
    );
  }

  #[test]
  fn strips_event_prefixes() {
    assert_eq!(strip_event_prefix("Masterclass / Heat"), "Heat");
    assert_eq!(strip_event_prefix("Q&A - Past Lives"), "Past Lives");
    assert_eq!(strip_event_prefix("Screening Room"), "Screening Room");
  }
}
