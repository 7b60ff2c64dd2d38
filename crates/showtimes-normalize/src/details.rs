//! Credits and running time pulled out of free text.

use std::sync::LazyLock;

use regex::Regex;

static DIRECTOR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(?:directed\s+by|dir\.)\s*([^,;()\n|]+)").expect("invalid director pattern")
});

static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(\d{2,3})\s*(?:minutes|mins?)\b\.?").expect("invalid minutes pattern")
});

static HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(\d)\s*(?:h|hrs?|hours?)\.?\s*(\d{1,2})\s*m(?:in)?\b").expect("invalid h/m pattern")
});

/// Director named as "Directed by X" or "dir. X".
pub fn extract_director(text: &str) -> Option<String> {
  let caps = DIRECTOR.captures(text)?;
  let name = caps[1]
    .split_whitespace()
    .take(5)
    .collect::<Vec<_>>()
    .join(" ");
  let name = name.trim_end_matches(['.', '-', ':']).trim();
  (!name.is_empty()).then(|| name.to_owned())
}

/// Running time in minutes from "113 min", "95 minutes" or "1h 53m".
pub fn parse_runtime(text: &str) -> Option<u32> {
  if let Some(caps) = HOURS_MINUTES.captures(text) {
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    return Some(hours * 60 + minutes);
  }
  let caps = MINUTES.captures(text)?;
  caps[1].parse().ok().filter(|m| *m > 0)
}
