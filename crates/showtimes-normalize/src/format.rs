//! Projection format detection.

use std::sync::LazyLock;

use regex::Regex;
use showtimes_core::movie::FormatTag;

/// One pattern per [`FormatTag`], in the tag's priority order.
static FORMAT_PATTERNS: LazyLock<Vec<(FormatTag, Regex)>> = LazyLock::new(|| {
  [
    (FormatTag::Film70mm, r"(?i)\b70\s?mm\b"),
    (FormatTag::IbTechnicolor, r"(?i)\bIB\s+Tech(?:nicolor)?\b"),
    (FormatTag::Film35mm, r"(?i)\b35\s?mm\b"),
    (FormatTag::Film16mm, r"(?i)\b16\s?mm\b"),
    (FormatTag::Technicolor, r"(?i)\btechnicolor\b"),
    (FormatTag::Digital, r"(?i)\b(?:digital|DCP|[24]K)\b"),
  ]
  .into_iter()
  .map(|(tag, pattern)| (tag, Regex::new(pattern).expect("invalid format pattern")))
  .collect()
});

/// Return the strongest format explicitly mentioned in `raw`.
///
/// Film gauges outrank `Digital`. `None` means the text names no format at
/// all; choosing a default is the caller's business.
pub fn extract_format(raw: &str) -> Option<FormatTag> {
  FORMAT_PATTERNS
    .iter()
    .find(|(_, pattern)| pattern.is_match(raw))
    .map(|(tag, _)| *tag)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_gauges() {
    assert_eq!(extract_format("Vertigo (70mm)"), Some(FormatTag::Film70mm));
    assert_eq!(extract_format("Vertigo in 35 mm"), Some(FormatTag::Film35mm));
    assert_eq!(extract_format("shot on 16MM"), Some(FormatTag::Film16mm));
  }

  #[test]
  fn ib_technicolor_outranks_plain_35mm_and_technicolor() {
    assert_eq!(
      extract_format("The Red Shoes (IB Tech 35mm print)"),
      Some(FormatTag::IbTechnicolor)
    );
    assert_eq!(extract_format("IB Tech 35mm"), Some(FormatTag::IbTechnicolor));
    assert_eq!(extract_format("35mm IB Technicolor"), Some(FormatTag::IbTechnicolor));
    assert_eq!(
      extract_format("glorious Technicolor"),
      Some(FormatTag::Technicolor)
    );
  }

  #[test]
  fn film_outranks_digital() {
    assert_eq!(
      extract_format("New 4K restoration; Sunday show in 35mm"),
      Some(FormatTag::Film35mm)
    );
    assert_eq!(extract_format("Presented in DCP"), Some(FormatTag::Digital));
  }

  #[test]
  fn no_mention_is_none() {
    assert_eq!(extract_format("The Long Goodbye"), None);
    assert_eq!(extract_format(""), None);
    // Digits alone are not a gauge.
    assert_eq!(extract_format("2001: A Space Odyssey"), None);
  }
}
