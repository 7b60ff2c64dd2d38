//! Small DOM helpers shared by the HTML adapters.

use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

pub(crate) fn compile(selector: &str) -> Result<Selector> {
  Selector::parse(selector).map_err(|e| Error::Selector {
    selector: selector.to_owned(),
    message:  e.to_string(),
  })
}

/// Trimmed, non-empty text nodes under `element`, in document order.
pub(crate) fn fragments(element: ElementRef<'_>) -> Vec<String> {
  element
    .text()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}

/// All text under `element`, whitespace-collapsed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String { fragments(element).join(" ") }

/// Decode entities and drop tags from an HTML snippet.
pub(crate) fn plain_text(snippet: &str) -> String {
  let fragment = Html::parse_fragment(snippet);
  fragments(fragment.root_element()).join(" ")
}

/// Text lines of an HTML snippet, splitting on block boundaries.
pub(crate) fn plain_lines(snippet: &str) -> Vec<String> {
  let fragment = Html::parse_fragment(snippet);
  fragment
    .root_element()
    .text()
    .flat_map(|t| t.lines())
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}

/// Resolve `href` against `base`.
pub(crate) fn absolute_url(base: &str, href: &str) -> String {
  let href = href.trim();
  if href.starts_with("http://") || href.starts_with("https://") {
    href.to_owned()
  } else if let Some(rest) = href.strip_prefix("//") {
    format!("https://{rest}")
  } else {
    format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
  }
}

/// `href` of `element` itself, or of its first descendant link.
pub(crate) fn link_of(element: ElementRef<'_>, links: &Selector) -> Option<String> {
  element
    .value()
    .attr("href")
    .or_else(|| element.select(links).find_map(|a| a.value().attr("href")))
    .map(str::to_owned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_relative_links() {
    assert_eq!(
      absolute_url("https://thenewbev.com", "/program/heat/"),
      "https://thenewbev.com/program/heat/"
    );
    assert_eq!(
      absolute_url("https://thenewbev.com/", "https://tickets.example/x"),
      "https://tickets.example/x"
    );
    assert_eq!(absolute_url("https://a.b", "//cdn.a.b/x"), "https://cdn.a.b/x");
  }

  #[test]
  fn plain_text_decodes_entities() {
    assert_eq!(plain_text("Ren&eacute;e&#8217;s <em>Night</em>"), "Renée’s Night");
  }
}
