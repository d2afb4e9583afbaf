pub(crate) mod atcoder;
pub(crate) mod codechef;
pub(crate) mod spoj;

use std::str::FromStr;

use ::scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::Result;

/// Fetch a URL and return the raw HTML body.
///
/// Parsing is left to the caller: [`Html`] is not `Send`, so it must be built after the last
/// await of an adapter.
pub(crate) async fn fetch_page(client: &reqwest::Client, url: &str, user_agent: &str) -> Result<String> {
    debug!(url, "fetching page");
    let request = client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent);
    crate::api::send(request, url).await
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default()
}

/// Same as [`select_text`], but searching the whole document.
pub(crate) fn select_document_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default()
}

/// All non-empty text nodes of `element`, trimmed and joined by single spaces.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the first run of digits in `text`, ignoring thousands separators.
///
/// Anything unparseable ("", "N/A", overflow) yields the type's default, i.e. zero.
pub(crate) fn parse_int_or_zero<T: FromStr + Default>(text: &str) -> T {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or_default()
}

/// Parse the first decimal number in `text`, zero when there is none.
pub(crate) fn parse_float_or_zero(text: &str) -> f64 {
    let number: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    number.trim_end_matches('.').parse().unwrap_or(0.0)
}

/// Find the element following the label element whose text is `label`.
///
/// Labels are matched exactly first, then by substring, so "Rating" does not
/// pick up "Highest Rating" when both exist.
pub(crate) fn value_after_label<'a>(
    document: &'a Html,
    label_selector: &Selector,
    label: &str,
) -> Option<ElementRef<'a>> {
    let labels: Vec<ElementRef<'a>> = document.select(label_selector).collect();
    let found = labels
        .iter()
        .find(|el| element_text(el).eq_ignore_ascii_case(label))
        .or_else(|| labels.iter().find(|el| element_text(el).contains(label)))?;
    found.next_siblings().find_map(ElementRef::wrap)
}
