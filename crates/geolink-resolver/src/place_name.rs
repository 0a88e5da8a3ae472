//! Human place-name recovery from a URL and an optional page body.
//!
//! Sources are tried in a fixed order and the first usable value wins:
//! URL query term, `/place/<name>` path segment, document `<title>`, then the
//! `og:title` meta tag. Values that are coordinate pairs or nothing but
//! provider branding are discarded at every step.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::coords::is_coordinate_shaped;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("valid regex"));
static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Query parameters that carry a free-text search term.
const QUERY_KEYS: &[&str] = &["q", "query"];

/// Path marker preceding a URL-encoded place name.
const PLACE_PATH_MARKER: &str = "place";

/// Provider branding appended to page titles, in every locale we have seen.
const BRANDING_SUFFIXES: &[&str] = &[
    " - Google Maps",
    " – Google Maps",
    " · Google Maps",
    " - Google 地圖",
    " - Google 地图",
    " - Google マップ",
    " - Google 지도",
    " - Google Карты",
];

/// Titles that name the provider rather than a place.
const GENERIC_TITLES: &[&str] = &[
    "google maps",
    "google 地圖",
    "google 地图",
    "google マップ",
    "google 지도",
    "google карты",
    "google",
    "before you continue",
    "before you continue to google maps",
];

/// Recovers a place name from `url` and, if given, the fetched `html`.
#[must_use]
pub fn extract_place_name(url: &str, html: Option<&str>) -> Option<String> {
    if let Some(name) = from_query(url) {
        return Some(name);
    }
    if let Some(name) = from_place_path(url) {
        return Some(name);
    }
    let html = html?;
    from_title(html).or_else(|| from_og_title(html))
}

/// Returns `true` when `name` is provider branding rather than a place.
#[must_use]
pub fn is_generic_branding(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    lowered.is_empty() || GENERIC_TITLES.contains(&lowered.as_str())
}

fn from_query(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .filter(|(key, _)| QUERY_KEYS.contains(&key.as_ref()))
        .find_map(|(_, value)| clean_candidate(&value))
}

fn from_place_path(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    segments.find(|segment| *segment == PLACE_PATH_MARKER)?;
    let raw = segments.next()?;
    let decoded = decode_path_segment(raw);
    clean_candidate(&decoded)
}

fn from_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    clean_candidate(strip_branding(&decode_entities(raw)))
}

fn from_og_title(html: &str) -> Option<String> {
    let raw = find_meta_content(html, "property", "og:title")
        .or_else(|| find_meta_content(html, "name", "og:title"))?;
    clean_candidate(strip_branding(&decode_entities(&raw)))
}

/// Percent-decodes a path segment, treating `+` as a space.
fn decode_path_segment(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn strip_branding(title: &str) -> &str {
    let trimmed = title.trim();
    BRANDING_SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed)
}

pub(crate) fn clean_candidate(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() || is_coordinate_shaped(&collapsed) || is_generic_branding(&collapsed)
    {
        return None;
    }
    Some(collapsed.into_owned())
}

fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, "content")
        } else {
            None
        }
    })
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\b{}\s*=\s*"([^"]*)""#, regex::escape(attr));
    let re = Regex::new(&pattern).ok()?;
    re.captures(tag)
        .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Decodes the handful of HTML entities that show up in titles.
pub(crate) fn decode_entities(raw: &str) -> String {
    raw.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "place_name_test.rs"]
mod tests;
