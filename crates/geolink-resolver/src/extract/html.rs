//! Matchers that run directly on the fetched HTML.

use std::sync::LazyLock;

use regex::Regex;

use crate::coords::Coordinate;
use crate::error::ResolveError;

use super::{non_degenerate, pair_from_strs, unescape_href};

static LINK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid regex"));
static HREF_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});
static PREVIEW_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)["']([^"'\s<>]*?\\?/maps\\?/preview\\?/place[^"'\s<>]*)["']"#)
        .expect("valid regex")
});
static PIN_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").expect("valid regex"));
static DATA_ATTR_LAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-lat(?:itude)?\s*=\s*["'](-?\d+\.\d+)["']"#).expect("valid regex")
});
static DATA_ATTR_LNG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-(?:lng|lon|longitude)\s*=\s*["'](-?\d+\.\d+)["']"#)
        .expect("valid regex")
});
static APP_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"APP_INITIALIZATION_STATE\s*=\s*\[\s*\[\s*\[\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+\.\d+)\s*,\s*(-?\d+\.\d+)\s*\]",
    )
    .expect("valid regex")
});

/// Query parameters a search link may carry a coordinate pair in.
const PRELOAD_COORD_KEYS: &[&str] = &["q", "ll", "sll", "center", "query"];

/// Finds a `<link>` to the search endpoint whose query already names the
/// coordinate pair.
pub(super) fn match_preload_link(html: &str) -> Option<Coordinate> {
    LINK_TAG_RE.find_iter(html).find_map(|m| {
        let href = HREF_ATTR_RE.captures(m.as_str())?.get(1)?.as_str();
        let href = unescape_href(href);
        if !href.contains("/search?") {
            return None;
        }
        coordinate_from_query(&href)
    })
}

fn coordinate_from_query(href: &str) -> Option<Coordinate> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if !PRELOAD_COORD_KEYS.contains(&key) {
            return None;
        }
        Coordinate::parse_pair(value)
    })
}

/// Locates the preview/detail link and resolves it against `page_url`.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidUrl`] if `page_url` cannot serve as a base
/// or the discovered link cannot be joined onto it.
pub fn find_preview_link(html: &str, page_url: &str) -> Result<Option<String>, ResolveError> {
    let Some(raw) = PREVIEW_HREF_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| unescape_href(m.as_str()))
    else {
        return Ok(None);
    };

    let base = reqwest::Url::parse(page_url).map_err(|e| ResolveError::InvalidUrl {
        url: page_url.to_owned(),
        reason: e.to_string(),
    })?;
    let joined = base.join(&raw).map_err(|e| ResolveError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    Ok(Some(joined.to_string()))
}

/// `!3d<lat>!4d<lon>` entity data, or a `data-lat`/`data-lng` attribute pair.
pub(super) fn match_inline_pin(html: &str) -> Option<Coordinate> {
    let from_data_param = PIN_DATA_RE
        .captures_iter(html)
        .find_map(|c| pair_from_strs(c.get(1)?.as_str(), c.get(2)?.as_str()));
    if from_data_param.is_some() {
        return from_data_param;
    }

    let lat = DATA_ATTR_LAT_RE.captures(html)?.get(1)?.as_str();
    let lng = DATA_ATTR_LNG_RE.captures(html)?.get(1)?.as_str();
    pair_from_strs(lat, lng)
}

/// The `[[[altitude, lon, lat]` viewport at the head of the inline state block.
pub(super) fn match_inline_state(html: &str) -> Option<Coordinate> {
    let caps = APP_STATE_RE.captures(html)?;
    pair_from_strs(caps.get(2)?.as_str(), caps.get(3)?.as_str()).and_then(non_degenerate)
}
