//! Coordinates carried by the page URL itself.

use std::sync::LazyLock;

use regex::Regex;

use crate::coords::Coordinate;

use super::pair_from_strs;

static URL_PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").expect("valid regex"));
static URL_AT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));
static URL_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[?&](?:q|ll|query)=(-?\d+\.\d+)(?:,|%2C)\+?(-?\d+\.\d+)(?:[&#]|$)")
        .expect("valid regex")
});

/// Tries `!3d…!4d…` data first (exact pin), then the `@lat,lon` camera
/// position, then a `q=lat,lon` query.
pub(super) fn match_url_coordinates(url: &str) -> Option<Coordinate> {
    [&*URL_PIN_RE, &*URL_AT_RE, &*URL_QUERY_RE]
        .into_iter()
        .find_map(|re| {
            let caps = re.captures(url)?;
            pair_from_strs(caps.get(1)?.as_str(), caps.get(2)?.as_str())
        })
}
