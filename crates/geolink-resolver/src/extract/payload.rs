//! The preview endpoint's JSON-with-prefix payload and its matchers.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::coords::Coordinate;
use crate::error::ResolveError;
use crate::place_name::clean_candidate;

use super::{non_degenerate, pair_from_strs};

/// Anti-JSON-hijacking marker the provider puts in front of the payload.
pub const PAYLOAD_PREFIX: &str = ")]}'";

/// `[6][9]`-style location blocks look like `[null,null,lat,lon]`.
static ENTITY_PIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*null\s*,\s*null\s*,\s*(-?\d+\.\d+)\s*,\s*(-?\d+\.\d+)\s*\]")
        .expect("valid regex")
});
static LOOSE_TRIPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+\.\d+)\s*,\s*(-?\d+\.\d+)\s*\]")
        .expect("valid regex")
});

const TOP_LEVEL_PAIR_INDEX: usize = 9;
const NESTED_PAIR_PATH: [usize; 2] = [6, 9];
/// `[altitude, lon, lat]` camera triple, two levels down.
const DEEP_TRIPLE_PATH: [usize; 2] = [0, 0];
const PLACE_NAME_PATH: [usize; 2] = [6, 11];

/// Body of a preview response with the prefix removed.
///
/// `parsed` is `None` when the body was not valid JSON; the regex matchers
/// still run on `raw` in that case.
#[derive(Debug, Clone)]
pub struct PreviewPayload {
    pub raw: String,
    pub parsed: Option<Value>,
}

impl PreviewPayload {
    /// Strips [`PAYLOAD_PREFIX`] and parses the remainder.
    ///
    /// Never fails outright. A parse failure comes back as the second tuple
    /// element so the caller can log it; the payload is still usable by the
    /// regex matchers.
    #[must_use]
    pub fn parse(body: &str) -> (Self, Option<ResolveError>) {
        let trimmed = body.trim_start();
        let raw = trimmed
            .strip_prefix(PAYLOAD_PREFIX)
            .unwrap_or(trimmed)
            .trim_start()
            .to_owned();

        match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => (
                Self {
                    raw,
                    parsed: Some(parsed),
                },
                None,
            ),
            Err(source) => (
                Self { raw, parsed: None },
                Some(ResolveError::Deserialize {
                    context: "preview payload".to_owned(),
                    source,
                }),
            ),
        }
    }

    /// The structured place name carried by the payload, if any.
    #[must_use]
    pub fn place_name(&self) -> Option<String> {
        let value = value_at(self.parsed.as_ref()?, &PLACE_NAME_PATH)?;
        clean_candidate(value.as_str()?)
    }
}

fn value_at<'a>(root: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, &index| node.get(index))
}

/// Reads the last two elements of an array as a pair, skipping the
/// `null` markers that often lead such arrays.
fn trailing_pair(value: &Value) -> Option<Coordinate> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let a = items[items.len() - 2].as_f64()?;
    let b = items[items.len() - 1].as_f64()?;
    Coordinate::checked(a, b).and_then(non_degenerate)
}

pub(super) fn match_entity_pin(payload: &PreviewPayload) -> Option<Coordinate> {
    ENTITY_PIN_RE
        .captures_iter(&payload.raw)
        .find_map(|c| pair_from_strs(c.get(1)?.as_str(), c.get(2)?.as_str()))
}

pub(super) fn match_top_level_pair(payload: &PreviewPayload) -> Option<Coordinate> {
    let root = payload.parsed.as_ref()?;
    trailing_pair(root.get(TOP_LEVEL_PAIR_INDEX)?)
}

pub(super) fn match_nested_pair(payload: &PreviewPayload) -> Option<Coordinate> {
    let root = payload.parsed.as_ref()?;
    trailing_pair(value_at(root, &NESTED_PAIR_PATH)?)
}

/// Reads `[altitude, lon, lat]` by position. The altitude is ignored; the
/// other two must be coordinate-shaped and non-zero.
pub(super) fn match_deep_triple(payload: &PreviewPayload) -> Option<Coordinate> {
    let root = payload.parsed.as_ref()?;
    let triple = value_at(root, &DEEP_TRIPLE_PATH)?.as_array()?;
    if triple.len() != 3 {
        return None;
    }
    let lon = triple[1].as_f64()?;
    let lat = triple[2].as_f64()?;
    Coordinate::checked(lat, lon).and_then(non_degenerate)
}

/// Any `[n, x.x, y.y]` triple. Usually the viewport centre, so it runs last.
pub(super) fn match_loose_triple(payload: &PreviewPayload) -> Option<Coordinate> {
    LOOSE_TRIPLE_RE.captures_iter(&payload.raw).find_map(|c| {
        pair_from_strs(c.get(2)?.as_str(), c.get(3)?.as_str()).and_then(non_degenerate)
    })
}
