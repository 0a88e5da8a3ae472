//! Coordinate extraction strategies.
//!
//! Strategies run in a fixed priority order and the first match wins:
//!
//! 1. Preload/search `<link>` carrying a coordinate pair in its query.
//! 2. Preview payload fetched from a `/maps/preview/place` link, tried as
//!    entity pin, top-level pair, nested pair, deep triple, loose triple.
//! 3. Inline page state: `!3d…!4d…` pin data, `data-lat`/`data-lng`
//!    attributes, then the `APP_INITIALIZATION_STATE` viewport.
//! 4. Coordinates embedded in the URL of the page itself.
//!
//! Each group is a slice of [`Matcher`]s evaluated with [`first_match`], so the
//! order is data and every matcher can be tested on its own. Step 2 needs a
//! network round trip and is driven by [`crate::client`].

mod html;
mod payload;
mod url;

pub use html::find_preview_link;
pub use payload::PreviewPayload;

use crate::coords::Coordinate;

/// Which strategy produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    PreloadLink,
    PayloadEntityPin,
    PayloadTopLevelPair,
    PayloadNestedPair,
    PayloadDeepTriple,
    PayloadLooseTriple,
    InlinePin,
    InlineState,
    UrlEmbedded,
}

/// How much a strategy's coordinate can be trusted to be the exact pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    /// Likely a map viewport centre rather than the pinned entity.
    Viewport,
    Structural,
    Exact,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::PreloadLink => "preload_link",
            Strategy::PayloadEntityPin => "payload_entity_pin",
            Strategy::PayloadTopLevelPair => "payload_top_level_pair",
            Strategy::PayloadNestedPair => "payload_nested_pair",
            Strategy::PayloadDeepTriple => "payload_deep_triple",
            Strategy::PayloadLooseTriple => "payload_loose_triple",
            Strategy::InlinePin => "inline_pin",
            Strategy::InlineState => "inline_state",
            Strategy::UrlEmbedded => "url_embedded",
        }
    }

    #[must_use]
    pub fn confidence(self) -> Confidence {
        match self {
            Strategy::PreloadLink | Strategy::PayloadEntityPin | Strategy::InlinePin => {
                Confidence::Exact
            }
            Strategy::PayloadTopLevelPair | Strategy::PayloadNestedPair | Strategy::UrlEmbedded => {
                Confidence::Structural
            }
            Strategy::PayloadDeepTriple | Strategy::PayloadLooseTriple | Strategy::InlineState => {
                Confidence::Viewport
            }
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate found by exactly one strategy, plus any place name that
/// strategy's source carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub coordinate: Coordinate,
    pub place_name: Option<String>,
    pub strategy: Strategy,
}

/// One entry of a strategy chain.
pub struct Matcher<T: ?Sized> {
    pub strategy: Strategy,
    pub run: fn(&T) -> Option<Coordinate>,
}

/// Runs `matchers` in order and returns the first hit.
pub fn first_match<T: ?Sized>(matchers: &[Matcher<T>], input: &T) -> Option<ExtractionResult> {
    matchers.iter().find_map(|matcher| {
        let coordinate = (matcher.run)(input)?;
        tracing::debug!(
            strategy = %matcher.strategy,
            confidence = ?matcher.strategy.confidence(),
            %coordinate,
            "strategy matched"
        );
        Some(ExtractionResult {
            coordinate,
            place_name: None,
            strategy: matcher.strategy,
        })
    })
}

/// Strategy 1, run on the fetched HTML before anything else.
pub const DIRECT_MATCHERS: &[Matcher<str>] = &[Matcher {
    strategy: Strategy::PreloadLink,
    run: html::match_preload_link,
}];

/// Strategy 2, run on the preview payload.
pub const PAYLOAD_MATCHERS: &[Matcher<PreviewPayload>] = &[
    Matcher {
        strategy: Strategy::PayloadEntityPin,
        run: payload::match_entity_pin,
    },
    Matcher {
        strategy: Strategy::PayloadTopLevelPair,
        run: payload::match_top_level_pair,
    },
    Matcher {
        strategy: Strategy::PayloadNestedPair,
        run: payload::match_nested_pair,
    },
    Matcher {
        strategy: Strategy::PayloadDeepTriple,
        run: payload::match_deep_triple,
    },
    Matcher {
        strategy: Strategy::PayloadLooseTriple,
        run: payload::match_loose_triple,
    },
];

/// Strategy 3, run on the fetched HTML when the preview path found nothing.
pub const INLINE_MATCHERS: &[Matcher<str>] = &[
    Matcher {
        strategy: Strategy::InlinePin,
        run: html::match_inline_pin,
    },
    Matcher {
        strategy: Strategy::InlineState,
        run: html::match_inline_state,
    },
];

/// Strategy 4, run on the URL the page was served from.
pub const URL_MATCHERS: &[Matcher<str>] = &[Matcher {
    strategy: Strategy::UrlEmbedded,
    run: url::match_url_coordinates,
}];

/// Undoes the escaping that hides `&` and `=` inside hrefs: HTML entities
/// and JavaScript `&`-style escapes.
pub(crate) fn unescape_href(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("\\u0026", "&")
        .replace("\\u003d", "=")
        .replace("\\u003D", "=")
        .replace("\\/", "/")
}

/// Parses two captured decimal strings into a checked coordinate.
pub(crate) fn pair_from_strs(a: &str, b: &str) -> Option<Coordinate> {
    let a = a.parse::<f64>().ok()?;
    let b = b.parse::<f64>().ok()?;
    Coordinate::checked(a, b)
}

/// Rejects pairs where either value is exactly zero, a common placeholder.
pub(crate) fn non_degenerate(coord: Coordinate) -> Option<Coordinate> {
    if coord.latitude == 0.0 || coord.longitude == 0.0 {
        None
    } else {
        Some(coord)
    }
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
