//! URL helpers for the redirect walker.

use reqwest::Url;

use crate::error::ResolveError;

/// Query parameter carrying the provider's feature identifier.
const FEATURE_ID_PARAM: &str = "ftid";

/// Where a redirect points, before and after the feature-identifier rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NextHop {
    /// The URL the walker requests next.
    pub(super) url: String,
    /// The `Location` target resolved against the current URL. Differs from
    /// `url` only when a feature identifier was rewritten, and may still carry
    /// a search term the canonical URL drops.
    pub(super) target: String,
}

/// Works out where the walker goes next after a redirect.
///
/// `location` is resolved against `current` (absolute values pass through
/// unchanged). If the target carries a feature identifier the next URL is the
/// canonical `{canonical_base}/maps?ftid=…` instead, skipping whatever hops
/// the provider would have sent us through.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidUrl`] if `current` cannot serve as a base or
/// `location` cannot be joined onto it.
pub(super) fn next_hop_url(
    current: &str,
    location: &str,
    canonical_base: &str,
) -> Result<NextHop, ResolveError> {
    let base = parse_url(current)?;
    let target = base
        .join(location.trim())
        .map_err(|e| ResolveError::InvalidUrl {
            url: location.to_owned(),
            reason: e.to_string(),
        })?;

    let url = match feature_id(&target) {
        Some(ftid) => canonical_feature_url(canonical_base, &ftid)?,
        None => target.to_string(),
    };
    Ok(NextHop {
        url,
        target: target.into(),
    })
}

fn feature_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == FEATURE_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn canonical_feature_url(
    canonical_base: &str,
    ftid: &str,
) -> Result<String, ResolveError> {
    let mut url = parse_url(canonical_base)?
        .join("/maps")
        .map_err(|e| ResolveError::InvalidUrl {
            url: canonical_base.to_owned(),
            reason: e.to_string(),
        })?;
    url.query_pairs_mut().append_pair(FEATURE_ID_PARAM, ftid);
    Ok(url.into())
}

/// Extracts the hostname for log fields.
///
/// Falls back to the full URL string if parsing fails.
pub(super) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

fn parse_url(raw: &str) -> Result<Url, ResolveError> {
    Url::parse(raw).map_err(|e| ResolveError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.google.com";

    #[test]
    fn absolute_location_passes_through() {
        let next = next_hop_url(
            "https://maps.app.goo.gl/abc",
            "https://www.google.com/maps/place/Taipei+101/",
            BASE,
        )
        .unwrap();
        assert_eq!(next.url, "https://www.google.com/maps/place/Taipei+101/");
        assert_eq!(next.target, next.url);
    }

    #[test]
    fn relative_location_resolves_against_current_origin() {
        let next = next_hop_url(
            "https://www.google.com/maps/abc?x=1",
            "/maps/place/Longshan+Temple/",
            BASE,
        )
        .unwrap();
        assert_eq!(next.url, "https://www.google.com/maps/place/Longshan+Temple/");
    }

    #[test]
    fn feature_id_rewrites_to_canonical_endpoint() {
        let next = next_hop_url(
            "https://maps.app.goo.gl/abc",
            "https://maps.google.com/?ftid=0x3442abb6da9c9e1f:0x1206bcf082fd10a6&entry=gps",
            BASE,
        )
        .unwrap();
        assert_eq!(
            next.url,
            "https://www.google.com/maps?ftid=0x3442abb6da9c9e1f%3A0x1206bcf082fd10a6"
        );
    }

    #[test]
    fn feature_id_rewrite_keeps_original_target() {
        let next = next_hop_url(
            "https://maps.app.goo.gl/abc",
            "https://maps.google.com/maps?q=Taipei+101&ftid=0x1:0x2",
            BASE,
        )
        .unwrap();
        assert_eq!(next.url, "https://www.google.com/maps?ftid=0x1%3A0x2");
        assert_eq!(
            next.target,
            "https://maps.google.com/maps?q=Taipei+101&ftid=0x1:0x2"
        );
    }

    #[test]
    fn empty_feature_id_is_ignored() {
        let next = next_hop_url("https://goo.gl/a", "/maps?ftid=&q=x", BASE).unwrap();
        assert_eq!(next.url, "https://goo.gl/maps?ftid=&q=x");
    }

    #[test]
    fn unusable_current_url_is_an_error() {
        let err = next_hop_url("not a url", "/maps", BASE).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));
    }

    #[test]
    fn extract_domain_falls_back_to_input() {
        assert_eq!(extract_domain("https://maps.app.goo.gl/x"), "maps.app.goo.gl");
        assert_eq!(extract_domain("garbage"), "garbage");
    }
}
