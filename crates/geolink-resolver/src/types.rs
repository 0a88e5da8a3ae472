//! Request and outcome types for one resolution call.
//!
//! ## Response body
//!
//! [`ResolutionOutcome::to_response`] produces the JSON body callers consume:
//!
//! | Status          | HTTP | Body                                                   |
//! |-----------------|------|--------------------------------------------------------|
//! | `Resolved`      | 200  | `{"coords": "lat,lon", "placeName": "..."}`            |
//! | `NameOnly`      | 200  | `{"coords": null, "placeName": "..."}`                 |
//! | `NotFound`      | 404  | `{"error": "No coords found", "placeName": ""}`        |
//! | `Fault`         | 500  | `{"error": "Server Error", "details": ..., "placeName": ...}` |
//! | `InvalidInput`  | 400  | `{"error": "Invalid URL", "details": ..., "placeName": ""}`   |

use serde::Serialize;

use crate::coords::Coordinate;
use crate::error::ResolveError;
use crate::extract::{ExtractionResult, Strategy};
use crate::place_name::is_generic_branding;

/// A share URL that passed the up-front checks. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    url: String,
}

impl ResolutionRequest {
    /// Validates `raw` before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInput`] if `raw` is blank, is not an
    /// `http(s)` URL, or contains none of `allowed_hosts`.
    pub fn new(raw: &str, allowed_hosts: &[String]) -> Result<Self, ResolveError> {
        let url = raw.trim();
        let invalid = |reason: &str| ResolveError::InvalidInput {
            url: raw.to_owned(),
            reason: reason.to_owned(),
        };

        if url.is_empty() {
            return Err(invalid("missing url"));
        }
        let lowered = url.to_ascii_lowercase();
        if !(lowered.starts_with("https://") || lowered.starts_with("http://")) {
            return Err(invalid("not an http(s) URL"));
        }
        if !allowed_hosts
            .iter()
            .any(|host| !host.is_empty() && lowered.contains(host.as_str()))
        {
            return Err(invalid("not a supported map link"));
        }

        Ok(Self {
            url: url.to_owned(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Terminal state of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// A coordinate was found.
    Resolved,
    /// Attempts ran out, but a place name was seen along the way.
    NameOnly,
    /// Attempts ran out with nothing usable.
    NotFound,
    /// An unexpected fault ended the resolution early.
    Fault,
    /// The input was rejected before any request was made.
    InvalidInput,
}

impl ResolutionStatus {
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            ResolutionStatus::Resolved | ResolutionStatus::NameOnly => 200,
            ResolutionStatus::NotFound => 404,
            ResolutionStatus::Fault => 500,
            ResolutionStatus::InvalidInput => 400,
        }
    }
}

/// What a resolution call hands back. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    pub status: ResolutionStatus,
    pub coordinate: Option<Coordinate>,
    /// Branding values are filtered out before this is set.
    pub place_name: Option<String>,
    pub strategy: Option<Strategy>,
    /// Outer attempts consumed.
    pub attempts: u32,
    /// Human-readable error detail for `Fault` and `InvalidInput`.
    pub error: Option<String>,
}

impl ResolutionOutcome {
    #[must_use]
    pub fn resolved(
        found: ExtractionResult,
        best_place_name: Option<String>,
        attempts: u32,
    ) -> Self {
        Self {
            status: ResolutionStatus::Resolved,
            coordinate: Some(found.coordinate),
            place_name: usable_name(found.place_name.or(best_place_name)),
            strategy: Some(found.strategy),
            attempts,
            error: None,
        }
    }

    /// Every attempt ran without a coordinate. A surviving place name makes
    /// this a partial success.
    #[must_use]
    pub fn exhausted(best_place_name: Option<String>, attempts: u32) -> Self {
        let place_name = usable_name(best_place_name);
        let status = if place_name.is_some() {
            ResolutionStatus::NameOnly
        } else {
            ResolutionStatus::NotFound
        };
        Self {
            status,
            coordinate: None,
            place_name,
            strategy: None,
            attempts,
            error: None,
        }
    }

    #[must_use]
    pub fn fault(error: &ResolveError, best_place_name: Option<String>, attempts: u32) -> Self {
        Self {
            status: ResolutionStatus::Fault,
            coordinate: None,
            place_name: usable_name(best_place_name),
            strategy: None,
            attempts,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn invalid_input(error: &ResolveError) -> Self {
        Self {
            status: ResolutionStatus::InvalidInput,
            coordinate: None,
            place_name: None,
            strategy: None,
            attempts: 0,
            error: Some(error.to_string()),
        }
    }

    /// `true` if either a coordinate or a place name was recovered.
    #[must_use]
    pub fn found_signal(&self) -> bool {
        self.coordinate.is_some() || self.place_name.is_some()
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.status.http_status()
    }

    #[must_use]
    pub fn to_response(&self) -> ResolveResponse {
        let place_name = self.place_name.clone().unwrap_or_default();
        match self.status {
            ResolutionStatus::Resolved | ResolutionStatus::NameOnly => ResolveResponse::Found {
                coords: self.coordinate.map(|c| c.to_wire()),
                place_name,
            },
            ResolutionStatus::NotFound => ResolveResponse::Error {
                error: "No coords found".to_owned(),
                details: None,
                place_name: String::new(),
            },
            ResolutionStatus::Fault => ResolveResponse::Error {
                error: "Server Error".to_owned(),
                details: self.error.clone(),
                place_name,
            },
            ResolutionStatus::InvalidInput => ResolveResponse::Error {
                error: "Invalid URL".to_owned(),
                details: self.error.clone(),
                place_name: String::new(),
            },
        }
    }
}

/// JSON body for a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    #[serde(rename_all = "camelCase")]
    Found {
        coords: Option<String>,
        place_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        place_name: String,
    },
}

fn usable_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_owned())
        .filter(|n| !is_generic_branding(n))
}
