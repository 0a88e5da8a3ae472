//! The resolution engine: retry/backoff controller over the redirect walker
//! and the strategy chain.

mod attempt;
mod origin;
mod walker;

use std::time::Duration;

use geolink_core::ResolverSettings;
use reqwest::Client;
use tracing::Instrument;
use uuid::Uuid;

use crate::backoff::{BackoffPolicy, Sleeper, TokioSleeper};
use crate::error::ResolveError;
use crate::identity::{IdentityRotator, RandomIdentity};
use crate::types::{ResolutionOutcome, ResolutionRequest};

/// Upper bound on the TCP/TLS connect phase of any request.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Resolves map share links into coordinates and place names.
///
/// Redirects are never followed automatically; every hop is inspected so a
/// feature identifier can short-circuit the chain. All attempts and hops run
/// strictly in sequence.
///
/// Worst-case wall-clock time is
/// `max_attempts * (request_timeout * max_hops + backoff cap)`. Callers that
/// need a hard deadline should wrap [`Resolver::resolve`] in their own timeout.
pub struct Resolver<I = RandomIdentity, S = TokioSleeper> {
    client: Client,
    settings: ResolverSettings,
    backoff: BackoffPolicy,
    identity: I,
    sleeper: S,
}

impl Resolver {
    /// Creates a `Resolver` with random identities and real sleeps.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(settings: ResolverSettings) -> Result<Self, ResolveError> {
        Self::with_parts(settings, RandomIdentity, TokioSleeper)
    }
}

impl<I: IdentityRotator, S: Sleeper> Resolver<I, S> {
    /// Creates a `Resolver` with caller-supplied identity and sleep seams.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_parts(
        settings: ResolverSettings,
        identity: I,
        sleeper: S,
    ) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(
                settings.request_timeout_secs.min(CONNECT_TIMEOUT_SECS),
            ))
            .build()
            .map_err(ResolveError::ClientBuild)?;
        Ok(Self {
            client,
            backoff: BackoffPolicy::from_settings(&settings),
            settings,
            identity,
            sleeper,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Validates `raw` and resolves it. Never fails: rejected input comes
    /// back as an outcome with [`crate::ResolutionStatus::InvalidInput`].
    pub async fn resolve_url(&self, raw: &str) -> ResolutionOutcome {
        match ResolutionRequest::new(raw, &self.settings.allowed_hosts) {
            Ok(request) => self.resolve(&request).await,
            Err(error) => {
                tracing::warn!(%error, "rejected input");
                ResolutionOutcome::invalid_input(&error)
            }
        }
    }

    /// Runs up to `max_attempts` full attempts, sleeping between them, and
    /// assembles the outcome.
    ///
    /// The best place name seen in any attempt survives into the final
    /// outcome, including the exhausted and fault paths.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionOutcome {
        let span = tracing::info_span!(
            "resolve",
            resolution_id = %Uuid::new_v4(),
            domain = %origin::extract_domain(request.url()),
        );
        self.run_attempts(request).instrument(span).await
    }

    async fn run_attempts(&self, request: &ResolutionRequest) -> ResolutionOutcome {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut best_place_name: Option<String> = None;

        for attempt in 1..=max_attempts {
            match self.run_attempt(request, &mut best_place_name).await {
                Ok(Some(found)) => {
                    tracing::info!(
                        attempt,
                        strategy = %found.strategy,
                        coords = %found.coordinate,
                        place_name = ?found.place_name,
                        "resolved"
                    );
                    return ResolutionOutcome::resolved(found, best_place_name, attempt);
                }
                Ok(None) => {
                    tracing::debug!(attempt, "no strategy matched");
                }
                Err(error) if error.is_retriable() => {
                    tracing::debug!(attempt, %error, "attempt ended early");
                }
                Err(error) => {
                    tracing::error!(attempt, %error, "resolution aborted");
                    return ResolutionOutcome::fault(&error, best_place_name, attempt);
                }
            }

            if attempt < max_attempts {
                let delay = self.backoff.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after backoff"
                );
                self.sleeper.sleep(delay).await;
            }
        }

        let outcome = ResolutionOutcome::exhausted(best_place_name, max_attempts);
        tracing::info!(
            status = ?outcome.status,
            place_name = ?outcome.place_name,
            "attempts exhausted"
        );
        outcome
    }
}
