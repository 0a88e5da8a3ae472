//! Handlers for the `resolve` and `normalize` commands.
//!
//! The JSON body goes to stdout and nothing else does; logs are on stderr.

use std::process::ExitCode;

use geolink_core::{AppConfig, ResolverSettings};
use geolink_resolver::{Resolver, ResolveResponse};

/// Largest hop bound accepted on the command line, matching the config check.
const MAX_HOPS_LIMIT: usize = 16;

/// Command-line values that take precedence over the environment.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Overrides {
    pub(crate) attempts: Option<u32>,
    pub(crate) max_hops: Option<usize>,
}

impl Overrides {
    pub(crate) fn apply(self, settings: &mut ResolverSettings) -> anyhow::Result<()> {
        if let Some(attempts) = self.attempts {
            anyhow::ensure!(attempts >= 1, "--attempts must be at least 1");
            settings.max_attempts = attempts;
        }
        if let Some(max_hops) = self.max_hops {
            anyhow::ensure!(
                (1..=MAX_HOPS_LIMIT).contains(&max_hops),
                "--max-hops must be between 1 and {MAX_HOPS_LIMIT}"
            );
            settings.max_hops = max_hops;
        }
        Ok(())
    }
}

/// Resolves `url` and prints the response body.
///
/// # Errors
///
/// Returns an error if an override is out of range, the HTTP client cannot
/// be built, or the body cannot be serialized. A failed resolution is not an
/// error; it is reported through the body and a non-zero exit code.
pub(crate) async fn run_resolve(
    config: &AppConfig,
    url: &str,
    overrides: Overrides,
    pretty: bool,
) -> anyhow::Result<ExitCode> {
    let mut settings = config.resolver.clone();
    overrides.apply(&mut settings)?;
    tracing::debug!(env = %config.env, ?settings, "resolver settings");

    let resolver = Resolver::new(settings)?;
    let outcome = resolver.resolve_url(url).await;
    let status = outcome.http_status();
    tracing::info!(status, attempts = outcome.attempts, "resolution finished");

    println!("{}", render(&outcome.to_response(), pretty)?);
    Ok(if is_success(status) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub(crate) fn render(response: &ResolveResponse, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
}

pub(crate) fn is_success(http_status: u16) -> bool {
    (200..300).contains(&http_status)
}

pub(crate) fn run_normalize(a: f64, b: f64) -> String {
    geolink_resolver::normalize(a, b).to_wire()
}
