//! One hop of the redirect walk, plus the preview fetch.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, LOCATION, REFERER, USER_AGENT};

use crate::backoff::Sleeper;
use crate::error::ResolveError;
use crate::extract::PreviewPayload;
use crate::identity::IdentityRotator;

use super::{origin, Resolver};

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const PREVIEW_ACCEPT: &str = "*/*";
const LANGUAGE: &str = "en-US,en;q=0.9";

/// Where a single GET left the walker.
#[derive(Debug)]
pub(super) enum Hop {
    /// Follow this URL next.
    Redirect(origin::NextHop),
    /// A successful response; the body is the page to extract from.
    Page(String),
}

impl<I: IdentityRotator, S: Sleeper> Resolver<I, S> {
    /// Issues one non-following GET with a fresh identity.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Http`]: network or TLS failure, or timeout.
    /// - [`ResolveError::UnexpectedStatus`]: no redirect target and a non-2xx status.
    /// - [`ResolveError::InvalidUrl`]: the redirect target cannot be resolved.
    pub(super) async fn step(&self, url: &str) -> Result<Hop, ResolveError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.identity.next_user_agent())
            .header(ACCEPT, PAGE_ACCEPT)
            .header(ACCEPT_LANGUAGE, LANGUAGE)
            .send()
            .await?;
        let status = response.status();

        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            let next =
                origin::next_hop_url(url, location, &self.settings.canonical_base_url)?;
            tracing::debug!(
                status = status.as_u16(),
                from = %origin::extract_domain(url),
                to = %next.url,
                "redirect"
            );
            return Ok(Hop::Redirect(next));
        }

        if !status.is_success() {
            return Err(ResolveError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(Hop::Page(response.text().await?))
    }

    /// Fetches the preview endpoint with `page_url` as the referrer.
    ///
    /// A body that is not JSON after prefix stripping is still returned; the
    /// structural matchers simply have nothing to read.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Http`]: network or TLS failure, or timeout.
    /// - [`ResolveError::UnexpectedStatus`]: any non-2xx status.
    pub(super) async fn fetch_preview(
        &self,
        url: &str,
        page_url: &str,
    ) -> Result<PreviewPayload, ResolveError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.identity.next_user_agent())
            .header(ACCEPT, PREVIEW_ACCEPT)
            .header(ACCEPT_LANGUAGE, LANGUAGE)
            .header(REFERER, page_url)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let (payload, parse_error) = PreviewPayload::parse(&body);
        if let Some(error) = parse_error {
            tracing::debug!(%error, "preview payload is not JSON, structured matchers skipped");
        }
        Ok(payload)
    }
}
