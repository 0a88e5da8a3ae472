//! A single outer attempt: walk redirects until a page is reached, then run
//! the strategy chain against it.

use crate::backoff::Sleeper;
use crate::error::ResolveError;
use crate::extract::{
    find_preview_link, first_match, ExtractionResult, DIRECT_MATCHERS, INLINE_MATCHERS,
    PAYLOAD_MATCHERS, URL_MATCHERS,
};
use crate::identity::IdentityRotator;
use crate::place_name::extract_place_name;
use crate::types::ResolutionRequest;

use super::walker::Hop;
use super::Resolver;

/// State owned by one outer attempt and dropped when it ends.
#[derive(Debug)]
pub(super) struct AttemptState {
    pub(super) current_url: String,
    pub(super) hops: usize,
    pub(super) best_place_name: Option<String>,
}

impl AttemptState {
    pub(super) fn new(url: &str) -> Self {
        Self {
            current_url: url.to_owned(),
            hops: 0,
            best_place_name: None,
        }
    }

    /// Later names replace earlier ones; `None` never clears.
    pub(super) fn observe(&mut self, name: Option<String>) {
        if let Some(name) = name {
            self.best_place_name = Some(name);
        }
    }
}

impl<I: IdentityRotator, S: Sleeper> Resolver<I, S> {
    /// Runs one attempt and folds whatever place name it saw into
    /// `best_place_name`, on every exit path.
    ///
    /// # Errors
    ///
    /// Propagates the error that ended the attempt. Callers decide between
    /// retrying and aborting with [`ResolveError::is_retriable`].
    pub(super) async fn run_attempt(
        &self,
        request: &ResolutionRequest,
        best_place_name: &mut Option<String>,
    ) -> Result<Option<ExtractionResult>, ResolveError> {
        let mut state = AttemptState::new(request.url());
        let result = self.walk(&mut state).await;
        if let Some(name) = state.best_place_name {
            *best_place_name = Some(name);
        }
        result
    }

    async fn walk(
        &self,
        state: &mut AttemptState,
    ) -> Result<Option<ExtractionResult>, ResolveError> {
        while state.hops < self.settings.max_hops {
            state.hops += 1;
            tracing::debug!(hop = state.hops, url = %state.current_url, "fetching");
            match self.step(&state.current_url).await? {
                Hop::Redirect(next) => {
                    state.observe(extract_place_name(&next.target, None));
                    if next.url != next.target {
                        state.observe(extract_place_name(&next.url, None));
                    }
                    state.current_url = next.url;
                }
                Hop::Page(body) => {
                    let mut found = self.extract_page(state, &body).await?;
                    if let Some(found) = found.as_mut() {
                        found.place_name.clone_from(&state.best_place_name);
                    }
                    return Ok(found);
                }
            }
        }

        tracing::debug!(
            max_hops = self.settings.max_hops,
            "hop limit reached before a page was served"
        );
        Ok(None)
    }

    /// Runs the strategy chain against a fetched page.
    ///
    /// A failed preview fetch is logged and skipped so the inline and URL
    /// strategies still get their turn.
    async fn extract_page(
        &self,
        state: &mut AttemptState,
        html: &str,
    ) -> Result<Option<ExtractionResult>, ResolveError> {
        let name = extract_place_name(&state.current_url, Some(html));
        state.observe(name);

        if let Some(found) = first_match(DIRECT_MATCHERS, html) {
            return Ok(Some(found));
        }

        if let Some(preview_url) = find_preview_link(html, &state.current_url)? {
            tracing::debug!(url = %preview_url, "fetching preview payload");
            match self.fetch_preview(&preview_url, &state.current_url).await {
                Ok(payload) => {
                    state.observe(payload.place_name());
                    if let Some(found) = first_match(PAYLOAD_MATCHERS, &payload) {
                        return Ok(Some(found));
                    }
                }
                Err(error) if error.is_retriable() => {
                    tracing::warn!(%error, "preview fetch failed, trying inline strategies");
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(found) = first_match(INLINE_MATCHERS, html) {
            return Ok(Some(found));
        }
        Ok(first_match(URL_MATCHERS, state.current_url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_keeps_latest_name() {
        let mut state = AttemptState::new("https://goo.gl/x");
        state.observe(Some("taipei".to_owned()));
        state.observe(Some("Taipei 101".to_owned()));
        assert_eq!(state.best_place_name.as_deref(), Some("Taipei 101"));
    }

    #[test]
    fn observe_none_never_clears() {
        let mut state = AttemptState::new("https://goo.gl/x");
        state.observe(Some("Taipei 101".to_owned()));
        state.observe(None);
        assert_eq!(state.best_place_name.as_deref(), Some("Taipei 101"));
    }
}
