use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid input URL \"{url}\": {reason}")]
    InvalidInput { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not build URL from \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ResolveError {
    /// Returns `true` if the error should end the current attempt and hand
    /// control back to the retry loop.
    ///
    /// Retriable:
    /// - [`ResolveError::Http`]: timeout, connection reset, TLS failure.
    /// - [`ResolveError::UnexpectedStatus`]: non-2xx/3xx mid-chain, including
    ///   anti-automation responses that a fresh identity may get past.
    ///
    /// Everything else is either rejected up front ([`ResolveError::InvalidInput`]),
    /// recovered inside the strategy chain ([`ResolveError::Deserialize`]), or an
    /// unexpected fault that ends the whole resolution.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ResolveError::Http(_) | ResolveError::UnexpectedStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_is_retriable() {
        let err = ResolveError::UnexpectedStatus {
            status: 429,
            url: "https://maps.app.goo.gl/abc".to_owned(),
        };
        assert!(err.is_retriable());
    }

    #[test]
    fn invalid_url_is_not_retriable() {
        let err = ResolveError::InvalidUrl {
            url: "::".to_owned(),
            reason: "relative URL without a base".to_owned(),
        };
        assert!(!err.is_retriable());
    }

    #[test]
    fn deserialize_is_not_retriable() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ResolveError::Deserialize {
            context: "preview payload".to_owned(),
            source,
        };
        assert!(!err.is_retriable());
    }

    #[test]
    fn invalid_input_is_not_retriable() {
        let err = ResolveError::InvalidInput {
            url: String::new(),
            reason: "missing url".to_owned(),
        };
        assert!(!err.is_retriable());
    }
}
