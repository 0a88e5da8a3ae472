#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Tuning knobs for the resolution engine.
///
/// Worst-case wall-clock time for one resolution is roughly
/// `max_attempts * (request_timeout_secs * max_hops + backoff_cap_ms)`;
/// callers that need a hard deadline should wrap the call in their own timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub request_timeout_secs: u64,
    /// Outer attempts, including the first one.
    pub max_attempts: u32,
    /// Redirect hops allowed inside a single attempt.
    pub max_hops: usize,
    pub backoff_base_ms: u64,
    pub backoff_factor: f64,
    pub backoff_cap_ms: u64,
    /// Origin used when a redirect carries a feature identifier.
    pub canonical_base_url: String,
    /// Substrings of which at least one must appear in an input URL.
    pub allowed_hosts: Vec<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_attempts: 3,
            max_hops: 6,
            backoff_base_ms: 1_000,
            backoff_factor: 2.0,
            backoff_cap_ms: 8_000,
            canonical_base_url: "https://www.google.com".to_owned(),
            allowed_hosts: ["google.", "goo.gl", "g.co", "g.page"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub resolver: ResolverSettings,
}
