//! Client identity rotation.
//!
//! Every outbound request carries a `User-Agent` drawn from a small pool so
//! repeated attempts do not present one uniform fingerprint.

use rand::seq::IndexedRandom;

/// Desktop and mobile browser identities used for outbound requests.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
];

/// Supplies the `User-Agent` for the next outbound request.
pub trait IdentityRotator: Send + Sync {
    fn next_user_agent(&self) -> String;
}

/// Picks uniformly at random from [`USER_AGENT_POOL`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentity;

impl IdentityRotator for RandomIdentity {
    fn next_user_agent(&self) -> String {
        USER_AGENT_POOL
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENT_POOL[0])
            .to_owned()
    }
}

/// Always returns the same identity. Handy for deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentityRotator for FixedIdentity {
    fn next_user_agent(&self) -> String {
        self.0.clone()
    }
}
