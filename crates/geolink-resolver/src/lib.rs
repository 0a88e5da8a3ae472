pub mod backoff;
pub mod client;
pub mod coords;
pub mod error;
pub mod extract;
pub mod identity;
pub mod place_name;
pub mod types;

pub use backoff::{BackoffPolicy, Sleeper, TokioSleeper};
pub use client::Resolver;
pub use coords::{normalize, Coordinate};
pub use error::ResolveError;
pub use extract::{Confidence, ExtractionResult, Strategy};
pub use identity::{FixedIdentity, IdentityRotator, RandomIdentity};
pub use place_name::extract_place_name;
pub use types::{ResolutionOutcome, ResolutionRequest, ResolutionStatus, ResolveResponse};
