//! Error types for rate limiting.

use thiserror::Error;

/// Misuse of the rate limiter registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RateLimitError {
    /// No limiter is registered under this name.
    #[error("no rate limiter named '{name}'")]
    UnknownLimiter { name: String },
}
