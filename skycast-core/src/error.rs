use thiserror::Error;

/// Failure kinds surfaced by the weather pipeline.
///
/// Every variant is terminal for the request it occurred in: nothing is
/// retried and no partial result is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied an empty (or all-whitespace) location key.
    #[error("Location must not be empty")]
    InvalidInput,

    /// No API key available; checked before any network call is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success status. `message` carries
    /// the provider's own error text when its body had one.
    #[error("Weather provider returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A response body could not be interpreted as the expected shape.
    #[error("Malformed provider response: {0}")]
    MalformedData(String),

    /// Network-level failure (DNS, connect, reset) as opposed to an
    /// error the provider reported itself.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
