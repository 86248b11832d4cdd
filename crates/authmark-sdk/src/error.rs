//! SDK error types.
//!
//! [`AuthError`] is the single error type returned by every fallible
//! operation in the SDK.  It separates failures the provider reported
//! from failures that never reached the provider, and keeps the
//! incomplete-challenge case distinct from outright rejection.

/// Error type for all SDK operations.
///
/// Credentials (passwords, client secrets) never appear in any variant's
/// `Display` output.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid or missing configuration (e.g. empty region, bad endpoint).
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request never completed (DNS, TLS, connect, timeout).
    #[error("failed to initiate auth: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the authentication request.
    ///
    /// `code` carries the provider's error type (e.g.
    /// `NotAuthorizedException`), `message` its human-readable detail.
    #[error("failed to initiate auth: {code}: {message}")]
    Provider {
        /// Provider error type, or the HTTP status when none was given.
        code: String,
        /// Provider error detail.
        message: String,
    },

    /// The call succeeded at the transport level but the provider returned
    /// no completed token set.
    ///
    /// This is not a credential failure: the flow requires handling beyond
    /// a plain username/password exchange (an additional challenge, or the
    /// flow is disabled for the app client).
    #[error("authentication incomplete: {reason}")]
    IncompleteChallenge {
        /// Challenge the provider demanded, when it named one
        /// (e.g. `NEW_PASSWORD_REQUIRED`).
        challenge: Option<String>,
        /// Human-readable explanation.
        reason: String,
    },

    /// The provider's response body could not be decoded.
    #[error("malformed provider response: {0}")]
    Serialization(#[from] serde_json::Error),
}
