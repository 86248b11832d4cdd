//! Connector configuration.
//!
//! [`ConnectorConfig`] carries everything needed to bind a client to one
//! region.  Ambient lookup (environment variables) is one concrete,
//! swappable source via [`ConnectorConfig::from_env`]; tests and local
//! runs against a mock provider construct the config explicitly and set
//! the endpoint override instead.

use std::collections::HashMap;

use crate::error::AuthError;

/// Environment variable consulted by [`ConnectorConfig::from_env`] for a
/// non-default provider endpoint (e.g. a local mock).
pub const ENDPOINT_ENV: &str = "COGNITO_ENDPOINT_URL";

/// Configuration for one regional provider connection.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Region identifier (e.g. `us-east-1`).  Selects the default
    /// endpoint; not validated locally beyond being non-empty.
    pub region: String,
    /// Full endpoint URL override.  When `None` the regional Cognito
    /// endpoint `https://cognito-idp.{region}.amazonaws.com/` is used.
    pub endpoint: Option<String>,
}

impl ConnectorConfig {
    /// Explicit configuration for `region`, default endpoint.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
        }
    }

    /// Ambient configuration source: `region` from the caller, endpoint
    /// override from [`ENDPOINT_ENV`] when set.
    pub fn from_env(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: std::env::var(ENDPOINT_ENV).ok(),
        }
    }

    /// Replace the endpoint with an explicit URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Resolve the endpoint URL this configuration points at.
    ///
    /// Fails with [`AuthError::Config`] when the region is empty or the
    /// override is not an HTTP(S) URL.  Anything syntactically plausible
    /// is passed through; a bogus region is only discovered when the
    /// first authentication call fails to resolve it.
    pub fn endpoint_url(&self) -> Result<String, AuthError> {
        if let Some(endpoint) = &self.endpoint {
            if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                return Ok(endpoint.clone());
            }
            return Err(AuthError::Config(format!(
                "endpoint override is not an HTTP(S) URL: {endpoint}"
            )));
        }
        let region = self.region.trim();
        if region.is_empty() {
            return Err(AuthError::Config("region must not be empty".into()));
        }
        Ok(format!("https://cognito-idp.{region}.amazonaws.com/"))
    }
}

/// Optional parameters for an authentication call.
///
/// Both fields were declared but silently dropped by an earlier rendition
/// of this adapter; here they are forwarded for real.
#[derive(Debug, Clone, Default)]
pub struct AuthOptions {
    /// Arbitrary request-tagging metadata forwarded verbatim to the
    /// provider as `ClientMetadata`.
    pub client_metadata: HashMap<String, String>,
    /// App-client secret, required only when the target app client is
    /// configured with one.  When present a `SECRET_HASH` auth parameter
    /// is computed and sent alongside the credentials.
    pub client_secret: Option<String>,
}

impl AuthOptions {
    /// Empty options: no metadata, no client secret.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.client_metadata.insert(key.into(), value.into());
        self
    }

    /// Set the app-client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }
}
