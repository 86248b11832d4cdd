//! Regional client handle for the identity provider.
//!
//! [`CognitoClient`] is the bound handle produced by the connector: it
//! owns a pooled HTTP client and the resolved endpoint for one region.
//! Connecting performs no network I/O; the first round trip happens on
//! the first [`authenticate`](CognitoClient::authenticate) call.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use authmark_sdk::CognitoClient;
//!
//! # async fn run() -> Result<(), authmark_sdk::AuthError> {
//! let client = CognitoClient::connect("us-east-1")?;
//! let tokens = client.authenticate("bob", "pw123", "app-1").await?;
//!
//! println!("access token: {}", tokens.access_token);
//! # Ok(())
//! # }
//! ```

use crate::config::{AuthOptions, ConnectorConfig};
use crate::error::AuthError;
use crate::token::TokenSet;
use crate::wire::{
    InitiateAuthRequest, InitiateAuthResponse, ProviderErrorBody, CONTENT_TYPE_AMZ_JSON,
    HEADER_TARGET, TARGET_INITIATE_AUTH,
};

/// A client bound to one regional provider endpoint.
///
/// Cheap to clone and safe to share: concurrent `authenticate` calls
/// multiplex over the pooled transport, and the handle itself holds no
/// mutable state.  There is no explicit teardown.
#[derive(Debug, Clone)]
pub struct CognitoClient {
    http: reqwest::Client,
    endpoint: String,
    region: String,
}

impl CognitoClient {
    /// Connect to the provider for `region` using ambient configuration
    /// (see [`ConnectorConfig::from_env`]).
    ///
    /// Lazy: resolves configuration and builds the transport, but sends
    /// nothing.  An unresolvable configuration (empty region, malformed
    /// endpoint override) fails here with [`AuthError::Config`]; a region
    /// that merely does not exist is only discovered on the first call.
    pub fn connect(region: &str) -> Result<Self, AuthError> {
        Self::with_config(ConnectorConfig::from_env(region))
    }

    /// Connect with explicit configuration.
    ///
    /// This is the seam tests and local runs use to point the client at a
    /// mock provider instead of the regional endpoint.
    pub fn with_config(config: ConnectorConfig) -> Result<Self, AuthError> {
        let endpoint = config.endpoint_url()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AuthError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            region: config.region,
        })
    }

    /// The region this handle is bound to.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The resolved endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Authenticate `username` against the app client `client_id` with a
    /// single `USER_PASSWORD_AUTH` exchange.
    ///
    /// Returns the completed [`TokenSet`] or one of:
    ///
    /// * [`AuthError::Http`] / [`AuthError::Provider`] — the request
    ///   failed in transit or the provider rejected it (bad credentials,
    ///   throttling, disabled flow).  Provider detail is preserved;
    ///   the submitted credentials are not echoed.
    /// * [`AuthError::IncompleteChallenge`] — the provider answered but
    ///   demands a further challenge, so no completed token set exists.
    ///
    /// Nothing is retried; deadlines and cancellation are the caller's
    /// (drop the future or wrap it in a timeout).
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<TokenSet, AuthError> {
        self.authenticate_with_options(username, password, client_id, &AuthOptions::default())
            .await
    }

    /// [`authenticate`](Self::authenticate) with explicit optional
    /// parameters (client metadata, app-client secret).
    pub async fn authenticate_with_options(
        &self,
        username: &str,
        password: &str,
        client_id: &str,
        options: &AuthOptions,
    ) -> Result<TokenSet, AuthError> {
        let request = InitiateAuthRequest::user_password(username, password, client_id, options)?;

        tracing::debug!(region = %self.region, client_id, "initiating password auth");

        let response = self
            .http
            .post(&self.endpoint)
            .header("content-type", CONTENT_TYPE_AMZ_JSON)
            .header(HEADER_TARGET, TARGET_INITIATE_AUTH)
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = provider_error(status, &text);
            tracing::warn!(region = %self.region, client_id, %status, "provider rejected auth request");
            return Err(err);
        }

        let body: InitiateAuthResponse = response.json().await?;
        match body.authentication_result {
            Some(result) => TokenSet::try_from(result),
            None => Err(challenge_error(body.challenge_name)),
        }
    }
}

/// Map a non-2xx provider response onto [`AuthError::Provider`],
/// preserving the provider's error type and message when the body is the
/// usual `{"__type": …, "message": …}` shape.
fn provider_error(status: reqwest::StatusCode, body: &str) -> AuthError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) if parsed.code.is_some() || parsed.message.is_some() => AuthError::Provider {
            code: parsed.code.unwrap_or_else(|| status.to_string()),
            message: parsed
                .message
                .unwrap_or_else(|| "provider returned no detail".to_string()),
        },
        _ => AuthError::Provider {
            code: status.to_string(),
            message: body.trim().to_string(),
        },
    }
}

/// Build the incomplete-challenge error for a 200 without a token set.
fn challenge_error(challenge: Option<String>) -> AuthError {
    let reason = match &challenge {
        Some(name) => format!(
            "provider requires additional challenge {name}; plain username/password exchange cannot complete this sign-in"
        ),
        None => "authentication result was empty; check that the password flow is enabled for \
                 this app client or whether additional challenges are required"
            .to_string(),
    };
    AuthError::IncompleteChallenge { challenge, reason }
}
