//! Error types for the mock provider.
//!
//! [`MockError`] unifies all rejection paths and implements
//! [`axum::response::IntoResponse`] so handlers can return
//! `Result<…, MockError>` directly.  Responses carry the provider's
//! `{"__type": …, "message": …}` error body shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Rejections the mock provider can return.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Unknown user or wrong password.
    #[error("Incorrect username or password.")]
    NotAuthorized,

    /// A `SECRET_HASH` was sent but does not match the client secret.
    #[error("Unable to verify secret hash for client {0}")]
    SecretHashMismatch(String),

    /// The app client has a secret but the request carried no hash.
    #[error("Client is configured with secret but SECRET_HASH was not received")]
    MissingSecretHash,

    /// No app client registered under this id.
    #[error("User pool client {0} does not exist.")]
    ResourceNotFound(String),

    /// A required request field was absent.
    #[error("Missing required parameter {0}")]
    MissingParameter(String),

    /// Any flow other than `USER_PASSWORD_AUTH`.
    #[error("Unsupported auth flow {0}")]
    UnsupportedFlow(String),

    /// The `x-amz-target` header named no action this mock implements.
    #[error("Unknown operation {0}")]
    UnknownOperation(String),

    /// The request body was not valid JSON.
    #[error("Could not deserialize request body: {0}")]
    MalformedBody(String),

    /// Signing a token failed.
    #[error("Token minting failed: {0}")]
    TokenMinting(String),
}

impl MockError {
    /// Provider error type for the `__type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NotAuthorized | Self::SecretHashMismatch(_) | Self::MissingSecretHash => {
                "NotAuthorizedException"
            }
            Self::ResourceNotFound(_) => "ResourceNotFoundException",
            Self::MissingParameter(_) | Self::UnsupportedFlow(_) => "InvalidParameterException",
            Self::UnknownOperation(_) => "UnknownOperationException",
            Self::MalformedBody(_) => "SerializationException",
            Self::TokenMinting(_) => "InternalErrorException",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::TokenMinting(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, code, message) = (self.status(), self.type_name(), self.to_string());
        tracing::debug!(%status, code, error = %message, "mock rejecting request");
        (status, Json(json!({ "__type": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_use_provider_error_types() {
        assert_eq!(MockError::NotAuthorized.type_name(), "NotAuthorizedException");
        assert_eq!(
            MockError::MissingSecretHash.type_name(),
            "NotAuthorizedException"
        );
        assert_eq!(
            MockError::ResourceNotFound("app".into()).type_name(),
            "ResourceNotFoundException"
        );
        assert_eq!(
            MockError::UnsupportedFlow("CUSTOM_AUTH".into()).type_name(),
            "InvalidParameterException"
        );
    }

    #[test]
    fn rejections_are_bad_requests() {
        let response = MockError::NotAuthorized.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn minting_failures_are_server_errors() {
        let response = MockError::TokenMinting("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
