//! Wire types for the provider's `InitiateAuth` action.
//!
//! Cognito speaks `application/x-amz-json-1.1`: a POST to the regional
//! endpoint with an `X-Amz-Target` header naming the action and a JSON
//! body.  Only the fields this SDK touches are modelled; everything else
//! in the provider's responses is ignored.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::AuthOptions;
use crate::error::AuthError;

/// Content type for all provider calls.
pub const CONTENT_TYPE_AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Header naming the action to invoke.
pub const HEADER_TARGET: &str = "x-amz-target";

/// Target value for the password-auth action.
pub const TARGET_INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

/// The single auth flow this SDK speaks.
pub const FLOW_USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

/// Body of an `InitiateAuth` call.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthRequest {
    /// Always [`FLOW_USER_PASSWORD_AUTH`].
    pub auth_flow: String,
    /// `USERNAME`, `PASSWORD` and, for confidential clients, `SECRET_HASH`.
    pub auth_parameters: HashMap<String, String>,
    /// App client id of the registered application.
    pub client_id: String,
    /// Request-tagging metadata, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<HashMap<String, String>>,
}

impl InitiateAuthRequest {
    /// Build a password-auth request for `username` against `client_id`.
    ///
    /// When `options` carries a client secret, the matching `SECRET_HASH`
    /// parameter is computed and included.
    pub fn user_password(
        username: &str,
        password: &str,
        client_id: &str,
        options: &AuthOptions,
    ) -> Result<Self, AuthError> {
        let mut auth_parameters = HashMap::new();
        auth_parameters.insert("USERNAME".to_string(), username.to_string());
        auth_parameters.insert("PASSWORD".to_string(), password.to_string());
        if let Some(secret) = &options.client_secret {
            auth_parameters.insert(
                "SECRET_HASH".to_string(),
                secret_hash(secret, username, client_id)?,
            );
        }

        let client_metadata = if options.client_metadata.is_empty() {
            None
        } else {
            Some(options.client_metadata.clone())
        };

        Ok(Self {
            auth_flow: FLOW_USER_PASSWORD_AUTH.to_string(),
            auth_parameters,
            client_id: client_id.to_string(),
            client_metadata,
        })
    }
}

/// Response body of a successful (HTTP 200) `InitiateAuth` call.
///
/// `authentication_result` is absent when the provider demands a further
/// challenge; `challenge_name` then says which one.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthResponse {
    /// Completed token set, when the flow finished in one step.
    pub authentication_result: Option<AuthenticationResult>,
    /// Challenge demanded instead of a token set, when any.
    pub challenge_name: Option<String>,
}

/// Token material inside a completed response.
///
/// All fields are optional on the wire; completeness is enforced when
/// converting into a [`crate::TokenSet`].
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    /// Authorization artifact for API calls.
    pub access_token: Option<String>,
    /// Identity-claims artifact.
    pub id_token: Option<String>,
    /// Session-renewal artifact.
    pub refresh_token: Option<String>,
    /// Access-token lifetime in seconds.
    pub expires_in: Option<u32>,
    /// Usually `Bearer`.
    pub token_type: Option<String>,
}

/// Error body the provider returns on a non-2xx response.
#[derive(Debug, serde::Deserialize)]
pub struct ProviderErrorBody {
    /// Provider error type, e.g. `NotAuthorizedException`.
    #[serde(rename = "__type")]
    pub code: Option<String>,
    /// Human-readable detail.
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

/// Compute the `SECRET_HASH` auth parameter:
/// `base64(HMAC-SHA256(client_secret, username ‖ client_id))`.
pub fn secret_hash(
    client_secret: &str,
    username: &str,
    client_id: &str,
) -> Result<String, AuthError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(client_secret.as_bytes())
        .map_err(|e| AuthError::Config(format!("invalid client secret: {e}")))?;
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_provider_field_names() {
        let req = InitiateAuthRequest::user_password("bob", "pw123", "app-1", &AuthOptions::new())
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["AuthFlow"], "USER_PASSWORD_AUTH");
        assert_eq!(json["ClientId"], "app-1");
        assert_eq!(json["AuthParameters"]["USERNAME"], "bob");
        assert_eq!(json["AuthParameters"]["PASSWORD"], "pw123");
        // no metadata, no secret: neither field on the wire
        assert!(json["AuthParameters"].get("SECRET_HASH").is_none());
        assert!(json.get("ClientMetadata").is_none());
    }

    #[test]
    fn metadata_and_secret_are_forwarded() {
        let opts = AuthOptions::new()
            .with_metadata("scenario", "smoke")
            .with_client_secret("shhh-secret");
        let req = InitiateAuthRequest::user_password("bob", "pw123", "app-1", &opts).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ClientMetadata"]["scenario"], "smoke");
        assert_eq!(
            json["AuthParameters"]["SECRET_HASH"],
            "lAgxvw9gk369RJAROiSGarAicmmc9FyjysjBq8QuXLc="
        );
    }

    #[test]
    fn secret_hash_matches_known_vectors() {
        assert_eq!(
            secret_hash("secret", "username", "clientid").unwrap(),
            "nHX60UMb/IiDNDmIUm5R+B7D6ufsjd4QNse0tO7D9w8="
        );
        assert_eq!(
            secret_hash(
                "4tfe2l486as87pbhr4kvd7etqnj3rrxnkfcpfvgnhvfqvpmn89p",
                "alice",
                "1f95cgs7e0gqu7h5nl2dt1qvpc"
            )
            .unwrap(),
            "qipvtM1dDkyycpP5M7+MObR4ptVLeFDmNr/hRJcoBcQ="
        );
    }

    #[test]
    fn complete_response_parses() {
        let body = r#"{
            "AuthenticationResult": {
                "AccessToken": "a1",
                "IdToken": "i1",
                "RefreshToken": "r1",
                "ExpiresIn": 3600,
                "TokenType": "Bearer"
            }
        }"#;
        let res: InitiateAuthResponse = serde_json::from_str(body).unwrap();
        let result = res.authentication_result.unwrap();
        assert_eq!(result.access_token.as_deref(), Some("a1"));
        assert_eq!(result.id_token.as_deref(), Some("i1"));
        assert_eq!(result.refresh_token.as_deref(), Some("r1"));
        assert!(res.challenge_name.is_none());
    }

    #[test]
    fn challenge_response_parses_without_result() {
        let body = r#"{
            "ChallengeName": "NEW_PASSWORD_REQUIRED",
            "ChallengeParameters": {},
            "Session": "opaque"
        }"#;
        let res: InitiateAuthResponse = serde_json::from_str(body).unwrap();
        assert!(res.authentication_result.is_none());
        assert_eq!(res.challenge_name.as_deref(), Some("NEW_PASSWORD_REQUIRED"));
    }

    #[test]
    fn error_body_parses_both_message_spellings() {
        let lower: ProviderErrorBody = serde_json::from_str(
            r#"{"__type":"NotAuthorizedException","message":"Incorrect username or password."}"#,
        )
        .unwrap();
        assert_eq!(lower.code.as_deref(), Some("NotAuthorizedException"));
        assert_eq!(
            lower.message.as_deref(),
            Some("Incorrect username or password.")
        );

        let upper: ProviderErrorBody =
            serde_json::from_str(r#"{"__type":"ThrottlingException","Message":"Rate exceeded"}"#)
                .unwrap();
        assert_eq!(upper.message.as_deref(), Some("Rate exceeded"));
    }
}
