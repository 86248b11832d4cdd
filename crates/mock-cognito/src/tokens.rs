//! Token minting for the mock provider.
//!
//! Access and identity tokens are real HS256 JWTs so downstream code that
//! merely decodes them keeps working; the refresh token is opaque, as it
//! is with the real provider.  Nothing validates these tokens — the SDK
//! under test copies them verbatim.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::MockError;

const SIGNING_SECRET: &[u8] = b"mock-cognito-signing-key";
const ISSUER: &str = "https://mock-cognito.local";

#[derive(serde::Serialize)]
struct AccessClaims {
    sub: String,
    iss: String,
    client_id: String,
    token_use: String,
    username: String,
    jti: String,
    iat: i64,
    exp: i64,
}

#[derive(serde::Serialize)]
struct IdClaims {
    sub: String,
    iss: String,
    aud: String,
    token_use: String,
    #[serde(rename = "cognito:username")]
    username: String,
    iat: i64,
    exp: i64,
}

/// Mint a complete `AuthenticationResult` value for `username`.
///
/// Each call produces fresh tokens, mirroring the provider's behaviour of
/// minting per sign-in.
pub fn mint_token_set(username: &str, client_id: &str) -> Result<Value, MockError> {
    let now = Utc::now();
    let exp = now + Duration::hours(1);
    let sub = Uuid::new_v4().to_string();
    let key = EncodingKey::from_secret(SIGNING_SECRET);
    let minting = |e: jsonwebtoken::errors::Error| MockError::TokenMinting(e.to_string());

    let access_token = encode(
        &Header::default(),
        &AccessClaims {
            sub: sub.clone(),
            iss: ISSUER.to_string(),
            client_id: client_id.to_string(),
            token_use: "access".to_string(),
            username: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        },
        &key,
    )
    .map_err(minting)?;

    let id_token = encode(
        &Header::default(),
        &IdClaims {
            sub,
            iss: ISSUER.to_string(),
            aud: client_id.to_string(),
            token_use: "id".to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        },
        &key,
    )
    .map_err(minting)?;

    let refresh_token = BASE64.encode(Uuid::new_v4().as_bytes());

    Ok(json!({
        "AccessToken": access_token,
        "IdToken": id_token,
        "RefreshToken": refresh_token,
        "ExpiresIn": 3600,
        "TokenType": "Bearer",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_set_is_complete_and_non_empty() {
        let set = mint_token_set("bob", "app-1").unwrap();
        for key in ["AccessToken", "IdToken", "RefreshToken"] {
            assert!(!set[key].as_str().unwrap().is_empty());
        }
        assert_eq!(set["TokenType"], "Bearer");
        assert_eq!(set["ExpiresIn"], 3600);
    }

    #[test]
    fn tokens_are_fresh_per_call() {
        let first = mint_token_set("bob", "app-1").unwrap();
        let second = mint_token_set("bob", "app-1").unwrap();
        assert_ne!(first["RefreshToken"], second["RefreshToken"]);
        assert_ne!(first["AccessToken"], second["AccessToken"]);
    }

    #[test]
    fn jwts_have_three_segments() {
        let set = mint_token_set("bob", "app-1").unwrap();
        for key in ["AccessToken", "IdToken"] {
            let parts = set[key].as_str().unwrap().split('.').count();
            assert_eq!(parts, 3, "{key} must be a JWT");
        }
    }
}
