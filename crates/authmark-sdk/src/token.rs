//! Token set returned by a successful password authentication.

use std::collections::HashMap;

use crate::error::AuthError;
use crate::wire::AuthenticationResult;

/// Tokens obtained after a completed `USER_PASSWORD_AUTH` exchange.
///
/// A `TokenSet` is only ever constructed when the provider returned all
/// three artifacts; partial responses are surfaced as errors instead.
///
/// * `access_token`  – authorizes API calls on behalf of the user.
/// * `id_token`      – carries the user's identity claims.
/// * `refresh_token` – renews the session without re-sending credentials.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokenSet {
    /// Authorization token.
    pub access_token: String,
    /// Identity token.
    pub id_token: String,
    /// Session-renewal token.
    pub refresh_token: String,
}

impl TokenSet {
    /// Flatten into the key/value mapping handed to test scripts:
    /// exactly `AccessToken`, `IdToken` and `RefreshToken`.
    pub fn into_key_values(self) -> HashMap<String, String> {
        HashMap::from([
            ("AccessToken".to_string(), self.access_token),
            ("IdToken".to_string(), self.id_token),
            ("RefreshToken".to_string(), self.refresh_token),
        ])
    }
}

impl TryFrom<AuthenticationResult> for TokenSet {
    type Error = AuthError;

    /// Accept only complete results; a missing artifact means the flow
    /// did not finish and no partial mapping is produced.
    fn try_from(result: AuthenticationResult) -> Result<Self, Self::Error> {
        let missing = |field: &str| AuthError::IncompleteChallenge {
            challenge: None,
            reason: format!("authentication result is missing the {field}; the provider did not complete the token set"),
        };
        Ok(Self {
            access_token: result.access_token.ok_or_else(|| missing("access token"))?,
            id_token: result.id_token.ok_or_else(|| missing("identity token"))?,
            refresh_token: result.refresh_token.ok_or_else(|| missing("refresh token"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> AuthenticationResult {
        AuthenticationResult {
            access_token: Some("a1".into()),
            id_token: Some("i1".into()),
            refresh_token: Some("r1".into()),
            expires_in: Some(3600),
            token_type: Some("Bearer".into()),
        }
    }

    #[test]
    fn complete_result_converts() {
        let tokens = TokenSet::try_from(full_result()).unwrap();
        assert_eq!(tokens.access_token, "a1");
        assert_eq!(tokens.id_token, "i1");
        assert_eq!(tokens.refresh_token, "r1");
    }

    #[test]
    fn key_values_has_exactly_three_entries() {
        let map = TokenSet::try_from(full_result()).unwrap().into_key_values();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("AccessToken").map(String::as_str), Some("a1"));
        assert_eq!(map.get("IdToken").map(String::as_str), Some("i1"));
        assert_eq!(map.get("RefreshToken").map(String::as_str), Some("r1"));
    }

    #[test]
    fn each_missing_token_is_a_failure() {
        for strip in ["access", "id", "refresh"] {
            let mut result = full_result();
            match strip {
                "access" => result.access_token = None,
                "id" => result.id_token = None,
                _ => result.refresh_token = None,
            }
            let err = TokenSet::try_from(result).unwrap_err();
            assert!(matches!(err, AuthError::IncompleteChallenge { challenge: None, .. }));
        }
    }

    #[test]
    fn serializes_with_provider_key_names() {
        let json = serde_json::to_value(TokenSet {
            access_token: "a1".into(),
            id_token: "i1".into(),
            refresh_token: "r1".into(),
        })
        .unwrap();
        assert_eq!(json["AccessToken"], "a1");
        assert_eq!(json["IdToken"], "i1");
        assert_eq!(json["RefreshToken"], "r1");
    }
}
