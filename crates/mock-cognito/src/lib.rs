//! # mock-cognito
//!
//! In-process mock of the Cognito `InitiateAuth` endpoint, for SDK tests
//! and local load-test runs without a real user pool.
//!
//! The mock serves `POST /`, dispatching on the `x-amz-target` header the
//! way the real provider does.  It verifies the app client, the optional
//! `SECRET_HASH`, and the username/password pair against a configured
//! [`MockPool`], then either mints a full token set, demands a configured
//! challenge, or rejects with a provider-shaped error body.
//!
//! Every request body is recorded on the shared [`MockState`] so tests
//! can assert what actually reached the wire.
//!
//! ```rust,no_run
//! use mock_cognito::MockPool;
//!
//! # async fn run() {
//! let pool = MockPool::new().with_client("app-1").with_user("bob", "pw123");
//! let app = mock_cognito::router(pool);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod tokens;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

pub use error::MockError;

const TARGET_INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const FLOW_USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

/// One registered user.
#[derive(Debug, Clone)]
struct MockUser {
    password: String,
    /// Challenge to demand instead of a token set, when set.
    challenge: Option<String>,
}

/// One registered app client.
#[derive(Debug, Clone)]
struct MockAppClient {
    /// Client secret; when set, requests must carry a matching `SECRET_HASH`.
    secret: Option<String>,
}

/// Users and app clients the mock accepts.
#[derive(Debug, Clone, Default)]
pub struct MockPool {
    users: HashMap<String, MockUser>,
    clients: HashMap<String, MockAppClient>,
}

impl MockPool {
    /// Empty pool; rejects everything until populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a public app client (no secret).
    #[must_use]
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.clients.insert(client_id.into(), MockAppClient { secret: None });
        self
    }

    /// Register a confidential app client that requires a `SECRET_HASH`.
    #[must_use]
    pub fn with_confidential_client(
        mut self,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.clients.insert(
            client_id.into(),
            MockAppClient {
                secret: Some(secret.into()),
            },
        );
        self
    }

    /// Register a user that authenticates in one step.
    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(
            username.into(),
            MockUser {
                password: password.into(),
                challenge: None,
            },
        );
        self
    }

    /// Register a user whose sign-in stops at `challenge`
    /// (e.g. `NEW_PASSWORD_REQUIRED`).
    #[must_use]
    pub fn with_challenged_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        challenge: impl Into<String>,
    ) -> Self {
        self.users.insert(
            username.into(),
            MockUser {
                password: password.into(),
                challenge: Some(challenge.into()),
            },
        );
        self
    }
}

/// Shared handler state: the pool plus a record of every request body.
#[derive(Debug)]
pub struct MockState {
    pool: MockPool,
    requests: Mutex<Vec<Value>>,
}

impl MockState {
    /// The most recent request body, if any.
    pub fn last_request(&self) -> Option<Value> {
        self.requests.lock().ok()?.last().cloned()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

/// Build the mock router for `pool`.
pub fn router(pool: MockPool) -> Router {
    router_with_state(pool).0
}

/// Build the mock router and keep a handle onto its [`MockState`] for
/// asserting on recorded requests.
pub fn router_with_state(pool: MockPool) -> (Router, Arc<MockState>) {
    let state = Arc::new(MockState {
        pool,
        requests: Mutex::new(Vec::new()),
    });
    let router = Router::new()
        .route("/", post(dispatch))
        .with_state(state.clone());
    (router, state)
}

/// `POST /` — dispatch on `x-amz-target` like the real endpoint.
///
/// The body is read raw because the provider's content type is
/// `application/x-amz-json-1.1`, which axum's JSON extractor refuses.
async fn dispatch(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, MockError> {
    let target = headers
        .get("x-amz-target")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body: Value =
        serde_json::from_slice(&body).map_err(|e| MockError::MalformedBody(e.to_string()))?;
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(body.clone());
    }
    tracing::debug!(%target, "mock request");

    match target.as_str() {
        TARGET_INITIATE_AUTH => initiate_auth(&state, &body),
        other => Err(MockError::UnknownOperation(other.to_string())),
    }
}

fn initiate_auth(state: &MockState, body: &Value) -> Result<Json<Value>, MockError> {
    let client_id = body["ClientId"]
        .as_str()
        .ok_or_else(|| MockError::MissingParameter("ClientId".into()))?;

    let flow = body["AuthFlow"].as_str().unwrap_or_default();
    if flow != FLOW_USER_PASSWORD_AUTH {
        return Err(MockError::UnsupportedFlow(flow.to_string()));
    }

    let params = body["AuthParameters"]
        .as_object()
        .ok_or_else(|| MockError::MissingParameter("AuthParameters".into()))?;
    let username = params
        .get("USERNAME")
        .and_then(Value::as_str)
        .ok_or_else(|| MockError::MissingParameter("USERNAME".into()))?;
    let password = params
        .get("PASSWORD")
        .and_then(Value::as_str)
        .ok_or_else(|| MockError::MissingParameter("PASSWORD".into()))?;

    let app_client = state
        .pool
        .clients
        .get(client_id)
        .ok_or_else(|| MockError::ResourceNotFound(client_id.to_string()))?;

    if let Some(secret) = &app_client.secret {
        let expected = expected_secret_hash(secret, username, client_id);
        match params.get("SECRET_HASH").and_then(Value::as_str) {
            None => return Err(MockError::MissingSecretHash),
            Some(hash) if hash != expected => {
                return Err(MockError::SecretHashMismatch(client_id.to_string()));
            }
            Some(_) => {}
        }
    }

    let user = state
        .pool
        .users
        .get(username)
        .filter(|u| u.password == password)
        .ok_or(MockError::NotAuthorized)?;

    if let Some(challenge) = &user.challenge {
        // Transport-level success without a completed token set.
        return Ok(Json(json!({
            "ChallengeName": challenge,
            "ChallengeParameters": {},
            "Session": Uuid::new_v4().to_string(),
        })));
    }

    Ok(Json(json!({
        "AuthenticationResult": tokens::mint_token_set(username, client_id)?,
    })))
}

/// `base64(HMAC-SHA256(secret, username ‖ client_id))`, same construction
/// the real provider verifies.
fn expected_secret_hash(secret: &str, username: &str, client_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(pool: MockPool) -> MockState {
        MockState {
            pool,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request(username: &str, password: &str, client_id: &str) -> Value {
        json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "AuthParameters": { "USERNAME": username, "PASSWORD": password },
            "ClientId": client_id,
        })
    }

    #[test]
    fn valid_credentials_yield_a_full_token_set() {
        let state = state_for(MockPool::new().with_client("app-1").with_user("bob", "pw123"));
        let Json(body) = initiate_auth(&state, &request("bob", "pw123", "app-1")).unwrap();
        let result = &body["AuthenticationResult"];
        for key in ["AccessToken", "IdToken", "RefreshToken"] {
            assert!(!result[key].as_str().unwrap().is_empty());
        }
    }

    #[test]
    fn wrong_password_is_not_authorized() {
        let state = state_for(MockPool::new().with_client("app-1").with_user("bob", "pw123"));
        let err = initiate_auth(&state, &request("bob", "nope", "app-1")).unwrap_err();
        assert!(matches!(err, MockError::NotAuthorized));
    }

    #[test]
    fn unknown_client_is_resource_not_found() {
        let state = state_for(MockPool::new().with_user("bob", "pw123"));
        let err = initiate_auth(&state, &request("bob", "pw123", "ghost")).unwrap_err();
        assert!(matches!(err, MockError::ResourceNotFound(_)));
    }

    #[test]
    fn non_password_flow_is_rejected() {
        let state = state_for(MockPool::new().with_client("app-1").with_user("bob", "pw123"));
        let mut body = request("bob", "pw123", "app-1");
        body["AuthFlow"] = json!("REFRESH_TOKEN_AUTH");
        let err = initiate_auth(&state, &body).unwrap_err();
        assert!(matches!(err, MockError::UnsupportedFlow(_)));
    }

    #[test]
    fn challenged_user_gets_no_token_set() {
        let state = state_for(
            MockPool::new()
                .with_client("app-1")
                .with_challenged_user("carol", "pw123", "NEW_PASSWORD_REQUIRED"),
        );
        let Json(body) = initiate_auth(&state, &request("carol", "pw123", "app-1")).unwrap();
        assert!(body.get("AuthenticationResult").is_none());
        assert_eq!(body["ChallengeName"], "NEW_PASSWORD_REQUIRED");
    }

    #[test]
    fn confidential_client_requires_a_matching_hash() {
        let state = state_for(
            MockPool::new()
                .with_confidential_client("app-1", "shhh-secret")
                .with_user("bob", "pw123"),
        );

        let err = initiate_auth(&state, &request("bob", "pw123", "app-1")).unwrap_err();
        assert!(matches!(err, MockError::MissingSecretHash));

        let mut body = request("bob", "pw123", "app-1");
        body["AuthParameters"]["SECRET_HASH"] = json!("bogus");
        let err = initiate_auth(&state, &body).unwrap_err();
        assert!(matches!(err, MockError::SecretHashMismatch(_)));

        // Precomputed for ("shhh-secret", "bob", "app-1").
        body["AuthParameters"]["SECRET_HASH"] =
            json!("lAgxvw9gk369RJAROiSGarAicmmc9FyjysjBq8QuXLc=");
        assert!(initiate_auth(&state, &body).is_ok());
    }

    #[test]
    fn expected_hash_matches_known_vector() {
        assert_eq!(
            expected_secret_hash("secret", "username", "clientid"),
            "nHX60UMb/IiDNDmIUm5R+B7D6ufsjd4QNse0tO7D9w8="
        );
    }
}
