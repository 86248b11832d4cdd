//! # authmark SDK
//!
//! Password-authentication adapter for load testing against an AWS
//! Cognito user pool.  A test driver opens a regional client, submits a
//! `USER_PASSWORD_AUTH` exchange and receives the three session tokens
//! as a simple key/value result.
//!
//! The SDK provides:
//!
//! * [`CognitoClient`] — regional client handle; connecting is lazy and
//!   the first network round trip happens on the first authenticate call.
//! * [`ConnectorConfig`] / [`AuthOptions`] — explicit configuration, with
//!   ambient (environment) lookup as one swappable source.
//! * [`TokenSet`] — the completed access / identity / refresh token set.
//! * [`AuthError`] — unified error type for all SDK operations.
//!
//! Everything below the wire call (pooling, TLS, DNS) is delegated to the
//! HTTP client; the SDK adds no retries, caching or challenge handling.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use authmark_sdk::CognitoClient;
//!
//! # async fn run() -> Result<(), authmark_sdk::AuthError> {
//! let client = CognitoClient::connect("us-east-1")?;
//! let tokens = client.authenticate("bob", "pw123", "app-1").await?;
//!
//! for (kind, token) in tokens.into_key_values() {
//!     println!("{kind}: {token}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod token;
pub mod wire;

pub use client::CognitoClient;
pub use config::{AuthOptions, ConnectorConfig};
pub use error::AuthError;
pub use token::TokenSet;
