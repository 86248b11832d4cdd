//! Standalone mock provider for local load-test runs.
//!
//! Serves a fixed pool on `0.0.0.0:9229` (override with
//! `MOCK_COGNITO_PORT`): user `loadtest` / `Password1!` on app client
//! `local-loadtest`, plus a `rotated` user that always stops at a
//! `NEW_PASSWORD_REQUIRED` challenge for exercising that path.

use anyhow::Result;
use mock_cognito::MockPool;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("MOCK_COGNITO_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(9229);

    let pool = MockPool::new()
        .with_client("local-loadtest")
        .with_user("loadtest", "Password1!")
        .with_challenged_user("rotated", "Password1!", "NEW_PASSWORD_REQUIRED");

    let app = mock_cognito::router(pool);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "mock-cognito listening");
    axum::serve(listener, app).await?;
    Ok(())
}
