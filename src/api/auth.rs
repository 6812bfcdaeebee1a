//! Login and current-session lookup.

use super::ApiClient;
use crate::error::Result;
use crate::models::session::{LoginRequest, LoginResponse, SessionUser};

/// Exchange credentials for a token.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse> {
    let body = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    client.post("auth/login", &body).await
}

/// Fetch the user behind the client's token.
pub async fn me(client: &ApiClient) -> Result<SessionUser> {
    client.get("auth/me").await
}
