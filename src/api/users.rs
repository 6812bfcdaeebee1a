//! User endpoints, including invitations and password resets.

use super::ApiClient;
use crate::error::Result;
use crate::models::user::{InviteUser, User, UserInput};

/// List all users.
pub async fn list_all(client: &ApiClient) -> Result<Vec<User>> {
    client.get("users").await
}

/// Create a new user with an initial password.
pub async fn create(client: &ApiClient, data: &UserInput) -> Result<User> {
    client.post("users", data).await
}

/// Replace an existing user.
pub async fn update(client: &ApiClient, id: i64, data: &UserInput) -> Result<User> {
    client.put(&format!("users/{id}"), data).await
}

/// Delete a user by ID.
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("users/{id}")).await
}

/// Send an invitation e-mail; the backend creates the pending account.
pub async fn invite(client: &ApiClient, data: &InviteUser) -> Result<User> {
    client.post("users/invite", data).await
}

/// Ask the backend to e-mail a password reset link.
pub async fn reset_password(client: &ApiClient, id: i64) -> Result<()> {
    client.post_empty(&format!("users/{id}/reset-password")).await
}
