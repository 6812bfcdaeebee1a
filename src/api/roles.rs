//! Role endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::role::{Role, RoleInput};

pub async fn list_all(client: &ApiClient) -> Result<Vec<Role>> {
    client.get("roles").await
}

pub async fn create(client: &ApiClient, data: &RoleInput) -> Result<Role> {
    client.post("roles", data).await
}

pub async fn update(client: &ApiClient, id: i64, data: &RoleInput) -> Result<Role> {
    client.put(&format!("roles/{id}"), data).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("roles/{id}")).await
}
