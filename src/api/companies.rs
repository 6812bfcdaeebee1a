//! Company endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::company::{Company, CompanyInput};

/// List all companies ordered by name.
pub async fn list_all(client: &ApiClient) -> Result<Vec<Company>> {
    let mut companies: Vec<Company> = client.get("companies").await?;
    companies.sort_by_cached_key(|c| c.name.to_lowercase());
    Ok(companies)
}

/// Create a new company.
pub async fn create(client: &ApiClient, data: &CompanyInput) -> Result<Company> {
    client.post("companies", data).await
}

/// Replace an existing company.
pub async fn update(client: &ApiClient, id: i64, data: &CompanyInput) -> Result<Company> {
    client.put(&format!("companies/{id}"), data).await
}

/// Delete a company by ID.
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("companies/{id}")).await
}
