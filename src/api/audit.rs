//! Audit log endpoint.

use super::ApiClient;
use crate::error::Result;
use crate::models::audit::{AuditPage, AuditQuery};

/// Fetch one page of audit entries.
pub async fn list(client: &ApiClient, query: &AuditQuery) -> Result<AuditPage> {
    client.get_query("audit-logs", query).await
}
