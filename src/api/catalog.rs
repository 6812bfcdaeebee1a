//! Reference data endpoints: approval levels, measurement units and
//! document categories.

use super::ApiClient;
use crate::error::Result;
use crate::models::catalog::{
    ApprovalLevel, ApprovalLevelInput, DocumentCategory, DocumentCategoryInput, MeasurementUnit, MeasurementUnitInput,
};

/// List approval levels in flow order.
pub async fn list_approval_levels(client: &ApiClient) -> Result<Vec<ApprovalLevel>> {
    let mut levels: Vec<ApprovalLevel> = client.get("approval-levels").await?;
    levels.sort_by_key(|l| l.order);
    Ok(levels)
}

pub async fn create_approval_level(client: &ApiClient, data: &ApprovalLevelInput) -> Result<ApprovalLevel> {
    client.post("approval-levels", data).await
}

pub async fn update_approval_level(client: &ApiClient, id: i64, data: &ApprovalLevelInput) -> Result<ApprovalLevel> {
    client.put(&format!("approval-levels/{id}"), data).await
}

pub async fn delete_approval_level(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("approval-levels/{id}")).await
}

pub async fn list_measurement_units(client: &ApiClient) -> Result<Vec<MeasurementUnit>> {
    client.get("measurement-units").await
}

pub async fn create_measurement_unit(client: &ApiClient, data: &MeasurementUnitInput) -> Result<MeasurementUnit> {
    client.post("measurement-units", data).await
}

pub async fn update_measurement_unit(
    client: &ApiClient,
    id: i64,
    data: &MeasurementUnitInput,
) -> Result<MeasurementUnit> {
    client.put(&format!("measurement-units/{id}"), data).await
}

pub async fn delete_measurement_unit(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("measurement-units/{id}")).await
}

pub async fn list_document_categories(client: &ApiClient) -> Result<Vec<DocumentCategory>> {
    client.get("document-categories").await
}

pub async fn create_document_category(client: &ApiClient, data: &DocumentCategoryInput) -> Result<DocumentCategory> {
    client.post("document-categories", data).await
}

pub async fn update_document_category(
    client: &ApiClient,
    id: i64,
    data: &DocumentCategoryInput,
) -> Result<DocumentCategory> {
    client.put(&format!("document-categories/{id}"), data).await
}

pub async fn delete_document_category(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("document-categories/{id}")).await
}
