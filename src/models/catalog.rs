//! Reference data: approval levels, measurement units, document categories.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalLevel {
    pub id: i64,
    pub name: String,
    /// Position in the approval flow, 1 first.
    pub order: i32,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// DTO for creating or replacing an approval level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalLevelInput {
    pub name: String,
    pub order: i32,
    pub min_value: Option<f64>,
    pub role_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementUnit {
    pub id: i64,
    /// Short form shown in item tables, e.g. `m²`.
    pub symbol: String,
    pub name: String,
}

/// DTO for creating or replacing a measurement unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementUnitInput {
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// DTO for creating or replacing a document category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCategoryInput {
    pub name: String,
    pub description: Option<String>,
}
