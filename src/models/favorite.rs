//! Favorite toggle DTOs.

use serde::{Deserialize, Serialize};

/// Response of the favorites check and toggle endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

/// DTO for `POST /favorites/toggle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavorite {
    pub entity_type: String,
    pub entity_id: i64,
}
