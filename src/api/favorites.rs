//! Favorites check and toggle.

use super::ApiClient;
use crate::error::Result;
use crate::models::favorite::{FavoriteStatus, ToggleFavorite};

/// Entity type used for contract favorites.
pub const CONTRACT: &str = "contract";

/// Whether the entity is in the current user's favorites.
pub async fn is_favorite(client: &ApiClient, entity_type: &str, entity_id: i64) -> Result<bool> {
    let status: FavoriteStatus = client
        .get(&format!("favorites/check/{entity_type}/{entity_id}"))
        .await?;
    Ok(status.is_favorite)
}

/// Flip the favorite flag and return the new state.
pub async fn toggle(client: &ApiClient, entity_type: &str, entity_id: i64) -> Result<bool> {
    let body = ToggleFavorite {
        entity_type: entity_type.to_string(),
        entity_id,
    };
    let status: FavoriteStatus = client.post("favorites/toggle", &body).await?;
    Ok(status.is_favorite)
}
