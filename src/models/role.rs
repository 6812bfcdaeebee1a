//! Role DTOs.

use serde::{Deserialize, Serialize};

use crate::permissions::{PermissionSet, Principal};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub user_count: Option<u32>,
}

/// Roles are never master; previewing a role uses only its permission set.
impl Principal for Role {
    fn is_master(&self) -> bool {
        false
    }

    fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

/// DTO for creating or replacing a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInput {
    pub name: String,
    pub description: Option<String>,
    pub permissions: PermissionSet,
}

impl Principal for RoleInput {
    fn is_master(&self) -> bool {
        false
    }

    fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}
