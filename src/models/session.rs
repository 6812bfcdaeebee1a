//! Login payloads and the signed-in user.

use serde::{Deserialize, Serialize};

use crate::permissions::{PermissionSet, Principal};

/// DTO for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

/// The signed-in user as returned by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl Principal for SessionUser {
    fn is_master(&self) -> bool {
        self.is_master
    }

    fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Permission, has_permission};

    #[test]
    fn test_decode_session_user() {
        let json = r#"{
            "id": 7,
            "name": "Ana Souza",
            "email": "ana@obra.com.br",
            "isMaster": false,
            "permissions": {"contracts_view": true, "users_manage": false}
        }"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert!(has_permission(&user, Permission::ContractsView));
        assert!(!has_permission(&user, Permission::UsersManage));
    }

    #[test]
    fn test_missing_flags_default_to_nothing() {
        let user: SessionUser = serde_json::from_str(r#"{"id": 1, "name": "X", "email": "x@y"}"#).unwrap();
        assert!(!user.is_master);
        assert_eq!(user.permissions, PermissionSet::none());
    }

    #[test]
    fn test_master_with_null_permissions() {
        let json = r#"{"id": 1, "name": "Admin", "email": "admin@obra.com.br", "isMaster": true, "permissions": null}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.permissions, PermissionSet::none());
        assert!(has_permission(&user, Permission::UsersManage));
        assert!(has_permission(&user, Permission::AuditLogsView));
    }
}
