//! User account DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// DTO for creating or replacing a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub role_id: Option<i64>,
    pub active: bool,
    /// Only sent on create; the backend keeps the current password otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// DTO for `POST /users/invite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUser {
    pub name: String,
    pub email: String,
    pub role_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_omitted_on_update() {
        let input = UserInput {
            name: "Carlos".to_string(),
            email: "carlos@obra.com.br".to_string(),
            role_id: Some(2),
            active: true,
            password: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["roleId"], 2);
    }
}
