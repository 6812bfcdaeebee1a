//! Audit log DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub action: String,
    pub entity: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// One-line rendering of `details` for table cells.
    pub fn details_summary(&self) -> String {
        match &self.details {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// One page of `GET /audit-logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub items: Vec<AuditLog>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

impl AuditPage {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        (self.total.div_ceil(u64::from(self.page_size)) as u32).max(1)
    }
}

/// Query string for `GET /audit-logs`. Empty filters are not sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            entity: None,
            action: None,
            page: 1,
            page_size: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page = AuditPage {
            items: vec![],
            total: 101,
            page: 1,
            page_size: 50,
        };
        assert_eq!(page.total_pages(), 3);

        let empty = AuditPage::default();
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn test_details_summary() {
        let json = r#"{"id": 1, "action": "update", "entity": "contract", "details": {"status": "active"}, "createdAt": "2024-05-01T12:00:00Z"}"#;
        let log: AuditLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.details_summary(), r#"{"status":"active"}"#);
    }
}
