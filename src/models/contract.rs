//! Contract DTOs, events, approval flow and financial report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Contract lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    #[default]
    Draft,
    Active,
    Suspended,
    Completed,
    Cancelled,
    Archived,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Suspended,
        ContractStatus::Completed,
        ContractStatus::Cancelled,
        ContractStatus::Archived,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "Rascunho",
            ContractStatus::Active => "Ativo",
            ContractStatus::Suspended => "Suspenso",
            ContractStatus::Completed => "Concluído",
            ContractStatus::Cancelled => "Cancelado",
            ContractStatus::Archived => "Arquivado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub status: ContractStatus,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// DTO for creating or replacing a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInput {
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub company_id: Option<i64>,
    pub status: ContractStatus,
    pub total_value: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractEvent {
    pub id: i64,
    pub event_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Decision state of one approval level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pendente",
            ApprovalStatus::Approved => "Aprovado",
            ApprovalStatus::Rejected => "Rejeitado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStep {
    pub level_id: i64,
    pub level_name: String,
    pub order: i32,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub approver_name: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// DTO for `POST /contracts/{id}/approval-flow/decision`.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalDecision {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    pub period: String,
    #[serde(default)]
    pub measured: f64,
    #[serde(default)]
    pub paid: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub contract_value: f64,
    #[serde(default)]
    pub measured_value: f64,
    #[serde(default)]
    pub paid_value: f64,
    #[serde(default)]
    pub entries: Vec<FinancialEntry>,
}

impl FinancialReport {
    /// Contract value still to be paid.
    pub fn balance(&self) -> f64 {
        self.contract_value - self.paid_value
    }

    /// Measured share of the contract value, 0-100.
    pub fn percent_executed(&self) -> f64 {
        if self.contract_value <= 0.0 {
            return 0.0;
        }
        (self.measured_value / self.contract_value * 100.0).clamp(0.0, 100.0)
    }
}

/// Format a BRL amount as `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let int_part = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{frac:02}", sign = if negative { "-" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_contract() {
        let json = r#"{
            "id": 12,
            "number": "CT-2024-012",
            "title": "Reforma da escola municipal",
            "companyId": 3,
            "status": "active",
            "totalValue": 150000.5,
            "startDate": "2024-03-01"
        }"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.status, ContractStatus::Active);
        assert_eq!(contract.company_id, Some(3));
        assert_eq!(contract.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(contract.end_date.is_none());
    }

    #[test]
    fn test_financial_report_figures() {
        let report = FinancialReport {
            contract_value: 200_000.0,
            measured_value: 50_000.0,
            paid_value: 40_000.0,
            entries: vec![],
        };
        assert_eq!(report.balance(), 160_000.0);
        assert_eq!(report.percent_executed(), 25.0);

        let empty = FinancialReport {
            contract_value: 0.0,
            measured_value: 10.0,
            paid_value: 0.0,
            entries: vec![],
        };
        assert_eq!(empty.percent_executed(), 0.0);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-15.256), "-R$ 15,26");
    }
}
