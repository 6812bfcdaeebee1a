//! Company DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// DTO for creating or replacing a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub name: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
}

/// Keep only the digits of a CNPJ and format it as `00.000.000/0000-00`.
///
/// Returns `None` unless exactly 14 digits are present.
pub fn normalize_cnpj(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 14 {
        return None;
    }
    Some(format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cnpj() {
        assert_eq!(normalize_cnpj("12345678000190").as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(normalize_cnpj("12.345.678/0001-90").as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(normalize_cnpj("1234"), None);
    }

    #[test]
    fn test_company_active_defaults_true() {
        let company: Company = serde_json::from_str(r#"{"id": 1, "name": "Construtora Alfa"}"#).unwrap();
        assert!(company.active);
    }
}
