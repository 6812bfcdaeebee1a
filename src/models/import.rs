//! Spreadsheet import DTOs: preview, column mapping, submission and result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contract item field a spreadsheet column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetField {
    Code,
    Description,
    Type,
    Unit,
    Quantity,
    UnitPrice,
}

impl TargetField {
    pub const ALL: [TargetField; 6] = [
        TargetField::Code,
        TargetField::Description,
        TargetField::Type,
        TargetField::Unit,
        TargetField::Quantity,
        TargetField::UnitPrice,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TargetField::Code => "code",
            TargetField::Description => "description",
            TargetField::Type => "type",
            TargetField::Unit => "unit",
            TargetField::Quantity => "quantity",
            TargetField::UnitPrice => "unitPrice",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TargetField::Code => "Código",
            TargetField::Description => "Descrição",
            TargetField::Type => "Tipo",
            TargetField::Unit => "Unidade",
            TargetField::Quantity => "Quantidade",
            TargetField::UnitPrice => "Preço unitário",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

/// Source column header to target field. `None` means the column is ignored.
///
/// On the wire this is a `{header: fieldKey}` object where `""` means ignore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct FieldMapping(BTreeMap<String, Option<TargetField>>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<TargetField> {
        self.0.get(header).copied().flatten()
    }

    pub fn set(&mut self, header: impl Into<String>, field: Option<TargetField>) {
        self.0.insert(header.into(), field);
    }

    /// Mapping with one entry per header, taken from `suggested` where present.
    pub fn for_headers(headers: &[String], suggested: &FieldMapping) -> Self {
        Self(headers.iter().map(|h| (h.clone(), suggested.get(h))).collect())
    }

    /// Headers mapped to a field, sorted by header.
    pub fn mapped(&self) -> impl Iterator<Item = (&str, TargetField)> {
        self.0.iter().filter_map(|(h, f)| f.map(|f| (h.as_str(), f)))
    }

    pub fn is_mapped(&self, field: TargetField) -> bool {
        self.mapped().any(|(_, f)| f == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, Option<TargetField>); N]> for FieldMapping {
    fn from(entries: [(&str, Option<TargetField>); N]) -> Self {
        Self(entries.into_iter().map(|(h, f)| (h.to_string(), f)).collect())
    }
}

impl From<BTreeMap<String, String>> for FieldMapping {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(
            map.into_iter()
                .map(|(header, key)| {
                    let field = TargetField::from_key(&key);
                    if field.is_none() && !key.is_empty() {
                        tracing::debug!("Unknown import field '{}' for column '{}'", key, header);
                    }
                    (header, field)
                })
                .collect(),
        )
    }
}

impl From<FieldMapping> for BTreeMap<String, String> {
    fn from(mapping: FieldMapping) -> Self {
        mapping
            .0
            .into_iter()
            .map(|(header, field)| (header, field.map(|f| f.key().to_string()).unwrap_or_default()))
            .collect()
    }
}

/// One sample row of the uploaded sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub row: u32,
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl PreviewRow {
    /// Cell value as display text.
    pub fn cell(&self, header: &str) -> String {
        match self.data.get(header) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Response of `POST /import/preview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub filename: String,
    /// Server-side handle of the uploaded file, echoed back on submit.
    pub temp_file: String,
    pub total_rows: u32,
    pub headers: Vec<String>,
    #[serde(default)]
    pub suggested_mapping: FieldMapping,
    #[serde(default)]
    pub preview: Vec<PreviewRow>,
}

/// DTO for `POST /import/contract-items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub contract_id: i64,
    pub temp_file: String,
    pub mapping: FieldMapping,
}

/// A problem reported for one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    pub row: u32,
    pub message: String,
}

impl RowIssue {
    pub fn line(&self) -> String {
        format!("Linha {}: {}", self.row, self.message)
    }
}

/// Response of `POST /import/contract-items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub total_rows: u32,
    pub imported: u32,
    #[serde(default)]
    pub errors: Vec<RowIssue>,
    #[serde(default)]
    pub warnings: Vec<RowIssue>,
}

impl ImportResult {
    pub fn summary_line(&self) -> String {
        format!("{} de {} itens importados", self.imported, self.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preview() {
        let json = r#"{
            "filename": "itens.xlsx",
            "tempFile": "/tmp/upload-81f2.xlsx",
            "totalRows": 50,
            "headers": ["Código", "Descrição", "Qtd", "Obs"],
            "suggestedMapping": {"Código": "code", "Descrição": "description", "Qtd": "quantity", "Obs": ""},
            "preview": [{"row": 2, "data": {"Código": "1.1", "Qtd": 12.5, "Obs": null}}]
        }"#;
        let preview: ImportPreview = serde_json::from_str(json).unwrap();

        assert_eq!(preview.suggested_mapping.get("Código"), Some(TargetField::Code));
        assert_eq!(preview.suggested_mapping.get("Obs"), None);
        assert_eq!(preview.preview[0].cell("Código"), "1.1");
        assert_eq!(preview.preview[0].cell("Qtd"), "12.5");
        assert_eq!(preview.preview[0].cell("Obs"), "");
        assert_eq!(preview.preview[0].cell("Descrição"), "");
    }

    #[test]
    fn test_encode_request_uses_empty_string_for_ignored() {
        let request = ImportRequest {
            contract_id: 9,
            temp_file: "tmp-1".to_string(),
            mapping: FieldMapping::from([("Preço", Some(TargetField::UnitPrice)), ("Obs", None)]),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contractId": 9,
                "tempFile": "tmp-1",
                "mapping": {"Preço": "unitPrice", "Obs": ""}
            })
        );
    }

    #[test]
    fn test_for_headers_fills_missing_as_ignored() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let suggested = FieldMapping::from([("A", Some(TargetField::Unit)), ("Z", Some(TargetField::Code))]);
        let mapping = FieldMapping::for_headers(&headers, &suggested);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("A"), Some(TargetField::Unit));
        assert_eq!(mapping.get("B"), None);
        assert!(!mapping.is_mapped(TargetField::Code));
    }

    #[test]
    fn test_issue_and_summary_lines() {
        let result = ImportResult {
            success: true,
            total_rows: 10,
            imported: 7,
            errors: vec![RowIssue {
                row: 4,
                message: "Quantidade inválida".to_string(),
            }],
            warnings: vec![],
        };
        assert_eq!(result.summary_line(), "7 de 10 itens importados");
        assert_eq!(result.errors[0].line(), "Linha 4: Quantidade inválida");
    }
}
