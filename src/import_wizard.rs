//! Spreadsheet import wizard: `Upload -> Mapping -> Result`.
//!
//! Holds only wizard state. Network calls are made by the caller, which feeds
//! their outcomes back through [`ImportWizard::apply_preview`],
//! [`ImportWizard::apply_result`] and the `*_failed` methods.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::import::{FieldMapping, ImportPreview, ImportRequest, ImportResult, TargetField};

/// Extensions accepted for upload, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

/// Current wizard step and the data it owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WizardStep {
    #[default]
    Upload,
    Mapping {
        preview: ImportPreview,
        mapping: FieldMapping,
        contract_id: Option<i64>,
    },
    Result {
        result: ImportResult,
        contract_id: i64,
    },
}

/// Wizard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportWizard {
    step: WizardStep,
    /// A preview or import request is in flight.
    busy: bool,
    /// Last user-facing error for the current step.
    error: Option<String>,
}

impl ImportWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Step number shown to the user, 1-based.
    pub fn step_number(&self) -> usize {
        match self.step {
            WizardStep::Upload => 1,
            WizardStep::Mapping { .. } => 2,
            WizardStep::Result { .. } => 3,
        }
    }

    pub const TOTAL_STEPS: usize = 3;

    /// Check a chosen file and mark the upload as started.
    ///
    /// On error the wizard stays in `Upload` with the message recorded.
    pub fn begin_upload(&mut self, path: &Path) -> Result<()> {
        if !matches!(self.step, WizardStep::Upload) {
            return Err(AppError::validation("Envio de arquivo disponível apenas na primeira etapa"));
        }
        if self.busy {
            return Err(AppError::validation("Aguarde o envio em andamento"));
        }
        if let Err(e) = validate_file(path) {
            self.error = Some(e.user_message());
            return Err(e);
        }
        self.error = None;
        self.busy = true;
        Ok(())
    }

    /// Preview arrived: move to `Mapping` with the suggested mapping.
    pub fn apply_preview(&mut self, preview: ImportPreview) {
        if !matches!(self.step, WizardStep::Upload) {
            tracing::warn!("Ignoring import preview outside the upload step");
            return;
        }
        let mapping = FieldMapping::for_headers(&preview.headers, &preview.suggested_mapping);
        self.step = WizardStep::Mapping {
            preview,
            mapping,
            contract_id: None,
        };
        self.busy = false;
        self.error = None;
    }

    /// Preview call failed; stay in `Upload`.
    pub fn upload_failed(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.error = Some(message.into());
    }

    pub fn select_contract(&mut self, id: i64) {
        if let WizardStep::Mapping { contract_id, .. } = &mut self.step {
            *contract_id = Some(id);
        }
    }

    pub fn set_field(&mut self, header: &str, field: Option<TargetField>) {
        if let WizardStep::Mapping { mapping, .. } = &mut self.step {
            mapping.set(header, field);
        }
    }

    pub fn selected_contract(&self) -> Option<i64> {
        match &self.step {
            WizardStep::Mapping { contract_id, .. } => *contract_id,
            WizardStep::Result { contract_id, .. } => Some(*contract_id),
            WizardStep::Upload => None,
        }
    }

    pub fn mapping(&self) -> Option<&FieldMapping> {
        match &self.step {
            WizardStep::Mapping { mapping, .. } => Some(mapping),
            _ => None,
        }
    }

    /// Submit is allowed in `Mapping` with a contract and nothing in flight.
    pub fn can_submit(&self) -> bool {
        matches!(self.step, WizardStep::Mapping { contract_id: Some(_), .. }) && !self.busy
    }

    /// Build the import request and mark it in flight.
    pub fn begin_submit(&mut self) -> Result<ImportRequest> {
        let WizardStep::Mapping {
            preview,
            mapping,
            contract_id,
        } = &self.step
        else {
            return Err(AppError::validation("Nenhuma planilha carregada"));
        };
        if self.busy {
            return Err(AppError::validation("Aguarde a importação em andamento"));
        }
        let Some(contract_id) = *contract_id else {
            let err = AppError::validation("Selecione um contrato de destino");
            self.error = Some(err.user_message());
            return Err(err);
        };

        let request = ImportRequest {
            contract_id,
            temp_file: preview.temp_file.clone(),
            mapping: mapping.clone(),
        };
        self.busy = true;
        self.error = None;
        Ok(request)
    }

    /// Import finished: move to `Result`.
    pub fn apply_result(&mut self, result: ImportResult) {
        let WizardStep::Mapping {
            contract_id: Some(contract_id),
            ..
        } = self.step
        else {
            tracing::warn!("Ignoring import result outside the mapping step");
            return;
        };
        self.step = WizardStep::Result { result, contract_id };
        self.busy = false;
        self.error = None;
    }

    /// Import call failed; stay in `Mapping`.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.error = Some(message.into());
    }

    /// `Mapping -> Upload`, discarding the preview.
    pub fn back_to_upload(&mut self) {
        if matches!(self.step, WizardStep::Mapping { .. }) && !self.busy {
            *self = Self::new();
        }
    }

    /// Discard all wizard state.
    pub fn start_over(&mut self) {
        *self = Self::new();
    }
}

/// Accept only spreadsheet extensions from [`ALLOWED_EXTENSIONS`].
pub fn validate_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AppError::validation(
            "Formato de arquivo não suportado. Use .xlsx, .xls ou .csv",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::import::{PreviewRow, RowIssue};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn sample_preview() -> ImportPreview {
        ImportPreview {
            filename: "itens.xlsx".to_string(),
            temp_file: "/tmp/imp-1.xlsx".to_string(),
            total_rows: 50,
            headers: vec!["Código".to_string(), "Descrição".to_string(), "Qtd".to_string()],
            suggested_mapping: FieldMapping::from([
                ("Código", Some(TargetField::Code)),
                ("Descrição", Some(TargetField::Description)),
                ("Qtd", Some(TargetField::Quantity)),
            ]),
            preview: vec![PreviewRow {
                row: 2,
                data: BTreeMap::new(),
            }],
        }
    }

    fn wizard_in_mapping() -> ImportWizard {
        let mut wizard = ImportWizard::new();
        wizard.begin_upload(&PathBuf::from("itens.xlsx")).unwrap();
        wizard.apply_preview(sample_preview());
        wizard
    }

    #[test]
    fn test_disallowed_extension_stays_in_upload() {
        let mut wizard = ImportWizard::new();
        for name in ["itens.pdf", "itens", "itens.xlsx.exe", "planilha.docx"] {
            assert!(wizard.begin_upload(&PathBuf::from(name)).is_err());
            assert_eq!(wizard.step(), &WizardStep::Upload);
            assert!(!wizard.is_busy());
            assert!(wizard.error().is_some());
        }
    }

    #[test]
    fn test_rejected_file_reports_user_message() {
        let mut wizard = ImportWizard::new();
        let err = wizard.begin_upload(&PathBuf::from("contrato.pdf")).unwrap_err();
        assert_eq!(err.user_message(), "Formato de arquivo não suportado. Use .xlsx, .xls ou .csv");
        assert_eq!(wizard.error(), Some(err.user_message().as_str()));
    }

    #[test]
    fn test_clear_error_keeps_step() {
        let mut wizard = ImportWizard::new();
        assert!(wizard.begin_upload(&PathBuf::from("itens.txt")).is_err());
        assert!(wizard.error().is_some());

        wizard.clear_error();
        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.step(), &WizardStep::Upload);
        assert!(wizard.begin_upload(&PathBuf::from("itens.xlsx")).is_ok());
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        for name in ["a.xlsx", "b.XLS", "c.Csv"] {
            assert!(validate_file(&PathBuf::from(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_upload_failure_stays_in_upload() {
        let mut wizard = ImportWizard::new();
        wizard.begin_upload(&PathBuf::from("itens.csv")).unwrap();
        assert!(wizard.is_busy());

        wizard.upload_failed("Planilha vazia");
        assert_eq!(wizard.step(), &WizardStep::Upload);
        assert!(!wizard.is_busy());
        assert_eq!(wizard.error(), Some("Planilha vazia"));
    }

    #[test]
    fn test_mapping_prepopulated_from_suggestion() {
        let wizard = wizard_in_mapping();
        assert_eq!(wizard.step_number(), 2);
        assert_eq!(wizard.mapping(), Some(&sample_preview().suggested_mapping));
        assert!(wizard.selected_contract().is_none());
    }

    #[test]
    fn test_submit_blocked_without_contract() {
        let mut wizard = wizard_in_mapping();
        assert!(!wizard.can_submit());
        assert!(wizard.begin_submit().is_err());
        assert!(matches!(wizard.step(), WizardStep::Mapping { .. }));
        assert_eq!(wizard.error(), Some("Selecione um contrato de destino"));
        assert!(!wizard.is_busy());
    }

    #[test]
    fn test_submit_blocked_while_in_flight() {
        let mut wizard = wizard_in_mapping();
        wizard.select_contract(4);
        assert!(wizard.can_submit());

        wizard.begin_submit().unwrap();
        assert!(!wizard.can_submit());
        assert!(wizard.begin_submit().is_err());
    }

    #[test]
    fn test_submit_carries_overridden_mapping() {
        let mut wizard = wizard_in_mapping();
        wizard.select_contract(4);
        wizard.set_field("Qtd", None);
        wizard.set_field("Descrição", Some(TargetField::Type));

        let request = wizard.begin_submit().unwrap();
        assert_eq!(request.contract_id, 4);
        assert_eq!(request.temp_file, "/tmp/imp-1.xlsx");
        assert_eq!(request.mapping.get("Qtd"), None);
        assert_eq!(request.mapping.get("Descrição"), Some(TargetField::Type));
        assert_eq!(request.mapping.get("Código"), Some(TargetField::Code));
    }

    #[test]
    fn test_submit_failure_stays_in_mapping() {
        let mut wizard = wizard_in_mapping();
        wizard.select_contract(4);
        wizard.begin_submit().unwrap();

        wizard.submit_failed("Contrato bloqueado");
        assert!(matches!(wizard.step(), WizardStep::Mapping { .. }));
        assert!(wizard.can_submit());
    }

    #[test]
    fn test_full_scenario_and_start_over() {
        let mut wizard = wizard_in_mapping();
        wizard.select_contract(12);
        wizard.begin_submit().unwrap();

        wizard.apply_result(ImportResult {
            success: true,
            total_rows: 50,
            imported: 48,
            errors: vec![],
            warnings: vec![RowIssue {
                row: 3,
                message: "Unidade inválida".to_string(),
            }],
        });

        let WizardStep::Result { result, contract_id } = wizard.step() else {
            panic!("expected result step");
        };
        assert_eq!(*contract_id, 12);
        assert_eq!(result.summary_line(), "48 de 50 itens importados");
        let lines: Vec<_> = result.warnings.iter().map(|w| w.line()).collect();
        assert_eq!(lines, vec!["Linha 3: Unidade inválida".to_string()]);

        wizard.start_over();
        assert_eq!(wizard, ImportWizard::new());
    }

    #[test]
    fn test_back_to_upload_discards_preview() {
        let mut wizard = wizard_in_mapping();
        wizard.select_contract(1);
        wizard.back_to_upload();
        assert_eq!(wizard, ImportWizard::new());
    }

    #[test]
    fn test_stray_responses_are_ignored() {
        let mut wizard = ImportWizard::new();
        wizard.apply_result(ImportResult {
            success: true,
            total_rows: 1,
            imported: 1,
            errors: vec![],
            warnings: vec![],
        });
        assert_eq!(wizard.step(), &WizardStep::Upload);

        let mut wizard = wizard_in_mapping();
        let before = wizard.clone();
        wizard.apply_preview(sample_preview());
        assert_eq!(wizard, before);
    }
}
