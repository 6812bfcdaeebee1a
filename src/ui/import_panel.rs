//! Spreadsheet import panel driving [`ImportWizard`].

use std::path::PathBuf;

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROW_LEFT, ARROW_RIGHT, DOWNLOAD_SIMPLE, FILE_ARROW_UP, UPLOAD_SIMPLE, X};

use super::app::{App, Panel, UiMessage};
use super::components::{
    action_button, back_button, colors, panel_header, primary_button_with_icon, styled_button_with_icon,
};
use super::contracts_panel;
use crate::api;
use crate::error::AppError;
use crate::export::{show_open_spreadsheet_dialog, show_save_dialog};
use crate::import_wizard::{ImportWizard, WizardStep};
use crate::models::contract::ContractStatus;
use crate::models::import::{ImportPreview, ImportResult, TargetField};
use crate::permissions::Permission;

/// Sample rows shown under the mapping table.
const SAMPLE_ROWS: usize = 5;

const TEMPLATE_FILE_NAME: &str = "modelo_importacao_itens.xlsx";

fn step_title(step: &WizardStep) -> &'static str {
    match step {
        WizardStep::Upload => "Enviar planilha",
        WizardStep::Mapping { .. } => "Mapear colunas",
        WizardStep::Result { .. } => "Resultado",
    }
}

/// Show the import panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Importar itens de contrato");

    if !(app.can(Permission::ImportItems) || app.can(Permission::ContractsEdit)) {
        ui.label("Você não tem permissão para importar itens.");
        return go_back;
    }

    ui.label(
        RichText::new(format!(
            "Etapa {} de {}: {}",
            app.import_wizard.step_number(),
            ImportWizard::TOTAL_STEPS,
            step_title(app.import_wizard.step())
        ))
        .strong(),
    );
    ui.add_space(10.0);

    if let Some(error) = app.import_wizard.error().map(str::to_string) {
        ui.horizontal(|ui| {
            ui.colored_label(colors::ERROR, error);
            if action_button(ui, X, "Dispensar").clicked() {
                app.import_wizard.clear_error();
            }
        });
        ui.add_space(10.0);
    }

    let view: fn(&mut App, &mut Ui) = match app.import_wizard.step() {
        WizardStep::Upload => show_upload,
        WizardStep::Mapping { .. } => show_mapping,
        WizardStep::Result { .. } => show_result,
    };
    view(app, ui);

    go_back
}

fn show_upload(app: &mut App, ui: &mut Ui) {
    ui.label("Selecione uma planilha .xlsx, .xls ou .csv com os itens do contrato.");
    ui.add_space(15.0);

    let busy = app.import_wizard.is_busy();

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!busy, |ui| {
            if primary_button_with_icon(ui, FILE_ARROW_UP, "Selecionar planilha").clicked()
                && let Some(path) = show_open_spreadsheet_dialog()
            {
                start_upload(app, path);
            }
        });

        ui.add_space(10.0);

        if styled_button_with_icon(ui, DOWNLOAD_SIMPLE, "Baixar modelo").clicked() {
            download_template(app);
        }

        if busy {
            ui.add_space(10.0);
            ui.spinner();
            ui.label("Enviando...");
        }
    });
}

fn start_upload(app: &mut App, path: PathBuf) {
    if let Err(e) = app.import_wizard.begin_upload(&path) {
        tracing::debug!("Rejected import file {}: {}", path.display(), e);
        app.log_warning(format!("Arquivo recusado: {}", path.display()));
        app.error_message = Some(e.user_message());
        return;
    }

    app.log_info(format!("Enviando planilha {}", path.display()));
    let client = app.client.clone();
    app.spawn(async move {
        preview_message(api::import::preview(&client, &path).await)
    });
}

fn preview_message(result: crate::error::Result<ImportPreview>) -> UiMessage {
    match result {
        Ok(preview) => UiMessage::ImportPreviewed(preview),
        Err(AppError::Unauthorized) => UiMessage::SessionExpired,
        Err(e) => UiMessage::ImportPreviewFailed(e.user_message()),
    }
}

fn submit_message(result: crate::error::Result<ImportResult>) -> UiMessage {
    match result {
        Ok(result) => UiMessage::ImportFinished(result),
        Err(AppError::Unauthorized) => UiMessage::SessionExpired,
        Err(e) => UiMessage::ImportFailed(e.user_message()),
    }
}

fn download_template(app: &mut App) {
    let Some(path) = show_save_dialog(TEMPLATE_FILE_NAME) else {
        return;
    };

    let client = app.client.clone();
    app.spawn(async move {
        let saved = async {
            let bytes = api::import::template(&client).await?;
            tokio::fs::write(&path, bytes).await?;
            Ok::<_, AppError>(())
        };
        match saved.await {
            Ok(()) => UiMessage::TemplateSaved(path),
            Err(AppError::Unauthorized) => UiMessage::SessionExpired,
            Err(e) => {
                tracing::error!("Template download failed: {}", e);
                UiMessage::OperationFailed(e.user_message())
            }
        }
    });
}

fn show_mapping(app: &mut App, ui: &mut Ui) {
    let WizardStep::Mapping {
        preview,
        mapping,
        contract_id,
    } = app.import_wizard.step().clone()
    else {
        return;
    };
    let busy = app.import_wizard.is_busy();

    ui.label(format!("Arquivo: {} ({} linhas)", preview.filename, preview.total_rows));
    ui.add_space(10.0);

    let mut selected_contract = None;
    let mut field_changes = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Contrato de destino:");
        egui::ComboBox::from_id_salt("import_contract")
            .width(320.0)
            .selected_text(
                contract_id
                    .and_then(|id| app.contracts.iter().find(|c| c.id == id))
                    .map(|c| format!("{} - {}", c.number, c.title))
                    .unwrap_or("Selecione...".to_string()),
            )
            .show_ui(ui, |ui| {
                for contract in app
                    .contracts
                    .iter()
                    .filter(|c| !matches!(c.status, ContractStatus::Archived | ContractStatus::Cancelled))
                {
                    let label = format!("{} - {}", contract.number, contract.title);
                    if ui.selectable_label(contract_id == Some(contract.id), label).clicked() {
                        selected_contract = Some(contract.id);
                    }
                }
            });
    });

    ui.add_space(10.0);
    ui.label(RichText::new("Colunas da planilha").strong());
    ui.add_space(5.0);

    egui::Grid::new("import_mapping_grid")
        .num_columns(3)
        .striped(true)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.strong("Coluna");
            ui.strong("Campo");
            ui.strong("Exemplo");
            ui.end_row();

            for header in &preview.headers {
                ui.label(header);
                let current = mapping.get(header);
                egui::ComboBox::from_id_salt(("import_field", header.as_str()))
                    .width(160.0)
                    .selected_text(current.map(|f| f.label()).unwrap_or("Ignorar"))
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(current.is_none(), "Ignorar").clicked() {
                            field_changes.push((header.clone(), None));
                        }
                        for field in TargetField::ALL {
                            if ui.selectable_label(current == Some(field), field.label()).clicked() {
                                field_changes.push((header.clone(), Some(field)));
                            }
                        }
                    });
                let sample = preview.preview.first().map(|row| row.cell(header)).unwrap_or_default();
                ui.weak(sample);
                ui.end_row();
            }
        });

    let duplicated: Vec<&str> = TargetField::ALL
        .iter()
        .filter(|f| mapping.mapped().filter(|(_, m)| m == *f).count() > 1)
        .map(|f| f.label())
        .collect();
    if !duplicated.is_empty() {
        ui.add_space(5.0);
        ui.colored_label(
            colors::WARNING,
            format!("Campos mapeados em mais de uma coluna: {}", duplicated.join(", ")),
        );
    }

    if !preview.preview.is_empty() {
        ui.add_space(10.0);
        ui.label(RichText::new("Pré-visualização").strong());
        ui.add_space(5.0);
        ScrollArea::both().id_salt("import_preview_scroll").max_height(180.0).show(ui, |ui| {
            egui::Grid::new("import_preview_grid")
                .num_columns(preview.headers.len() + 1)
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.strong("Linha");
                    for header in &preview.headers {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for row in preview.preview.iter().take(SAMPLE_ROWS) {
                        ui.label(row.row.to_string());
                        for header in &preview.headers {
                            ui.label(row.cell(header));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    let mut go_back = false;
    let mut submit = false;

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!busy, |ui| {
            if styled_button_with_icon(ui, ARROW_LEFT, "Voltar").clicked() {
                go_back = true;
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_enabled_ui(app.import_wizard.can_submit(), |ui| {
                if primary_button_with_icon(ui, UPLOAD_SIMPLE, "Importar").clicked() {
                    submit = true;
                }
            });
            if busy {
                ui.spinner();
            } else if contract_id.is_none() {
                ui.weak("Selecione um contrato para importar");
            }
        });
    });

    if let Some(id) = selected_contract {
        app.import_wizard.select_contract(id);
    }
    for (header, field) in field_changes {
        app.import_wizard.set_field(&header, field);
    }
    if go_back {
        app.import_wizard.back_to_upload();
    }
    if submit {
        start_submit(app);
    }
}

fn start_submit(app: &mut App) {
    let request = match app.import_wizard.begin_submit() {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Import not submitted: {}", e);
            return;
        }
    };

    tracing::info!(
        "Importing {} into contract {} ({} mapped columns)",
        request.temp_file,
        request.contract_id,
        request.mapping.mapped().count()
    );
    let client = app.client.clone();
    app.spawn(async move { submit_message(api::import::submit(&client, &request).await) });
}

fn show_result(app: &mut App, ui: &mut Ui) {
    let WizardStep::Result { result, contract_id } = app.import_wizard.step().clone() else {
        return;
    };

    let color = if result.success && result.errors.is_empty() {
        colors::SUCCESS
    } else if result.imported > 0 {
        colors::WARNING
    } else {
        colors::ERROR
    };
    ui.label(RichText::new(result.summary_line()).size(18.0).color(color));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("import_result_scroll").max_height(300.0).show(ui, |ui| {
        if !result.errors.is_empty() {
            ui.label(RichText::new(format!("Erros ({})", result.errors.len())).strong());
            for issue in &result.errors {
                ui.colored_label(colors::ERROR, issue.line());
            }
            ui.add_space(10.0);
        }
        if !result.warnings.is_empty() {
            ui.label(RichText::new(format!("Avisos ({})", result.warnings.len())).strong());
            for issue in &result.warnings {
                ui.colored_label(colors::WARNING, issue.line());
            }
        }
    });

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, ARROW_LEFT, "Recomeçar").clicked() {
            app.import_wizard.start_over();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if primary_button_with_icon(ui, ARROW_RIGHT, "Ir para o contrato").clicked() {
                app.import_wizard.start_over();
                app.navigate(Panel::Contracts);
                contracts_panel::open_detail(app, contract_id);
            }
        });
    });
}
