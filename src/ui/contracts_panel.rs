//! Contract panel: list, CRUD, detail with approval flow and financial report.

use chrono::NaiveDate;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, EYE, FILE_XLS, PENCIL, PLUS, STAR, TRASH};

use super::app::{App, ContractDetail, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, colors, confirm_buttons, danger_action_button, modal_window, non_empty,
    optional_date, panel_header, parse_decimal, primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::export::{export_contracts_to_excel, generate_export_filename, show_save_dialog};
use crate::models::contract::{
    ApprovalDecision, ApprovalStatus, ApprovalStep, Contract, ContractInput, ContractStatus, format_brl,
};
use crate::permissions::Permission;

/// Contract form buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractForm {
    pub number: String,
    pub title: String,
    pub description: String,
    pub company_id: Option<i64>,
    pub status: ContractStatus,
    pub total_value: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContractForm {
    pub fn from_contract(contract: &Contract) -> Self {
        Self {
            number: contract.number.clone(),
            title: contract.title.clone(),
            description: contract.description.clone().unwrap_or_default(),
            company_id: contract.company_id,
            status: contract.status,
            total_value: format!("{:.2}", contract.total_value).replace('.', ","),
            start_date: contract.start_date,
            end_date: contract.end_date,
        }
    }

    /// Validate and build the request body.
    pub fn to_input(&self) -> Result<ContractInput, String> {
        if self.number.trim().is_empty() {
            return Err("Número do contrato é obrigatório".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("Objeto do contrato é obrigatório".to_string());
        }
        let total_value = match parse_decimal(&self.total_value) {
            Some(v) if v >= 0.0 => v,
            _ => return Err("Valor do contrato inválido".to_string()),
        };
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err("Data de término anterior à data de início".to_string());
        }

        Ok(ContractInput {
            number: self.number.trim().to_string(),
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            company_id: self.company_id,
            status: self.status,
            total_value,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Default)]
pub struct PanelState {
    pub screen: ScreenState<ContractForm>,
    pub search: String,
    pub status_filter: Option<ContractStatus>,
    pub show_archived: bool,
    /// Contract whose detail window is open.
    pub detail_id: Option<i64>,
    pub decision_comment: String,
}

impl PanelState {
    /// Whether `contract` passes the current filters.
    pub fn matches(&self, contract: &Contract) -> bool {
        if !self.show_archived && contract.status == ContractStatus::Archived && self.status_filter.is_none() {
            return false;
        }
        if let Some(status) = self.status_filter
            && contract.status != status
        {
            return false;
        }

        let search = self.search.trim().to_lowercase();
        search.is_empty()
            || contract.number.to_lowercase().contains(&search)
            || contract.title.to_lowercase().contains(&search)
            || contract
                .company_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&search))
    }
}

/// Level currently waiting for a decision, if the flow is still open.
pub fn pending_step(steps: &[ApprovalStep]) -> Option<&ApprovalStep> {
    if steps.iter().any(|s| s.status == ApprovalStatus::Rejected) {
        return None;
    }
    steps.iter().find(|s| s.status == ApprovalStatus::Pending)
}

/// Show the contracts panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Contratos");

    ui.horizontal(|ui| {
        if app.can(Permission::ContractsCreate) && primary_button_with_icon(ui, PLUS, "Novo contrato").clicked() {
            app.contracts_ui.screen.create(ContractForm::default());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            app.reload(Resource::Contracts);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Exportar para Excel").clicked() {
            export(app);
        }
    });

    ui.add_space(10.0);

    ui.horizontal(|ui| {
        ui.label("Buscar:");
        ui.add(
            egui::TextEdit::singleline(&mut app.contracts_ui.search)
                .desired_width(220.0)
                .hint_text("Número, objeto ou empresa..."),
        );

        ui.add_space(20.0);

        ui.label("Status:");
        egui::ComboBox::from_id_salt("contract_status_filter")
            .width(140.0)
            .selected_text(app.contracts_ui.status_filter.map(|s| s.label()).unwrap_or("Todos"))
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(app.contracts_ui.status_filter.is_none(), "Todos")
                    .clicked()
                {
                    app.contracts_ui.status_filter = None;
                }
                for status in ContractStatus::ALL {
                    if ui
                        .selectable_label(app.contracts_ui.status_filter == Some(status), status.label())
                        .clicked()
                    {
                        app.contracts_ui.status_filter = Some(status);
                    }
                }
            });

        ui.add_space(20.0);

        if ui
            .checkbox(&mut app.contracts_ui.show_archived, "Exibir arquivados")
            .changed()
        {
            app.config.ui.show_archived = app.contracts_ui.show_archived;
            app.persist_config();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if !app.contracts_ui.screen.is_idle() {
        show_modal(app, ui.ctx());
    }
    if app.contracts_ui.detail_id.is_some() {
        show_detail(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let filtered: Vec<&Contract> = app
        .contracts
        .iter()
        .filter(|c| app.contracts_ui.matches(c))
        .collect();

    ui.label(format!("Exibindo {} de {} contratos", filtered.len(), app.contracts.len()));
    ui.add_space(10.0);

    let can_edit = app.can(Permission::ContractsEdit);
    let can_delete = app.can(Permission::ContractsDelete);
    let mut next_state = None;
    let mut open_detail_id = None;

    ScrollArea::vertical().id_salt("contracts_scroll").show(ui, |ui| {
        egui::Grid::new("contracts_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Número");
                ui.strong("Objeto");
                ui.strong("Empresa");
                ui.strong("Status");
                ui.strong("Valor");
                ui.strong("Vigência");
                ui.strong("Ações");
                ui.end_row();

                for contract in filtered {
                    ui.label(&contract.number);
                    ui.label(&contract.title);
                    ui.label(contract.company_name.as_deref().unwrap_or("-"));
                    ui.label(contract.status.label());
                    ui.label(format_brl(contract.total_value));
                    ui.label(period_label(contract.start_date, contract.end_date));

                    ui.horizontal(|ui| {
                        if action_button(ui, EYE, "Detalhes").clicked() {
                            open_detail_id = Some(contract.id);
                        }
                        if can_edit {
                            ui.add_space(4.0);
                            if action_button(ui, PENCIL, "Editar").clicked() {
                                next_state = Some(ScreenState::Editing {
                                    id: contract.id,
                                    form: ContractForm::from_contract(contract),
                                });
                            }
                        }
                        if can_delete {
                            ui.add_space(4.0);
                            if danger_action_button(ui, TRASH, "Excluir").clicked() {
                                next_state = Some(ScreenState::ConfirmingDelete {
                                    id: contract.id,
                                    label: contract.number.clone(),
                                });
                            }
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.contracts_ui.screen = state;
    }
    if let Some(id) = open_detail_id {
        open_detail(app, id);
    }
}

fn period_label(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or("-".to_string());
    format!("{} a {}", fmt(start), fmt(end))
}

fn show_modal(app: &mut App, ctx: &egui::Context) {
    if let ScreenState::ConfirmingDelete { label, .. } = &app.contracts_ui.screen {
        let label = label.clone();
        modal_window("Excluir contrato").show(ctx, |ui| {
            ui.label(format!("Excluir o contrato {label}? Esta ação não pode ser desfeita."));
            ui.add_space(10.0);
            match confirm_buttons(ui, "Excluir") {
                Some(true) => submit(app),
                Some(false) => app.contracts_ui.screen.close(),
                None => {}
            }
        });
        return;
    }

    let title = if app.contracts_ui.screen.is_editing() {
        "Editar contrato"
    } else {
        "Novo contrato"
    };

    modal_window(title).default_width(480.0).show(ctx, |ui| {
        let companies = &app.companies;
        let Some(form) = app.contracts_ui.screen.form_mut() else {
            return;
        };

        ui.add_space(10.0);
        egui::Grid::new("contract_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Número:");
                ui.add(egui::TextEdit::singleline(&mut form.number).desired_width(160.0));
                ui.end_row();

                ui.label("Objeto:");
                ui.add(egui::TextEdit::singleline(&mut form.title).desired_width(300.0));
                ui.end_row();

                ui.label("Descrição:");
                ui.add(
                    egui::TextEdit::multiline(&mut form.description)
                        .desired_width(300.0)
                        .desired_rows(3),
                );
                ui.end_row();

                ui.label("Empresa:");
                egui::ComboBox::from_id_salt("contract_form_company")
                    .width(300.0)
                    .selected_text(
                        form.company_id
                            .and_then(|id| companies.iter().find(|c| c.id == id))
                            .map(|c| c.name.as_str())
                            .unwrap_or("Nenhuma"),
                    )
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(form.company_id.is_none(), "Nenhuma").clicked() {
                            form.company_id = None;
                        }
                        for company in companies.iter().filter(|c| c.active) {
                            if ui
                                .selectable_label(form.company_id == Some(company.id), &company.name)
                                .clicked()
                            {
                                form.company_id = Some(company.id);
                            }
                        }
                    });
                ui.end_row();

                ui.label("Status:");
                egui::ComboBox::from_id_salt("contract_form_status")
                    .width(160.0)
                    .selected_text(form.status.label())
                    .show_ui(ui, |ui| {
                        for status in ContractStatus::ALL {
                            ui.selectable_value(&mut form.status, status, status.label());
                        }
                    });
                ui.end_row();

                ui.label("Valor (R$):");
                ui.add(
                    egui::TextEdit::singleline(&mut form.total_value)
                        .desired_width(160.0)
                        .hint_text("0,00"),
                );
                ui.end_row();

                ui.label("Início:");
                optional_date(ui, "contract_start_date", &mut form.start_date);
                ui.end_row();

                ui.label("Término:");
                optional_date(ui, "contract_end_date", &mut form.end_date);
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                app.contracts_ui.screen.close();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if primary_button_with_icon(ui, "", "Salvar").clicked() {
                    submit(app);
                }
            });
        });
    });
}

fn submit(app: &mut App) {
    let Some(submission) = app.contracts_ui.screen.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::contracts::create(&client, &data).await, |c| UiMessage::Saved {
                    resource: Resource::Contracts,
                    message: format!("Contrato {} cadastrado", c.number),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::contracts::update(&client, id, &data).await, |c| UiMessage::Saved {
                    resource: Resource::Contracts,
                    message: format!("Contrato {} atualizado", c.number),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => {
            if app.contracts_ui.detail_id == Some(id) {
                app.contracts_ui.detail_id = None;
                app.contract_detail = None;
            }
            app.spawn(async move {
                action_message(api::contracts::delete(&client, id).await, |_| UiMessage::Deleted {
                    resource: Resource::Contracts,
                    message: "Contrato excluído".to_string(),
                })
            })
        }
    }
}

/// Open the detail window and fetch everything it shows.
pub fn open_detail(app: &mut App, contract_id: i64) {
    app.contracts_ui.detail_id = Some(contract_id);
    app.contracts_ui.decision_comment.clear();
    app.contract_detail = None;

    let with_report = app.can(Permission::FinancialReportView);
    let client = app.client.clone();
    app.spawn(async move {
        let report = async {
            if with_report {
                Some(api::contracts::financial_report(&client, contract_id).await)
            } else {
                None
            }
        };
        let (events, flow, report, favorite) = tokio::join!(
            api::contracts::events(&client, contract_id),
            api::contracts::approval_flow(&client, contract_id),
            report,
            api::favorites::is_favorite(&client, api::favorites::CONTRACT, contract_id),
        );

        if [events.as_ref().err(), flow.as_ref().err()]
            .into_iter()
            .flatten()
            .any(|e| e.is_unauthorized())
        {
            return UiMessage::SessionExpired;
        }

        let detail = ContractDetail {
            contract_id,
            events: events.unwrap_or_else(|e| {
                tracing::warn!("Failed to load events for contract {}: {}", contract_id, e);
                Vec::new()
            }),
            approval_flow: flow.unwrap_or_else(|e| {
                tracing::warn!("Failed to load approval flow for contract {}: {}", contract_id, e);
                Vec::new()
            }),
            financial_report: report.and_then(|r| {
                r.inspect_err(|e| tracing::warn!("Failed to load financial report for {}: {}", contract_id, e))
                    .ok()
            }),
            is_favorite: favorite.unwrap_or(false),
        };
        UiMessage::ContractDetailLoaded(Box::new(detail))
    });
}

fn toggle_favorite(app: &mut App, contract_id: i64) {
    let client = app.client.clone();
    app.spawn(async move {
        action_message(
            api::favorites::toggle(&client, api::favorites::CONTRACT, contract_id).await,
            |is_favorite| UiMessage::FavoriteToggled {
                contract_id,
                is_favorite,
            },
        )
    });
}

fn decide(app: &mut App, contract_id: i64, approved: bool) {
    let decision = ApprovalDecision {
        approved,
        comment: non_empty(&app.contracts_ui.decision_comment),
    };
    let client = app.client.clone();
    app.spawn(async move {
        action_message(api::contracts::decide(&client, contract_id, &decision).await, |steps| {
            UiMessage::ApprovalUpdated { contract_id, steps }
        })
    });
}

fn show_detail(app: &mut App, ctx: &egui::Context) {
    let Some(contract_id) = app.contracts_ui.detail_id else {
        return;
    };
    let Some(contract) = app.contracts.iter().find(|c| c.id == contract_id).cloned() else {
        app.contracts_ui.detail_id = None;
        return;
    };

    let can_approve = app.can(Permission::ContractsApprove);
    let mut close = false;
    let mut favorite_clicked = false;
    let mut decision = None;

    modal_window("Detalhes do contrato")
        .default_width(640.0)
        .max_height(560.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("{} - {}", contract.number, contract.title));
                if let Some(detail) = &app.contract_detail {
                    let color = if detail.is_favorite {
                        colors::FAVORITE
                    } else {
                        colors::NEUTRAL
                    };
                    let tooltip = if detail.is_favorite {
                        "Remover dos favoritos"
                    } else {
                        "Adicionar aos favoritos"
                    };
                    if ui
                        .add(egui::Button::new(RichText::new(STAR).size(18.0).color(color)).frame(false))
                        .on_hover_text(tooltip)
                        .clicked()
                    {
                        favorite_clicked = true;
                    }
                }
            });
            ui.label(format!(
                "{} | {} | {}",
                contract.company_name.as_deref().unwrap_or("Sem empresa"),
                contract.status.label(),
                format_brl(contract.total_value)
            ));
            ui.weak(period_label(contract.start_date, contract.end_date));
            if let Some(description) = &contract.description {
                ui.add_space(5.0);
                ui.label(description);
            }
            ui.separator();

            let Some(detail) = &app.contract_detail else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Carregando detalhes...");
                });
                if styled_button(ui, "Fechar").clicked() {
                    close = true;
                }
                return;
            };

            ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                ui.label(RichText::new("Fluxo de aprovação").strong());
                ui.add_space(5.0);
                if detail.approval_flow.is_empty() {
                    ui.weak("Nenhum nível de aprovação aplicável");
                } else {
                    egui::Grid::new("approval_flow_grid")
                        .num_columns(4)
                        .striped(true)
                        .spacing([12.0, 6.0])
                        .show(ui, |ui| {
                            for step in &detail.approval_flow {
                                ui.label(format!("{}. {}", step.order, step.level_name));
                                let color = match step.status {
                                    ApprovalStatus::Pending => colors::WARNING,
                                    ApprovalStatus::Approved => colors::SUCCESS,
                                    ApprovalStatus::Rejected => colors::ERROR,
                                };
                                ui.colored_label(color, step.status.label());
                                ui.label(step.approver_name.as_deref().unwrap_or("-"));
                                ui.label(step.comment.as_deref().unwrap_or(""));
                                ui.end_row();
                            }
                        });

                    if can_approve && let Some(step) = pending_step(&detail.approval_flow) {
                        ui.add_space(8.0);
                        ui.label(format!("Aguardando: {}", step.level_name));
                        ui.add(
                            egui::TextEdit::singleline(&mut app.contracts_ui.decision_comment)
                                .desired_width(360.0)
                                .hint_text("Comentário (opcional)"),
                        );
                        ui.horizontal(|ui| {
                            if primary_button_with_icon(ui, "", "Aprovar").clicked() {
                                decision = Some(true);
                            }
                            if styled_button(ui, "Rejeitar").clicked() {
                                decision = Some(false);
                            }
                        });
                    }
                }

                if let Some(report) = &detail.financial_report {
                    ui.add_space(12.0);
                    ui.label(RichText::new("Relatório financeiro").strong());
                    ui.add_space(5.0);
                    egui::Grid::new("financial_summary_grid")
                        .num_columns(2)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("Valor contratado:");
                            ui.label(format_brl(report.contract_value));
                            ui.end_row();
                            ui.label("Medido:");
                            ui.label(format!(
                                "{} ({:.1}%)",
                                format_brl(report.measured_value),
                                report.percent_executed()
                            ));
                            ui.end_row();
                            ui.label("Pago:");
                            ui.label(format_brl(report.paid_value));
                            ui.end_row();
                            ui.label("Saldo:");
                            ui.label(format_brl(report.balance()));
                            ui.end_row();
                        });
                    ui.add(egui::ProgressBar::new((report.percent_executed() / 100.0) as f32).show_percentage());

                    if !report.entries.is_empty() {
                        ui.add_space(5.0);
                        egui::Grid::new("financial_entries_grid")
                            .num_columns(3)
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                ui.strong("Período");
                                ui.strong("Medido");
                                ui.strong("Pago");
                                ui.end_row();
                                for entry in &report.entries {
                                    ui.label(&entry.period);
                                    ui.label(format_brl(entry.measured));
                                    ui.label(format_brl(entry.paid));
                                    ui.end_row();
                                }
                            });
                    }
                }

                ui.add_space(12.0);
                ui.label(RichText::new("Histórico").strong());
                ui.add_space(5.0);
                if detail.events.is_empty() {
                    ui.weak("Nenhum evento registrado");
                }
                for event in &detail.events {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(
                                event
                                    .created_at
                                    .with_timezone(&chrono::Local)
                                    .format("%d/%m/%Y %H:%M")
                                    .to_string(),
                            )
                            .small()
                            .weak(),
                        );
                        ui.label(&event.event_type);
                        if let Some(description) = &event.description {
                            ui.label(description);
                        }
                        if let Some(user) = &event.user_name {
                            ui.weak(format!("por {user}"));
                        }
                    });
                }
            });

            ui.add_space(10.0);
            ui.separator();
            if styled_button(ui, "Fechar").clicked() {
                close = true;
            }
        });

    if favorite_clicked {
        toggle_favorite(app, contract_id);
    }
    if let Some(approved) = decision {
        decide(app, contract_id, approved);
    }
    if close {
        app.contracts_ui.detail_id = None;
        app.contract_detail = None;
    }
}

fn export(app: &mut App) {
    let filtered: Vec<Contract> = app
        .contracts
        .iter()
        .filter(|c| app.contracts_ui.matches(c))
        .cloned()
        .collect();
    if filtered.is_empty() {
        app.error_message = Some("Nenhum contrato para exportar".to_string());
        return;
    }

    let Some(path) = show_save_dialog(&generate_export_filename("contratos")) else {
        return;
    };

    match export_contracts_to_excel(&filtered, &path) {
        Ok(()) => {
            tracing::info!("Exported {} contracts to {}", filtered.len(), path.display());
            let message = format!("{} contratos exportados para {}", filtered.len(), path.display());
            app.log_success(message.clone());
            app.success_message = Some(message);
        }
        Err(e) => {
            tracing::error!("Contract export failed: {}", e);
            app.log_error(format!("Falha na exportação: {e}"));
            app.error_message = Some("Falha ao exportar contratos".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(id: i64, number: &str, status: ContractStatus) -> Contract {
        Contract {
            id,
            number: number.to_string(),
            title: "Drenagem pluvial".to_string(),
            description: None,
            company_id: Some(1),
            company_name: Some("Construtora Alfa".to_string()),
            status,
            total_value: 1000.0,
            start_date: None,
            end_date: None,
            created_at: None,
        }
    }

    fn step(order: i32, status: ApprovalStatus) -> ApprovalStep {
        ApprovalStep {
            level_id: order as i64,
            level_name: format!("Nível {order}"),
            order,
            status,
            approver_name: None,
            decided_at: None,
            comment: None,
        }
    }

    #[test]
    fn test_form_validation() {
        let mut form = ContractForm {
            number: "CT-01".to_string(),
            title: "Ponte".to_string(),
            total_value: "1.500,00".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_input().unwrap().total_value, 1500.0);

        form.total_value = "abc".to_string();
        assert!(form.to_input().is_err());

        form.total_value = "10".to_string();
        form.start_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        form.end_date = NaiveDate::from_ymd_opt(2024, 4, 1);
        assert_eq!(
            form.to_input().unwrap_err(),
            "Data de término anterior à data de início"
        );
    }

    #[test]
    fn test_form_round_trips_existing_contract() {
        let mut source = contract(1, "CT-9", ContractStatus::Active);
        source.total_value = 2500.5;
        let input = ContractForm::from_contract(&source).to_input().unwrap();
        assert_eq!(input.total_value, 2500.5);
        assert_eq!(input.status, ContractStatus::Active);
    }

    #[test]
    fn test_filters_hide_archived_by_default() {
        let mut state = PanelState::default();
        let archived = contract(1, "CT-1", ContractStatus::Archived);
        let active = contract(2, "CT-2", ContractStatus::Active);

        assert!(!state.matches(&archived));
        assert!(state.matches(&active));

        state.show_archived = true;
        assert!(state.matches(&archived));

        state.show_archived = false;
        state.status_filter = Some(ContractStatus::Archived);
        assert!(state.matches(&archived));
        assert!(!state.matches(&active));
    }

    #[test]
    fn test_search_matches_company() {
        let state = PanelState {
            search: "alfa".to_string(),
            ..Default::default()
        };
        assert!(state.matches(&contract(1, "CT-1", ContractStatus::Draft)));

        let state = PanelState {
            search: "xyz".to_string(),
            ..Default::default()
        };
        assert!(!state.matches(&contract(1, "CT-1", ContractStatus::Draft)));
    }

    #[test]
    fn test_pending_step() {
        let steps = vec![step(1, ApprovalStatus::Approved), step(2, ApprovalStatus::Pending)];
        assert_eq!(pending_step(&steps).map(|s| s.order), Some(2));

        let steps = vec![step(1, ApprovalStatus::Rejected), step(2, ApprovalStatus::Pending)];
        assert!(pending_step(&steps).is_none());

        let steps = vec![step(1, ApprovalStatus::Approved)];
        assert!(pending_step(&steps).is_none());
    }
}
