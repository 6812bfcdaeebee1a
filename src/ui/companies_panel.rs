//! Company management panel.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, confirm_buttons, danger_action_button, modal_window, non_empty, panel_header,
    primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::models::company::{Company, CompanyInput, normalize_cnpj};
use crate::permissions::Permission;

/// Company form buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyForm {
    pub name: String,
    pub cnpj: String,
    pub email: String,
    pub phone: String,
    pub active: bool,
}

impl CompanyForm {
    pub fn new() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            cnpj: company.cnpj.clone().unwrap_or_default(),
            email: company.email.clone().unwrap_or_default(),
            phone: company.phone.clone().unwrap_or_default(),
            active: company.active,
        }
    }

    /// Validate and build the request body.
    pub fn to_input(&self) -> Result<CompanyInput, String> {
        if self.name.trim().is_empty() {
            return Err("Razão social é obrigatória".to_string());
        }
        let cnpj = match non_empty(&self.cnpj) {
            None => None,
            Some(raw) => Some(normalize_cnpj(&raw).ok_or_else(|| "CNPJ deve ter 14 dígitos".to_string())?),
        };

        Ok(CompanyInput {
            name: self.name.trim().to_string(),
            cnpj,
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
            active: self.active,
        })
    }
}

#[derive(Default)]
pub struct PanelState {
    pub screen: ScreenState<CompanyForm>,
    pub search: String,
}

/// Show the companies panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Empresas");

    let can_manage = app.can(Permission::CompaniesManage);

    ui.horizontal(|ui| {
        if can_manage && primary_button_with_icon(ui, PLUS, "Nova empresa").clicked() {
            app.companies_ui.screen.create(CompanyForm::new());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            app.reload(Resource::Companies);
        }

        ui.add_space(20.0);

        ui.label("Buscar:");
        ui.add(
            egui::TextEdit::singleline(&mut app.companies_ui.search)
                .desired_width(220.0)
                .hint_text("Nome ou CNPJ..."),
        );
    });

    ui.add_space(15.0);

    show_table(app, ui, can_manage);

    if !app.companies_ui.screen.is_idle() {
        show_modal(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui, can_manage: bool) {
    let search = app.companies_ui.search.to_lowercase();
    let filtered: Vec<&Company> = app
        .companies
        .iter()
        .filter(|c| {
            search.is_empty()
                || c.name.to_lowercase().contains(&search)
                || c.cnpj.as_deref().is_some_and(|cnpj| cnpj.contains(&search))
        })
        .collect();

    ui.label(format!("Exibindo {} de {} empresas", filtered.len(), app.companies.len()));
    ui.add_space(10.0);

    let mut next_state = None;

    ScrollArea::vertical().id_salt("companies_scroll").show(ui, |ui| {
        egui::Grid::new("companies_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Razão social");
                ui.strong("CNPJ");
                ui.strong("E-mail");
                ui.strong("Telefone");
                ui.strong("Ativa");
                ui.strong("Ações");
                ui.end_row();

                for company in filtered {
                    ui.label(&company.name);
                    ui.label(company.cnpj.as_deref().unwrap_or("-"));
                    ui.label(company.email.as_deref().unwrap_or("-"));
                    ui.label(company.phone.as_deref().unwrap_or("-"));
                    ui.label(if company.active { "Sim" } else { "Não" });

                    ui.horizontal(|ui| {
                        if !can_manage {
                            return;
                        }
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            next_state = Some(ScreenState::Editing {
                                id: company.id,
                                form: CompanyForm::from_company(company),
                            });
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Excluir").clicked() {
                            next_state = Some(ScreenState::ConfirmingDelete {
                                id: company.id,
                                label: company.name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.companies_ui.screen = state;
    }
}

fn show_modal(app: &mut App, ctx: &egui::Context) {
    if let ScreenState::ConfirmingDelete { label, .. } = &app.companies_ui.screen {
        let label = label.clone();
        modal_window("Excluir empresa").show(ctx, |ui| {
            ui.label(format!("Excluir a empresa '{label}'?"));
            ui.add_space(10.0);
            match confirm_buttons(ui, "Excluir") {
                Some(true) => submit(app),
                Some(false) => app.companies_ui.screen.close(),
                None => {}
            }
        });
        return;
    }

    let title = if app.companies_ui.screen.is_editing() {
        "Editar empresa"
    } else {
        "Nova empresa"
    };

    modal_window(title).default_width(420.0).show(ctx, |ui| {
        let Some(form) = app.companies_ui.screen.form_mut() else {
            return;
        };

        ui.add_space(10.0);
        egui::Grid::new("company_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Razão social:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(260.0));
                ui.end_row();

                ui.label("CNPJ:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.cnpj)
                        .desired_width(180.0)
                        .hint_text("00.000.000/0000-00"),
                );
                ui.end_row();

                ui.label("E-mail:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(260.0));
                ui.end_row();

                ui.label("Telefone:");
                ui.add(egui::TextEdit::singleline(&mut form.phone).desired_width(180.0));
                ui.end_row();

                ui.label("Ativa:");
                ui.checkbox(&mut form.active, "");
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                app.companies_ui.screen.close();
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
    let Some(submission) = app.companies_ui.screen.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::companies::create(&client, &data).await, |c| UiMessage::Saved {
                    resource: Resource::Companies,
                    message: format!("Empresa '{}' cadastrada", c.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::companies::update(&client, id, &data).await, |c| UiMessage::Saved {
                    resource: Resource::Companies,
                    message: format!("Empresa '{}' atualizada", c.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::companies::delete(&client, id).await, |_| UiMessage::Deleted {
                resource: Resource::Companies,
                message: "Empresa excluída".to_string(),
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_name() {
        let form = CompanyForm::new();
        assert!(form.to_input().is_err());
    }

    #[test]
    fn test_form_normalizes_cnpj_and_blanks() {
        let form = CompanyForm {
            name: " Construtora Alfa ".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            email: "  ".to_string(),
            ..CompanyForm::new()
        };
        let input = form.to_input().unwrap();
        assert_eq!(input.name, "Construtora Alfa");
        assert_eq!(input.cnpj.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(input.email, None);
        assert!(input.active);
    }

    #[test]
    fn test_form_rejects_short_cnpj() {
        let form = CompanyForm {
            name: "Beta".to_string(),
            cnpj: "123".to_string(),
            ..CompanyForm::new()
        };
        assert!(form.to_input().is_err());
    }
}
