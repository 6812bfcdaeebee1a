//! Role management panel with the permission matrix.

use std::collections::BTreeSet;

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, colors, confirm_buttons, danger_action_button, modal_window, non_empty,
    panel_header, primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::models::role::{Role, RoleInput};
use crate::permissions::{AdminModule, Permission, PermissionSet};

/// Role form buffer.
///
/// `granted` survives toggling `grant_all` so the individual picks come back
/// when full access is switched off again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
    pub grant_all: bool,
    pub granted: BTreeSet<Permission>,
}

impl RoleForm {
    pub fn from_role(role: &Role) -> Self {
        let (grant_all, granted) = match &role.permissions {
            PermissionSet::All => (true, BTreeSet::new()),
            PermissionSet::Only(set) => (false, set.clone()),
        };
        Self {
            name: role.name.clone(),
            description: role.description.clone().unwrap_or_default(),
            grant_all,
            granted,
        }
    }

    pub fn permissions(&self) -> PermissionSet {
        if self.grant_all {
            PermissionSet::All
        } else {
            PermissionSet::Only(self.granted.clone())
        }
    }

    pub fn toggle(&mut self, permission: Permission, granted: bool) {
        if granted {
            self.granted.insert(permission);
        } else {
            self.granted.remove(&permission);
        }
    }

    pub fn to_input(&self) -> Result<RoleInput, String> {
        if self.name.trim().is_empty() {
            return Err("Nome do perfil é obrigatório".to_string());
        }
        Ok(RoleInput {
            name: self.name.trim().to_string(),
            description: non_empty(&self.description),
            permissions: self.permissions(),
        })
    }

    /// Modules a user holding this role would see.
    pub fn visible_modules(&self) -> Vec<AdminModule> {
        let preview = RoleInput {
            name: String::new(),
            description: None,
            permissions: self.permissions(),
        };
        AdminModule::visible_for(&preview)
    }
}

#[derive(Default)]
pub struct PanelState {
    pub screen: ScreenState<RoleForm>,
}

fn permission_summary(permissions: &PermissionSet) -> String {
    match permissions.count() {
        None => "Acesso total".to_string(),
        Some(0) => "Nenhuma".to_string(),
        Some(n) => format!("{n} de {}", Permission::ALL.len()),
    }
}

/// Show the roles panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Perfis de acesso");

    if !app.can(Permission::RolesManage) {
        ui.label("Você não tem permissão para gerenciar perfis.");
        return go_back;
    }

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Novo perfil").clicked() {
            app.roles_ui.screen.create(RoleForm::default());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            app.reload(Resource::Roles);
        }
    });

    ui.add_space(15.0);

    let mut next_state = None;

    ScrollArea::vertical().id_salt("roles_scroll").show(ui, |ui| {
        egui::Grid::new("roles_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nome");
                ui.strong("Descrição");
                ui.strong("Permissões");
                ui.strong("Usuários");
                ui.strong("Ações");
                ui.end_row();

                for role in &app.roles {
                    ui.label(&role.name);
                    ui.label(role.description.as_deref().unwrap_or("-"));
                    ui.label(permission_summary(&role.permissions));
                    ui.label(role.user_count.map(|n| n.to_string()).unwrap_or("-".to_string()));

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            next_state = Some(ScreenState::Editing {
                                id: role.id,
                                form: RoleForm::from_role(role),
                            });
                        }
                        ui.add_space(4.0);
                        let in_use = role.user_count.unwrap_or(0) > 0;
                        ui.add_enabled_ui(!in_use, |ui| {
                            let tooltip = if in_use {
                                "Perfil em uso por usuários"
                            } else {
                                "Excluir"
                            };
                            if danger_action_button(ui, TRASH, tooltip).clicked() {
                                next_state = Some(ScreenState::ConfirmingDelete {
                                    id: role.id,
                                    label: role.name.clone(),
                                });
                            }
                        });
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.roles_ui.screen = state;
    }

    if !app.roles_ui.screen.is_idle() {
        show_modal(app, ui.ctx());
    }

    go_back
}

fn show_modal(app: &mut App, ctx: &egui::Context) {
    if let ScreenState::ConfirmingDelete { label, .. } = &app.roles_ui.screen {
        let label = label.clone();
        modal_window("Excluir perfil").show(ctx, |ui| {
            ui.label(format!("Excluir o perfil '{label}'?"));
            ui.add_space(10.0);
            match confirm_buttons(ui, "Excluir") {
                Some(true) => submit(app),
                Some(false) => app.roles_ui.screen.close(),
                None => {}
            }
        });
        return;
    }

    let title = if app.roles_ui.screen.is_editing() {
        "Editar perfil"
    } else {
        "Novo perfil"
    };

    modal_window(title).default_width(560.0).show(ctx, |ui| {
        let Some(form) = app.roles_ui.screen.form_mut() else {
            return;
        };

        ui.add_space(10.0);
        egui::Grid::new("role_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Nome:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(280.0));
                ui.end_row();

                ui.label("Descrição:");
                ui.add(egui::TextEdit::singleline(&mut form.description).desired_width(280.0));
                ui.end_row();
            });

        ui.add_space(10.0);
        ui.checkbox(&mut form.grant_all, RichText::new("Acesso total (todas as permissões)").strong());
        ui.add_space(5.0);

        ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
            egui::Grid::new("role_permissions_grid")
                .num_columns(2)
                .spacing([20.0, 4.0])
                .show(ui, |ui| {
                    for (idx, permission) in Permission::ALL.into_iter().enumerate() {
                        let mut checked = form.grant_all || form.granted.contains(&permission);
                        let response = ui.add_enabled(!form.grant_all, egui::Checkbox::new(&mut checked, permission.label()));
                        if response.changed() {
                            form.toggle(permission, checked);
                        }
                        if idx % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });
        });

        ui.add_space(10.0);
        let modules = form.visible_modules();
        ui.label(RichText::new("Módulos visíveis").small().strong());
        if modules.is_empty() {
            ui.colored_label(colors::WARNING, "Nenhum módulo administrativo");
        } else {
            let titles: Vec<&str> = modules.iter().map(|m| m.title()).collect();
            ui.weak(titles.join(", "));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                app.roles_ui.screen.close();
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
    let Some(submission) = app.roles_ui.screen.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::roles::create(&client, &data).await, |r| UiMessage::Saved {
                    resource: Resource::Roles,
                    message: format!("Perfil '{}' criado", r.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input() {
            Ok(data) => app.spawn(async move {
                action_message(api::roles::update(&client, id, &data).await, |r| UiMessage::Saved {
                    resource: Resource::Roles,
                    message: format!("Perfil '{}' atualizado", r.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::roles::delete(&client, id).await, |_| UiMessage::Deleted {
                resource: Resource::Roles,
                message: "Perfil excluído".to_string(),
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_all_keeps_individual_picks() {
        let mut form = RoleForm {
            name: "Fiscal".to_string(),
            ..Default::default()
        };
        form.toggle(Permission::ContractsView, true);
        form.grant_all = true;
        assert_eq!(form.permissions(), PermissionSet::All);

        form.grant_all = false;
        assert_eq!(form.permissions(), PermissionSet::only([Permission::ContractsView]));
    }

    #[test]
    fn test_visible_modules_preview() {
        let mut form = RoleForm::default();
        assert_eq!(form.visible_modules(), vec![AdminModule::Tasks]);

        form.toggle(Permission::ImportItems, true);
        assert!(form.visible_modules().contains(&AdminModule::Import));

        form.grant_all = true;
        assert_eq!(form.visible_modules().len(), AdminModule::ALL.len());
    }

    #[test]
    fn test_from_role_round_trip() {
        let role = Role {
            id: 4,
            name: "Engenharia".to_string(),
            description: Some("Equipe técnica".to_string()),
            permissions: PermissionSet::only([Permission::ContractsEdit, Permission::TasksManage]),
            user_count: Some(2),
        };
        let input = RoleForm::from_role(&role).to_input().unwrap();
        assert_eq!(input.permissions, role.permissions);
        assert_eq!(input.description.as_deref(), Some("Equipe técnica"));
    }

    #[test]
    fn test_permission_summary() {
        assert_eq!(permission_summary(&PermissionSet::All), "Acesso total");
        assert_eq!(permission_summary(&PermissionSet::none()), "Nenhuma");
        assert_eq!(
            permission_summary(&PermissionSet::only([Permission::UsersManage])),
            format!("1 de {}", Permission::ALL.len())
        );
    }
}
