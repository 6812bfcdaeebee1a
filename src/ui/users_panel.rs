//! User management panel with invites and password resets.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, ENVELOPE, KEY, PENCIL, PLUS, TRASH};

use super::app::{App, Resource, UiMessage, action_message};
use super::components::{
    action_button, back_button, confirm_buttons, danger_action_button, modal_window, panel_header,
    primary_button_with_icon, styled_button, styled_button_with_icon,
};
use super::screen_state::{ScreenState, Submission};
use crate::api;
use crate::models::role::Role;
use crate::models::user::{InviteUser, User, UserInput};
use crate::permissions::Permission;

const MIN_PASSWORD_LEN: usize = 8;

fn valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// User form buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role_id: Option<i64>,
    pub active: bool,
    /// Required on create, optional on edit.
    pub password: String,
}

impl UserForm {
    pub fn new() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role_id: user.role_id,
            active: user.active,
            password: String::new(),
        }
    }

    pub fn to_input(&self, creating: bool) -> Result<UserInput, String> {
        if self.name.trim().is_empty() {
            return Err("Nome é obrigatório".to_string());
        }
        if !valid_email(&self.email) {
            return Err("E-mail inválido".to_string());
        }
        let password = if self.password.is_empty() {
            if creating {
                return Err("Senha é obrigatória".to_string());
            }
            None
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!("A senha deve ter ao menos {MIN_PASSWORD_LEN} caracteres"));
        } else {
            Some(self.password.clone())
        };

        Ok(UserInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role_id: self.role_id,
            active: self.active,
            password,
        })
    }
}

/// Invite dialog buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InviteForm {
    pub name: String,
    pub email: String,
    pub role_id: Option<i64>,
}

impl InviteForm {
    pub fn to_request(&self) -> Result<InviteUser, String> {
        if self.name.trim().is_empty() {
            return Err("Nome é obrigatório".to_string());
        }
        if !valid_email(&self.email) {
            return Err("E-mail inválido".to_string());
        }
        Ok(InviteUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role_id: self.role_id,
        })
    }
}

#[derive(Default)]
pub struct PanelState {
    pub screen: ScreenState<UserForm>,
    pub invite: Option<InviteForm>,
    /// User whose password reset awaits confirmation.
    pub reset_target: Option<(i64, String)>,
    pub search: String,
}

impl PanelState {
    pub fn close_modals(&mut self) {
        self.screen.close();
        self.invite = None;
        self.reset_target = None;
    }
}

/// Show the users panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);

    panel_header(ui, "Usuários");

    if !app.can(Permission::UsersManage) {
        ui.label("Você não tem permissão para gerenciar usuários.");
        return go_back;
    }

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Novo usuário").clicked() {
            app.users_ui.screen.create(UserForm::new());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ENVELOPE, "Convidar").clicked() {
            app.users_ui.invite = Some(InviteForm::default());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Atualizar").clicked() {
            app.reload(Resource::Users);
        }

        ui.add_space(20.0);

        ui.label("Buscar:");
        ui.add(
            egui::TextEdit::singleline(&mut app.users_ui.search)
                .desired_width(220.0)
                .hint_text("Nome ou e-mail..."),
        );
    });

    ui.add_space(15.0);

    show_table(app, ui);

    let ctx = ui.ctx();
    if !app.users_ui.screen.is_idle() {
        show_modal(app, ctx);
    }
    if app.users_ui.invite.is_some() {
        show_invite_dialog(app, ctx);
    }
    if app.users_ui.reset_target.is_some() {
        show_reset_dialog(app, ctx);
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let search = app.users_ui.search.trim().to_lowercase();
    let filtered: Vec<&User> = app
        .users
        .iter()
        .filter(|u| search.is_empty() || u.name.to_lowercase().contains(&search) || u.email.contains(&search))
        .collect();

    ui.label(format!("Exibindo {} de {} usuários", filtered.len(), app.users.len()));
    ui.add_space(10.0);

    let mut next_state = None;
    let mut reset_target = None;

    ScrollArea::vertical().id_salt("users_scroll").show(ui, |ui| {
        egui::Grid::new("users_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nome");
                ui.strong("E-mail");
                ui.strong("Perfil");
                ui.strong("Ativo");
                ui.strong("Último acesso");
                ui.strong("Ações");
                ui.end_row();

                for user in filtered {
                    ui.label(&user.name);
                    ui.label(&user.email);
                    if user.is_master {
                        ui.label("Master");
                    } else {
                        ui.label(role_name(&app.roles, user));
                    }
                    ui.label(if user.active { "Sim" } else { "Não" });
                    ui.label(
                        user.last_login_at
                            .map(|t| t.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M").to_string())
                            .unwrap_or("-".to_string()),
                    );

                    ui.horizontal(|ui| {
                        if action_button(ui, PENCIL, "Editar").clicked() {
                            next_state = Some(ScreenState::Editing {
                                id: user.id,
                                form: UserForm::from_user(user),
                            });
                        }
                        ui.add_space(4.0);
                        if action_button(ui, KEY, "Redefinir senha").clicked() {
                            reset_target = Some((user.id, user.name.clone()));
                        }
                        ui.add_space(4.0);
                        if !user.is_master && danger_action_button(ui, TRASH, "Excluir").clicked() {
                            next_state = Some(ScreenState::ConfirmingDelete {
                                id: user.id,
                                label: user.name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });

    if let Some(state) = next_state {
        app.users_ui.screen = state;
    }
    if reset_target.is_some() {
        app.users_ui.reset_target = reset_target;
    }
}

fn role_name<'a>(roles: &'a [Role], user: &'a User) -> &'a str {
    user.role_id
        .and_then(|id| roles.iter().find(|r| r.id == id))
        .map(|r| r.name.as_str())
        .or(user.role_name.as_deref())
        .unwrap_or("-")
}

fn role_combo(ui: &mut Ui, id_salt: &str, roles: &[Role], role_id: &mut Option<i64>) {
    egui::ComboBox::from_id_salt(id_salt)
        .width(240.0)
        .selected_text(
            role_id
                .and_then(|id| roles.iter().find(|r| r.id == id))
                .map(|r| r.name.as_str())
                .unwrap_or("Sem perfil"),
        )
        .show_ui(ui, |ui| {
            if ui.selectable_label(role_id.is_none(), "Sem perfil").clicked() {
                *role_id = None;
            }
            for role in roles {
                if ui.selectable_label(*role_id == Some(role.id), &role.name).clicked() {
                    *role_id = Some(role.id);
                }
            }
        });
}

fn show_modal(app: &mut App, ctx: &egui::Context) {
    if let ScreenState::ConfirmingDelete { label, .. } = &app.users_ui.screen {
        let label = label.clone();
        modal_window("Excluir usuário").show(ctx, |ui| {
            ui.label(format!("Excluir o usuário '{label}'?"));
            ui.add_space(10.0);
            match confirm_buttons(ui, "Excluir") {
                Some(true) => submit(app),
                Some(false) => app.users_ui.screen.close(),
                None => {}
            }
        });
        return;
    }

    let editing = app.users_ui.screen.is_editing();
    let title = if editing { "Editar usuário" } else { "Novo usuário" };

    modal_window(title).default_width(420.0).show(ctx, |ui| {
        let roles = &app.roles;
        let Some(form) = app.users_ui.screen.form_mut() else {
            return;
        };

        ui.add_space(10.0);
        egui::Grid::new("user_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Nome:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(260.0));
                ui.end_row();

                ui.label("E-mail:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(260.0));
                ui.end_row();

                ui.label("Perfil:");
                role_combo(ui, "user_form_role", roles, &mut form.role_id);
                ui.end_row();

                ui.label("Senha:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(200.0)
                        .hint_text(if editing { "Manter atual" } else { "" }),
                );
                ui.end_row();

                ui.label("Ativo:");
                ui.checkbox(&mut form.active, "");
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                app.users_ui.screen.close();
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
    let Some(submission) = app.users_ui.screen.submission() else {
        return;
    };

    let client = app.client.clone();
    match submission {
        Submission::Create(form) => match form.to_input(true) {
            Ok(data) => app.spawn(async move {
                action_message(api::users::create(&client, &data).await, |u| UiMessage::Saved {
                    resource: Resource::Users,
                    message: format!("Usuário '{}' criado", u.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Update(id, form) => match form.to_input(false) {
            Ok(data) => app.spawn(async move {
                action_message(api::users::update(&client, id, &data).await, |u| UiMessage::Saved {
                    resource: Resource::Users,
                    message: format!("Usuário '{}' atualizado", u.name),
                })
            }),
            Err(e) => app.error_message = Some(e),
        },
        Submission::Delete(id) => app.spawn(async move {
            action_message(api::users::delete(&client, id).await, |_| UiMessage::Deleted {
                resource: Resource::Users,
                message: "Usuário excluído".to_string(),
            })
        }),
    }
}

fn show_invite_dialog(app: &mut App, ctx: &egui::Context) {
    let mut send = false;
    let mut cancel = false;

    modal_window("Convidar usuário").default_width(420.0).show(ctx, |ui| {
        let roles = &app.roles;
        let Some(form) = app.users_ui.invite.as_mut() else {
            return;
        };

        ui.label("O convidado receberá um e-mail para definir a própria senha.");
        ui.add_space(10.0);

        egui::Grid::new("invite_form_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Nome:");
                ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(260.0));
                ui.end_row();

                ui.label("E-mail:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(260.0));
                ui.end_row();

                ui.label("Perfil:");
                role_combo(ui, "invite_form_role", roles, &mut form.role_id);
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if styled_button(ui, "Cancelar").clicked() {
                cancel = true;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if primary_button_with_icon(ui, ENVELOPE, "Enviar convite").clicked() {
                    send = true;
                }
            });
        });
    });

    if cancel {
        app.users_ui.invite = None;
        return;
    }
    if !send {
        return;
    }

    let Some(form) = &app.users_ui.invite else {
        return;
    };
    match form.to_request() {
        Ok(data) => {
            let client = app.client.clone();
            app.spawn(async move {
                action_message(api::users::invite(&client, &data).await, |u| UiMessage::Saved {
                    resource: Resource::Users,
                    message: format!("Convite enviado para {}", u.email),
                })
            });
        }
        Err(e) => app.error_message = Some(e),
    }
}

fn show_reset_dialog(app: &mut App, ctx: &egui::Context) {
    let Some((id, name)) = app.users_ui.reset_target.clone() else {
        return;
    };

    modal_window("Redefinir senha").show(ctx, |ui| {
        ui.label(format!("Enviar a '{name}' um e-mail de redefinição de senha?"));
        ui.add_space(10.0);
        match confirm_buttons(ui, "Redefinir") {
            Some(true) => {
                let client = app.client.clone();
                app.spawn(async move {
                    action_message(api::users::reset_password(&client, id).await, |_| UiMessage::Saved {
                        resource: Resource::Users,
                        message: format!("Redefinição de senha enviada para {name}"),
                    })
                });
                app.users_ui.reset_target = None;
            }
            Some(false) => app.users_ui.reset_target = None,
            None => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UserForm {
        UserForm {
            name: "Ana Souza".to_string(),
            email: " Ana@Obra.com.br ".to_string(),
            ..UserForm::new()
        }
    }

    #[test]
    fn test_create_requires_password() {
        assert_eq!(form().to_input(true).unwrap_err(), "Senha é obrigatória");

        let mut f = form();
        f.password = "curta".to_string();
        assert!(f.to_input(true).is_err());

        f.password = "segura123".to_string();
        let input = f.to_input(true).unwrap();
        assert_eq!(input.email, "ana@obra.com.br");
        assert_eq!(input.password.as_deref(), Some("segura123"));
    }

    #[test]
    fn test_edit_keeps_password_when_blank() {
        let input = form().to_input(false).unwrap();
        assert!(input.password.is_none());
    }

    #[test]
    fn test_invite_validates_email() {
        let invite = InviteForm {
            name: "Carlos".to_string(),
            email: "carlos".to_string(),
            role_id: None,
        };
        assert_eq!(invite.to_request().unwrap_err(), "E-mail inválido");
        assert!(valid_email("carlos@empresa.com"));
        assert!(!valid_email("@empresa.com"));
    }

    #[test]
    fn test_close_modals() {
        let mut state = PanelState {
            invite: Some(InviteForm::default()),
            reset_target: Some((1, "Ana".to_string())),
            ..Default::default()
        };
        state.screen.create(UserForm::new());
        state.close_modals();
        assert!(state.screen.is_idle());
        assert!(state.invite.is_none());
        assert!(state.reset_target.is_none());
    }
}
