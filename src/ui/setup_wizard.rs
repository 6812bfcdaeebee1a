//! First-run setup wizard: server address, connection test and sign-in.

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui::{self, RichText};

use super::components::colors;
use crate::api::{self, ApiClient};
use crate::config::AppConfig;
use crate::models::session::LoginResponse;

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// Server reachability test state.
    pub server_test_state: ConnectionTestState,
    /// Sign-in test state.
    pub login_state: ConnectionTestState,
    /// Name of the user who signed in.
    pub signed_in_as: Option<String>,
    /// Wizard completed flag.
    pub completed: bool,
    /// Timeout input as string for text editing.
    timeout_input: String,
    password: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SetupWizard {
    /// Start from `config`, usually the defaults or a config that failed validation.
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            timeout_input: config.api.timeout_secs.to_string(),
            config,
            server_test_state: ConnectionTestState::NotTested,
            login_state: ConnectionTestState::NotTested,
            signed_in_as: None,
            completed: false,
            password: String::new(),
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true, // Welcome - always can proceed
            1 => self.validate_server_step().is_ok() && matches!(self.server_test_state, ConnectionTestState::Success),
            2 => matches!(self.login_state, ConnectionTestState::Success),
            3 => true, // Confirmation
            _ => false,
        }
    }

    /// Validate server step inputs.
    fn validate_server_step(&self) -> Result<(), String> {
        let url = self.config.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err("O endereço deve começar com http:// ou https://".to_string());
        }
        if self.config.api.timeout_secs < 1 || self.config.api.timeout_secs > 300 {
            return Err("O tempo limite deve estar entre 1 e 300 segundos".to_string());
        }
        Ok(())
    }

    /// Server fields changed: earlier test results no longer apply.
    fn invalidate_tests(&mut self) {
        self.server_test_state = ConnectionTestState::NotTested;
        self.login_state = ConnectionTestState::NotTested;
        self.config.api.token = None;
        self.signed_in_as = None;
    }

    /// Store a successful sign-in.
    fn apply_login(&mut self, response: LoginResponse) {
        self.config.api.token = Some(response.token);
        self.config.session.last_email = response.user.email;
        self.signed_in_as = Some(response.user.name);
        self.login_state = ConnectionTestState::Success;
        self.password.clear();
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Bem-vindo",
            1 => "Servidor",
            2 => "Acesso",
            3 => "Confirmação",
            _ => "Configuração",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    server_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
    login_rx: Option<mpsc::Receiver<Result<LoginResponse, String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            rt,
            config_path,
            server_test_rx: None,
            login_rx: None,
        }
    }

    fn client(&self) -> Result<ApiClient, String> {
        ApiClient::new(&self.wizard.config.api).map_err(|e| e.to_string())
    }

    /// Test server reachability asynchronously.
    fn start_server_test(&mut self) {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                self.wizard.server_test_state = ConnectionTestState::Failed(e);
                return;
            }
        };
        let (tx, rx) = mpsc::channel();
        self.server_test_rx = Some(rx);
        self.wizard.server_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = client.test_connection().await.map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
    }

    /// Sign in asynchronously to obtain a token.
    fn start_login(&mut self) {
        let client = match self.client() {
            Ok(client) => client.with_token(None),
            Err(e) => {
                self.wizard.login_state = ConnectionTestState::Failed(e);
                return;
            }
        };
        let email = self.wizard.config.session.last_email.trim().to_string();
        let password = self.wizard.password.clone();
        let (tx, rx) = mpsc::channel();
        self.login_rx = Some(rx);
        self.wizard.login_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = api::auth::login(&client, &email, &password).await.map_err(|e| {
                if e.is_unauthorized() {
                    "E-mail ou senha inválidos".to_string()
                } else {
                    e.user_message()
                }
            });
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.server_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.server_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.server_test_rx = None;
        }

        if let Some(rx) = &self.login_rx
            && let Ok(result) = rx.try_recv()
        {
            match result {
                Ok(response) => {
                    tracing::info!("Setup sign-in succeeded for {}", response.user.email);
                    self.wizard.apply_login(response);
                }
                Err(e) => self.wizard.login_state = ConnectionTestState::Failed(e),
            }
            self.login_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async test results
        self.poll_test_results();

        // Request repaint while testing
        if matches!(self.wizard.server_test_state, ConnectionTestState::Testing)
            || matches!(self.wizard.login_state, ConnectionTestState::Testing)
        {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Erro de configuração")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Configuração do ConstruSys").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Etapa {} de {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                let action = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        StepAction::None
                    }
                    1 => show_server_step(ui, &mut self.wizard),
                    2 => show_login_step(ui, &mut self.wizard),
                    3 => {
                        show_confirmation_step(ui, &self.wizard);
                        StepAction::None
                    }
                    _ => StepAction::None,
                };

                match action {
                    StepAction::TestServer => self.start_server_test(),
                    StepAction::Login => self.start_login(),
                    StepAction::None => {}
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Voltar").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Começar >"
                            } else {
                                "Avançar >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else {
                            // Final step - Save & Exit
                            if ui.button("Salvar e sair").clicked() {
                                self.wizard.completed = true;
                            }
                        }
                    });
                });
            });
        });

        // Handle completion
        if self.wizard.completed {
            match self.wizard.config.save(&self.config_path) {
                Ok(()) => {
                    tracing::info!("Configuration saved to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    self.initial_error = Some(format!("Falha ao salvar a configuração: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

/// Request raised by a step's buttons.
enum StepAction {
    None,
    TestServer,
    Login,
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Bem-vindo ao ConstruSys!");
    ui.add_space(10.0);
    ui.label("Este assistente ajuda a conectar o aplicativo ao servidor.");
    ui.add_space(20.0);
    ui.label("Você vai precisar de:");
    ui.add_space(5.0);
    ui.label("  - Endereço do servidor ConstruSys");
    ui.label("  - E-mail e senha de acesso");
}

fn show_test_state(ui: &mut egui::Ui, state: &ConnectionTestState, success_text: &str) {
    match state {
        ConnectionTestState::NotTested => {
            ui.label("Não testado");
        }
        ConnectionTestState::Testing => {
            ui.spinner();
            ui.label("Testando...");
        }
        ConnectionTestState::Success => {
            ui.colored_label(colors::SUCCESS, success_text);
        }
        ConnectionTestState::Failed(e) => {
            ui.colored_label(colors::ERROR, format!("Falhou: {}", e));
        }
    }
}

fn show_server_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> StepAction {
    let mut action = StepAction::None;
    let mut changed = false;

    egui::Grid::new("server_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Endereço da API:");
            changed |= ui
                .add(egui::TextEdit::singleline(&mut wizard.config.api.base_url).desired_width(320.0))
                .changed();
            ui.end_row();

            ui.label("Tempo limite (s):");
            if ui.text_edit_singleline(&mut wizard.timeout_input).changed()
                && let Ok(t) = wizard.timeout_input.trim().parse()
            {
                wizard.config.api.timeout_secs = t;
                changed = true;
            }
            ui.end_row();
        });

    if changed {
        wizard.invalidate_tests();
    }

    if let Err(e) = wizard.validate_server_step() {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, e);
    }

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.server_test_state, ConnectionTestState::Testing);
        let valid = wizard.validate_server_step().is_ok();
        if ui
            .add_enabled(!testing && valid, egui::Button::new("Testar conexão"))
            .clicked()
        {
            action = StepAction::TestServer;
        }

        ui.add_space(10.0);
        show_test_state(ui, &wizard.server_test_state, "Servidor acessível!");
    });

    action
}

fn show_login_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> StepAction {
    let mut action = StepAction::None;

    ui.label("Entre com sua conta para salvar a sessão neste computador.");
    ui.add_space(10.0);

    egui::Grid::new("login_step_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("E-mail:");
            ui.text_edit_singleline(&mut wizard.config.session.last_email);
            ui.end_row();

            ui.label("Senha:");
            ui.add(egui::TextEdit::singleline(&mut wizard.password).password(true));
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.login_state, ConnectionTestState::Testing);
        let filled = !wizard.config.session.last_email.trim().is_empty() && !wizard.password.is_empty();
        if ui.add_enabled(!testing && filled, egui::Button::new("Entrar")).clicked() {
            action = StepAction::Login;
        }

        ui.add_space(10.0);
        let success = match &wizard.signed_in_as {
            Some(name) => format!("Conectado como {name}"),
            None => "Conectado".to_string(),
        };
        show_test_state(ui, &wizard.login_state, &success);
    });

    action
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard) {
    ui.label("Revise a configuração:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Servidor");
        ui.label(format!("  {}", wizard.config.api.base_url));
        ui.label(format!("  Tempo limite: {} s", wizard.config.api.timeout_secs));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Acesso");
        match &wizard.signed_in_as {
            Some(name) => ui.label(format!("  {} ({})", name, wizard.config.session.last_email)),
            None => ui.label("  Não conectado"),
        };
    });

    ui.add_space(20.0);
    ui.label("Clique em 'Salvar e sair' para gravar a configuração.");
    ui.label("Depois, abra o aplicativo novamente.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SessionUser;
    use crate::permissions::PermissionSet;

    #[test]
    fn test_server_step_requires_successful_test() {
        let mut wizard = SetupWizard::default();
        wizard.current_step = 1;
        assert!(!wizard.can_proceed());

        wizard.server_test_state = ConnectionTestState::Success;
        assert!(wizard.can_proceed());

        wizard.config.api.base_url = "localhost:3001".to_string();
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_invalidate_clears_login() {
        let mut wizard = SetupWizard::default();
        wizard.apply_login(LoginResponse {
            token: "abc".to_string(),
            user: SessionUser {
                id: 1,
                name: "Ana".to_string(),
                email: "ana@obra.com.br".to_string(),
                is_master: false,
                permissions: PermissionSet::none(),
            },
        });
        wizard.current_step = 2;
        assert!(wizard.can_proceed());
        assert_eq!(wizard.config.api.token.as_deref(), Some("abc"));
        assert_eq!(wizard.config.session.last_email, "ana@obra.com.br");

        wizard.invalidate_tests();
        assert!(!wizard.can_proceed());
        assert!(wizard.config.api.token.is_none());
    }
}
