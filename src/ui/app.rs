//! Main application state and frame loop.

use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::api::{self, ApiClient};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::import_wizard::{ImportWizard, WizardStep};
use crate::models::audit::AuditPage;
use crate::models::catalog::{ApprovalLevel, DocumentCategory, MeasurementUnit};
use crate::models::company::Company;
use crate::models::contract::{ApprovalStep, Contract, ContractEvent, FinancialReport};
use crate::models::import::{ImportPreview, ImportResult};
use crate::models::role::Role;
use crate::models::session::SessionUser;
use crate::models::task::Task;
use crate::models::user::User;
use crate::permissions::{AdminModule, Permission, has_permission};

use super::components::{colors, loading_overlay, modal_window};
use super::{
    audit_panel, catalog_panel, companies_panel, contracts_panel, dashboard, import_panel, roles_panel, tasks_panel,
    users_panel,
};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Contracts,
    Companies,
    Users,
    Roles,
    Catalog,
    Tasks,
    AuditLogs,
    Import,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Painel",
            Panel::Contracts => "Contratos",
            Panel::Companies => "Empresas",
            Panel::Users => "Usuários",
            Panel::Roles => "Perfis",
            Panel::Catalog => "Cadastros",
            Panel::Tasks => "Tarefas",
            Panel::AuditLogs => "Auditoria",
            Panel::Import => "Importação",
        }
    }
}

impl From<AdminModule> for Panel {
    fn from(module: AdminModule) -> Self {
        match module {
            AdminModule::Contracts => Panel::Contracts,
            AdminModule::Companies => Panel::Companies,
            AdminModule::Users => Panel::Users,
            AdminModule::Roles => Panel::Roles,
            AdminModule::MeasurementUnits | AdminModule::ApprovalLevels | AdminModule::DocumentCategories => {
                Panel::Catalog
            }
            AdminModule::Tasks => Panel::Tasks,
            AdminModule::AuditLogs => Panel::AuditLogs,
            AdminModule::Import => Panel::Import,
        }
    }
}

/// Backend collections cached by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Contracts,
    Companies,
    Roles,
    Users,
    Tasks,
    ApprovalLevels,
    MeasurementUnits,
    DocumentCategories,
    AuditLogs,
}

impl Resource {
    /// Lowercase plural used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Contracts => "contratos",
            Resource::Companies => "empresas",
            Resource::Roles => "perfis",
            Resource::Users => "usuários",
            Resource::Tasks => "tarefas",
            Resource::ApprovalLevels => "níveis de aprovação",
            Resource::MeasurementUnits => "unidades de medida",
            Resource::DocumentCategories => "categorias de documentos",
            Resource::AuditLogs => "registros de auditoria",
        }
    }
}

/// Details fetched when a contract is opened.
#[derive(Debug, Clone, Default)]
pub struct ContractDetail {
    pub contract_id: i64,
    pub events: Vec<ContractEvent>,
    pub approval_flow: Vec<ApprovalStep>,
    pub financial_report: Option<FinancialReport>,
    pub is_favorite: bool,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Session
    SessionLoaded(SessionUser),
    LoggedIn { token: String, user: SessionUser },
    LoginFailed(String),
    SessionExpired,

    // Data loading
    ContractsLoaded(Vec<Contract>),
    CompaniesLoaded(Vec<Company>),
    RolesLoaded(Vec<Role>),
    UsersLoaded(Vec<User>),
    TasksLoaded(Vec<Task>),
    ApprovalLevelsLoaded(Vec<ApprovalLevel>),
    MeasurementUnitsLoaded(Vec<MeasurementUnit>),
    DocumentCategoriesLoaded(Vec<DocumentCategory>),
    AuditLoaded(AuditPage),
    ContractDetailLoaded(Box<ContractDetail>),
    LoadFailed { resource: &'static str, error: String },

    // CRUD operations
    Saved { resource: Resource, message: String },
    Deleted { resource: Resource, message: String },
    FavoriteToggled { contract_id: i64, is_favorite: bool },
    ApprovalUpdated { contract_id: i64, steps: Vec<ApprovalStep> },
    Notice(String),
    OperationFailed(String),

    // Import
    ImportPreviewed(ImportPreview),
    ImportPreviewFailed(String),
    ImportFinished(ImportResult),
    ImportFailed(String),
    TemplateSaved(PathBuf),
}

/// Map an action outcome to a message; failures become an error dialog.
pub fn action_message<T>(result: Result<T>, ok: impl FnOnce(T) -> UiMessage) -> UiMessage {
    match result {
        Ok(value) => ok(value),
        Err(AppError::Unauthorized) => UiMessage::SessionExpired,
        Err(e) => {
            tracing::error!("Operation failed: {}", e);
            UiMessage::OperationFailed(e.user_message())
        }
    }
}

/// Map a background load outcome to a message; failures are only logged.
pub fn load_message<T>(resource: &'static str, result: Result<T>, ok: impl FnOnce(T) -> UiMessage) -> UiMessage {
    match result {
        Ok(value) => ok(value),
        Err(AppError::Unauthorized) => UiMessage::SessionExpired,
        Err(e) => UiMessage::LoadFailed {
            resource,
            error: e.to_string(),
        },
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Login dialog state.
#[derive(Default)]
pub struct LoginForm {
    pub open: bool,
    pub email: String,
    pub password: String,
    pub busy: bool,
    pub error: Option<String>,
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub client: ApiClient,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Session
    pub session: Option<SessionUser>,
    pub login: LoginForm,

    // Cached data
    pub contracts: Vec<Contract>,
    pub companies: Vec<Company>,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub approval_levels: Vec<ApprovalLevel>,
    pub measurement_units: Vec<MeasurementUnit>,
    pub document_categories: Vec<DocumentCategory>,
    pub audit: AuditPage,
    pub contract_detail: Option<ContractDetail>,

    // Requests in flight
    pub pending: usize,

    // Per-panel state
    pub contracts_ui: contracts_panel::PanelState,
    pub companies_ui: companies_panel::PanelState,
    pub users_ui: users_panel::PanelState,
    pub roles_ui: roles_panel::PanelState,
    pub catalog_ui: catalog_panel::PanelState,
    pub tasks_ui: tasks_panel::PanelState,
    pub audit_ui: audit_panel::PanelState,
    pub import_wizard: ImportWizard,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
    pub config_path: PathBuf,

    // Dialogs
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, config_path: PathBuf, client: ApiClient, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let login = LoginForm {
            email: config.session.last_email.clone(),
            ..Default::default()
        };
        let audit_ui = audit_panel::PanelState::with_page_size(config.ui.page_size);

        let mut app = Self {
            rt,
            client,
            tx,
            rx,
            current_panel: Panel::default(),
            session: None,
            login,
            contracts: Vec::new(),
            companies: Vec::new(),
            roles: Vec::new(),
            users: Vec::new(),
            tasks: Vec::new(),
            approval_levels: Vec::new(),
            measurement_units: Vec::new(),
            document_categories: Vec::new(),
            audit: AuditPage::default(),
            contract_detail: None,
            pending: 0,
            contracts_ui: Default::default(),
            companies_ui: Default::default(),
            users_ui: Default::default(),
            roles_ui: Default::default(),
            catalog_ui: Default::default(),
            tasks_ui: Default::default(),
            audit_ui,
            import_wizard: ImportWizard::new(),
            log_messages: Vec::new(),
            config,
            config_path,
            error_message: None,
            success_message: None,
        };

        app.contracts_ui.show_archived = app.config.ui.show_archived;

        if app.client.has_token() {
            app.load_session();
        } else {
            app.login.open = true;
        }

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Whether the signed-in user holds `permission`.
    pub fn can(&self, permission: Permission) -> bool {
        self.session.as_ref().is_some_and(|s| has_permission(s, permission))
    }

    /// Run `future` on the runtime and deliver its message to the UI.
    ///
    /// Every spawned request produces exactly one message, which is what keeps
    /// `pending` balanced.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = UiMessage> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let message = future.await;
            let _ = tx.send(message);
        });
    }

    /// Fetch the user behind the stored token.
    pub fn load_session(&mut self) {
        let client = self.client.clone();
        self.spawn(async move {
            match api::auth::me(&client).await {
                Ok(user) => UiMessage::SessionLoaded(user),
                Err(AppError::Unauthorized) => UiMessage::SessionExpired,
                Err(e) => UiMessage::LoginFailed(e.user_message()),
            }
        });
    }

    /// Submit the login dialog.
    pub fn submit_login(&mut self) {
        if self.login.email.trim().is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Informe e-mail e senha".to_string());
            return;
        }
        self.login.busy = true;
        self.login.error = None;

        let client = self.client.clone();
        let email = self.login.email.clone();
        let password = self.login.password.clone();
        self.spawn(async move {
            match api::auth::login(&client, &email, &password).await {
                Ok(response) => UiMessage::LoggedIn {
                    token: response.token,
                    user: response.user,
                },
                Err(AppError::Unauthorized) => UiMessage::LoginFailed("E-mail ou senha inválidos".to_string()),
                Err(e) => UiMessage::LoginFailed(e.user_message()),
            }
        });
    }

    /// Drop the token and show the login dialog.
    pub fn logout(&mut self) {
        self.session = None;
        self.client = self.client.with_token(None);
        self.config.api.token = None;
        self.persist_config();
        self.login.open = true;
        self.login.password.clear();
        self.current_panel = Panel::Dashboard;
        self.log_info("Sessão encerrada");
    }

    /// Write the current configuration back to disk.
    pub fn persist_config(&mut self) {
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Initial loads after sign-in.
    fn load_all(&mut self) {
        self.reload(Resource::Contracts);
        self.reload(Resource::Tasks);
        self.reload(Resource::Companies);
        if self.can(Permission::UsersManage) || self.can(Permission::TasksManage) {
            self.reload(Resource::Users);
        }
        if self.can(Permission::RolesManage) || self.can(Permission::UsersManage) {
            self.reload(Resource::Roles);
        }
        self.reload(Resource::MeasurementUnits);
    }

    /// Data a panel needs when it is opened.
    fn load_for_panel(&mut self, panel: Panel) {
        match panel {
            Panel::Dashboard => {
                self.reload(Resource::Contracts);
                self.reload(Resource::Tasks);
            }
            Panel::Contracts => {
                self.reload(Resource::Contracts);
                self.reload(Resource::Companies);
            }
            Panel::Companies => self.reload(Resource::Companies),
            Panel::Users => {
                self.reload(Resource::Users);
                self.reload(Resource::Roles);
            }
            Panel::Roles => self.reload(Resource::Roles),
            Panel::Catalog => {
                self.reload(Resource::ApprovalLevels);
                self.reload(Resource::MeasurementUnits);
                self.reload(Resource::DocumentCategories);
                self.reload(Resource::Roles);
            }
            Panel::Tasks => {
                self.reload(Resource::Tasks);
                self.reload(Resource::Contracts);
                self.reload(Resource::Users);
            }
            Panel::AuditLogs => self.reload(Resource::AuditLogs),
            Panel::Import => self.reload(Resource::Contracts),
        }
    }

    /// Switch panels and load what the target needs.
    pub fn navigate(&mut self, panel: Panel) {
        if self.current_panel != panel {
            tracing::debug!("Navigating to {}", panel.name());
            self.current_panel = panel;
            self.load_for_panel(panel);
        }
    }

    /// Reload one cached collection from the backend.
    pub fn reload(&mut self, resource: Resource) {
        let client = self.client.clone();
        let label = resource.label();
        match resource {
            Resource::Contracts => self.spawn(async move {
                load_message(label, api::contracts::list_all(&client).await, UiMessage::ContractsLoaded)
            }),
            Resource::Companies => self.spawn(async move {
                load_message(label, api::companies::list_all(&client).await, UiMessage::CompaniesLoaded)
            }),
            Resource::Roles => self.spawn(async move {
                load_message(label, api::roles::list_all(&client).await, UiMessage::RolesLoaded)
            }),
            Resource::Users => self.spawn(async move {
                load_message(label, api::users::list_all(&client).await, UiMessage::UsersLoaded)
            }),
            Resource::Tasks => self.spawn(async move {
                load_message(label, api::tasks::list_all(&client).await, UiMessage::TasksLoaded)
            }),
            Resource::ApprovalLevels => self.spawn(async move {
                load_message(
                    label,
                    api::catalog::list_approval_levels(&client).await,
                    UiMessage::ApprovalLevelsLoaded,
                )
            }),
            Resource::MeasurementUnits => self.spawn(async move {
                load_message(
                    label,
                    api::catalog::list_measurement_units(&client).await,
                    UiMessage::MeasurementUnitsLoaded,
                )
            }),
            Resource::DocumentCategories => self.spawn(async move {
                load_message(
                    label,
                    api::catalog::list_document_categories(&client).await,
                    UiMessage::DocumentCategoriesLoaded,
                )
            }),
            Resource::AuditLogs => {
                let query = self.audit_ui.query();
                self.spawn(async move {
                    load_message(label, api::audit::list(&client, &query).await, UiMessage::AuditLoaded)
                })
            }
        }
    }

    /// Apply one message from the async side.
    fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::SessionLoaded(user) => {
                tracing::info!("Signed in as {}", user.email);
                self.log_success(format!("Conectado como {}", user.name));
                self.session = Some(user);
                self.login.open = false;
                self.load_all();
            }
            UiMessage::LoggedIn { token, user } => {
                self.client = self.client.with_token(Some(token.clone()));
                self.config.api.token = Some(token);
                self.config.session.last_email = user.email.clone();
                self.persist_config();
                self.login.busy = false;
                self.login.password.clear();
                self.handle_message(UiMessage::SessionLoaded(user));
            }
            UiMessage::LoginFailed(e) => {
                self.login.busy = false;
                self.login.open = true;
                self.login.error = Some(e);
            }
            UiMessage::SessionExpired => {
                if self.session.is_some() || !self.login.open {
                    tracing::warn!("Session expired or token rejected");
                    self.log_warning("Sessão expirada");
                }
                self.session = None;
                self.client = self.client.with_token(None);
                self.login.busy = false;
                self.login.open = true;
                if self.import_wizard.is_busy() {
                    match self.import_wizard.step() {
                        WizardStep::Upload => self.import_wizard.upload_failed("Sessão expirada"),
                        _ => self.import_wizard.submit_failed("Sessão expirada"),
                    }
                }
            }
            UiMessage::ContractsLoaded(items) => self.contracts = items,
            UiMessage::CompaniesLoaded(items) => self.companies = items,
            UiMessage::RolesLoaded(items) => self.roles = items,
            UiMessage::UsersLoaded(items) => self.users = items,
            UiMessage::TasksLoaded(items) => self.tasks = items,
            UiMessage::ApprovalLevelsLoaded(items) => self.approval_levels = items,
            UiMessage::MeasurementUnitsLoaded(items) => self.measurement_units = items,
            UiMessage::DocumentCategoriesLoaded(items) => self.document_categories = items,
            UiMessage::AuditLoaded(page) => self.audit = page,
            UiMessage::ContractDetailLoaded(detail) => {
                if self.contracts_ui.detail_id == Some(detail.contract_id) {
                    self.contract_detail = Some(*detail);
                }
            }
            UiMessage::LoadFailed { resource, error } => {
                tracing::warn!("Failed to load {}: {}", resource, error);
            }
            UiMessage::Saved { resource, message } | UiMessage::Deleted { resource, message } => {
                self.close_modal(resource);
                self.log_success(message.clone());
                self.success_message = Some(message);
                self.reload(resource);
            }
            UiMessage::FavoriteToggled {
                contract_id,
                is_favorite,
            } => {
                if let Some(detail) = self.contract_detail.as_mut()
                    && detail.contract_id == contract_id
                {
                    detail.is_favorite = is_favorite;
                }
                self.log_info(if is_favorite {
                    "Contrato adicionado aos favoritos"
                } else {
                    "Contrato removido dos favoritos"
                });
            }
            UiMessage::ApprovalUpdated { contract_id, steps } => {
                if let Some(detail) = self.contract_detail.as_mut()
                    && detail.contract_id == contract_id
                {
                    detail.approval_flow = steps;
                }
                self.contracts_ui.decision_comment.clear();
                self.log_success("Decisão de aprovação registrada");
                self.reload(Resource::Contracts);
            }
            UiMessage::Notice(message) => {
                self.log_success(message.clone());
                self.success_message = Some(message);
            }
            UiMessage::OperationFailed(e) => {
                self.error_message = Some(e.clone());
                self.log_error(e);
            }
            UiMessage::ImportPreviewed(preview) => {
                self.log_info(format!(
                    "Planilha '{}' carregada ({} linhas)",
                    preview.filename, preview.total_rows
                ));
                self.import_wizard.apply_preview(preview);
            }
            UiMessage::ImportPreviewFailed(e) => {
                self.log_error(format!("Falha ao enviar planilha: {e}"));
                self.import_wizard.upload_failed(e.clone());
                self.error_message = Some(e);
            }
            UiMessage::ImportFinished(result) => {
                self.log_success(result.summary_line());
                self.import_wizard.apply_result(result);
            }
            UiMessage::ImportFailed(e) => {
                self.log_error(format!("Falha na importação: {e}"));
                self.import_wizard.submit_failed(e.clone());
                self.error_message = Some(e);
            }
            UiMessage::TemplateSaved(path) => {
                let message = format!("Modelo salvo em {}", path.display());
                self.log_success(message.clone());
                self.success_message = Some(message);
            }
        }
    }

    /// Close whichever modal produced a save or delete of `resource`.
    fn close_modal(&mut self, resource: Resource) {
        match resource {
            Resource::Contracts => self.contracts_ui.screen.close(),
            Resource::Companies => self.companies_ui.screen.close(),
            Resource::Roles => self.roles_ui.screen.close(),
            Resource::Users => self.users_ui.close_modals(),
            Resource::Tasks => self.tasks_ui.screen.close(),
            Resource::ApprovalLevels => self.catalog_ui.approval_levels.close(),
            Resource::MeasurementUnits => self.catalog_ui.units.close(),
            Resource::DocumentCategories => self.catalog_ui.categories.close(),
            Resource::AuditLogs => {}
        }
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            self.handle_message(msg);
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Sistema", |ui| {
                    if ui.button("Painel").clicked() {
                        self.navigate(Panel::Dashboard);
                        ui.close();
                    }
                    ui.separator();
                    let signed_in = self.session.is_some();
                    if ui.add_enabled(signed_in, egui::Button::new("Sair")).clicked() {
                        self.logout();
                        ui.close();
                    }
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if let Some(session) = &self.session {
                        let suffix = if session.is_master { " (master)" } else { "" };
                        ui.label(format!("{}{}", session.name, suffix));
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = match &self.session {
                        Some(_) => (colors::SUCCESS, "Conectado"),
                        None => (colors::NEUTRAL, "Desconectado"),
                    };
                    ui.colored_label(color, format!("{} - {}", text, self.client.base_url()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.pending > 0 {
                            ui.label(format!("{} requisição(ões) em andamento", self.pending));
                            ui.spinner();
                        }
                    });
                });
            });
    }

    /// Render the login dialog.
    fn show_login_dialog(&mut self, ctx: &egui::Context) {
        if !self.login.open {
            return;
        }

        modal_window("Entrar no ConstruSys").show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("E-mail:");
                    ui.add(egui::TextEdit::singleline(&mut self.login.email).desired_width(240.0));
                    ui.end_row();

                    ui.label("Senha:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.login.password)
                            .password(true)
                            .desired_width(240.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !self.login.busy {
                        self.submit_login();
                    }
                    ui.end_row();
                });

            if let Some(e) = &self.login.error {
                ui.add_space(8.0);
                ui.colored_label(colors::ERROR, e);
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.weak(self.client.base_url().to_string());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if self.login.busy {
                        ui.spinner();
                    } else if ui.button("Entrar").clicked() {
                        self.submit_login();
                    }
                });
            });
        });
    }

    /// Render modal dialogs (error, success).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ref error) = self.error_message.clone() {
            modal_window("Erro").show(ctx, |ui| {
                ui.colored_label(colors::ERROR, error);
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    self.error_message = None;
                }
            });
        }

        if let Some(ref msg) = self.success_message.clone() {
            modal_window("Sucesso").show(ctx, |ui| {
                ui.colored_label(colors::SUCCESS, msg);
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    self.success_message = None;
                }
            });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        // Request repaint during async operations
        if self.pending > 0 {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Entre com sua conta para continuar.");
                });
                return;
            }

            let go_back = match self.current_panel {
                Panel::Dashboard => {
                    if let Some(next) = dashboard::show(self, ui) {
                        self.navigate(next);
                    }
                    false
                }
                Panel::Contracts => contracts_panel::show(self, ui),
                Panel::Companies => companies_panel::show(self, ui),
                Panel::Users => users_panel::show(self, ui),
                Panel::Roles => roles_panel::show(self, ui),
                Panel::Catalog => catalog_panel::show(self, ui),
                Panel::Tasks => tasks_panel::show(self, ui),
                Panel::AuditLogs => audit_panel::show(self, ui),
                Panel::Import => import_panel::show(self, ui),
            };
            if go_back {
                self.navigate(Panel::Dashboard);
            }
        });

        self.show_login_dialog(ctx);
        self.show_dialogs(ctx);

        if self.pending > 0 {
            loading_overlay(ctx, "Carregando...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_modules_map_to_panels() {
        assert_eq!(Panel::from(AdminModule::Contracts), Panel::Contracts);
        assert_eq!(Panel::from(AdminModule::MeasurementUnits), Panel::Catalog);
        assert_eq!(Panel::from(AdminModule::DocumentCategories), Panel::Catalog);
        assert_eq!(Panel::from(AdminModule::Import), Panel::Import);
    }

    #[test]
    fn test_action_message_maps_errors() {
        let msg = action_message::<()>(Err(AppError::Unauthorized), |_| UiMessage::Notice(String::new()));
        assert!(matches!(msg, UiMessage::SessionExpired));

        let msg = action_message::<()>(
            Err(AppError::Api {
                status: 409,
                message: "Código duplicado".to_string(),
            }),
            |_| UiMessage::Notice(String::new()),
        );
        assert!(matches!(msg, UiMessage::OperationFailed(m) if m == "Código duplicado"));
    }

    #[test]
    fn test_load_message_swallows_errors() {
        let msg = load_message::<Vec<Task>>("tarefas", Err(AppError::validation("x")), UiMessage::TasksLoaded);
        assert!(matches!(msg, UiMessage::LoadFailed { resource: "tarefas", .. }));

        let msg = load_message("tarefas", Ok(Vec::new()), UiMessage::TasksLoaded);
        assert!(matches!(msg, UiMessage::TasksLoaded(t) if t.is_empty()));
    }
}
