//! ConstruSys - Desktop client for construction contract management.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use construsys as app;

use app::api::ApiClient;
use app::config::{AppConfig, ConfigLoadResult};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop client for construction contract management.
#[derive(Parser)]
#[command(name = "construsys")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Override the backend address from the config file
    #[arg(long)]
    api_url: Option<String>,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

/// Console plus daily rolling file output. Keep the guard alive until exit.
fn init_logging(config: &AppConfig) -> anyhow::Result<WorkerGuard> {
    let directory = config.log_directory();
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(&directory, "construsys.log"));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => LaunchMode::Normal(config),
        ConfigLoadResult::Missing => LaunchMode::Setup(SetupWizard::default(), None),
        ConfigLoadResult::Invalid(e) => LaunchMode::Setup(SetupWizard::default(), Some(e.to_string())),
    };

    let logging_config = match &launch_mode {
        LaunchMode::Normal(config) => config.clone(),
        LaunchMode::Setup(wizard, _) => wizard.config.clone(),
    };
    let _guard = init_logging(&logging_config)?;

    tracing::info!("ConstruSys starting...");
    if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
    }
    tracing::info!("Config path: {:?}", config_path);

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    match launch_mode {
        LaunchMode::Normal(config) => {
            tracing::info!("Config loaded successfully");
            run_main_app(config, config_path, cli.api_url, rt)
        }
        LaunchMode::Setup(mut wizard, error) => {
            match &error {
                Some(e) => tracing::warn!("Config invalid: {}", e),
                None => tracing::info!("Config missing, starting setup wizard"),
            }
            if let Some(url) = cli.api_url {
                wizard.config.api.base_url = url;
            }
            run_setup_wizard(wizard, error, config_path, rt)
        }
    }
}

fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Run the setup wizard.
fn run_setup_wizard(
    wizard: SetupWizard,
    initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ConstruSys - Configuração")
            .with_inner_size([640.0, 520.0])
            .with_min_inner_size([520.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "ConstruSys - Configuração",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Setup window failed: {e}"))
}

/// Run the main application.
///
/// `api_url` only affects this run; the saved config keeps its own address.
fn run_main_app(
    config: AppConfig,
    config_path: PathBuf,
    api_url: Option<String>,
    rt: tokio::runtime::Runtime,
) -> anyhow::Result<()> {
    let mut api = config.api.clone();
    if let Some(url) = api_url {
        tracing::info!("API address overridden: {}", url);
        api.base_url = url;
    }
    let client = ApiClient::new(&api).context("Failed to create API client")?;
    tracing::info!("Backend: {}", client.base_url());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ConstruSys")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ConstruSys",
        options,
        Box::new(|cc| {
            install_fonts(&cc.egui_ctx);
            Ok(Box::new(App::new(config, config_path, client, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Main window failed: {e}"))
}
