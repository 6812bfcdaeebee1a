//! GUI panels and application state.

pub mod app;
pub mod audit_panel;
pub mod catalog_panel;
pub mod companies_panel;
pub mod components;
pub mod contracts_panel;
pub mod dashboard;
pub mod import_panel;
pub mod roles_panel;
pub mod screen_state;
pub mod setup_wizard;
pub mod tasks_panel;
pub mod users_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
