pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod import_wizard;
pub mod models;
pub mod permissions;
pub mod ui;

pub use error::{AppError, Result};
