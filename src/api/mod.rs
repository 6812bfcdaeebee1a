//! Typed bindings for the ConstruSys REST backend.

pub mod audit;
pub mod auth;
pub mod catalog;
pub mod client;
pub mod companies;
pub mod contracts;
pub mod favorites;
pub mod import;
pub mod roles;
pub mod tasks;
pub mod users;

pub use client::ApiClient;
