// Settings module
// Loads and saves overlay settings through a preference store

mod keys;
mod mapper;
mod service;

pub use service::SettingsService;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value '{value}' for preference '{key}'")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
