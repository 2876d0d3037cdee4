pub mod settings_model;
pub mod settings_service;
pub use settings_model::*;
pub use settings_service::{load_settings, save_settings};
