//! Extension module lifecycle.
//!
//! The only process-wide state is the style handle: the resolved theme the
//! dialogs draw with. [`initialize`] installs it and [`shutdown`] removes it;
//! the two calls are paired.

use std::sync::Mutex;

use crate::model::Config;
use crate::tui::theme::Theme;

static STYLE: Mutex<Option<Theme>> = Mutex::new(None);

/// Capabilities the extension registers with its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// Context-menu items for selections and folder backgrounds
    Menu,
    /// Per-entry emblems
    Info,
}

const PROVIDER_TYPES: [ProviderType; 2] = [ProviderType::Menu, ProviderType::Info];

/// Error type for module lifecycle calls
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("annotations module is already initialized")]
    AlreadyInitialized,
}

/// Install the style handle built from `config`.
pub fn initialize(config: &Config) -> Result<(), ModuleError> {
    let mut style = STYLE.lock().unwrap_or_else(|e| e.into_inner());
    if style.is_some() {
        return Err(ModuleError::AlreadyInitialized);
    }
    *style = Some(Theme::from_config(&config.ui));
    Ok(())
}

/// Remove the style handle. Returns false if the module wasn't initialized.
pub fn shutdown() -> bool {
    STYLE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
        .is_some()
}

/// The installed theme, or the default one outside an initialized module.
pub fn style() -> Theme {
    STYLE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .unwrap_or_default()
}

pub fn provider_types() -> &'static [ProviderType] {
    &PROVIDER_TYPES
}
