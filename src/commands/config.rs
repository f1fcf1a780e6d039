use crate::config::BoothConfig;
use std::sync::{Arc, RwLock};
use tauri::command;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: Arc<RwLock<BoothConfig>> = Arc::new(RwLock::new(BoothConfig::load_or_default()));
}

/// Snapshot of the live configuration for other commands.
pub(crate) fn current_config() -> Result<BoothConfig, String> {
    GLOBAL_CONFIG
        .read()
        .map(|config| config.clone())
        .map_err(|e| e.to_string())
}

/// Get the current configuration
#[command]
pub async fn get_config() -> Result<BoothConfig, String> {
    current_config()
}

/// Validate, apply and persist a new configuration
#[command]
pub async fn update_config(new_config: BoothConfig) -> Result<(), String> {
    new_config.validate()?;

    {
        let mut config = GLOBAL_CONFIG.write().map_err(|e| e.to_string())?;
        *config = new_config.clone();
    }

    new_config
        .save_to_file(BoothConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Reset configuration to defaults
#[command]
pub async fn reset_config() -> Result<BoothConfig, String> {
    let default_config = BoothConfig::default();

    {
        let mut config = GLOBAL_CONFIG
            .write()
            .map_err(|e| format!("Failed to write config: {}", e))?;
        *config = default_config.clone();
    }

    default_config
        .save_to_file(BoothConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(default_config)
}

/// Studio branding for the landscape footer
#[command]
pub async fn get_branding() -> Result<crate::config::BrandingConfig, String> {
    Ok(current_config()?.branding)
}
