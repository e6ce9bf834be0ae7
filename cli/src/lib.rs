pub mod commands;
pub mod replay;
pub mod scenario;
pub mod scripted;

use std::io::Write;

use ghostwatch_types::DetectorConfig;

pub const APP_NAME: &str = "ghostwatch";

pub fn readline() -> Result<String, String> {
    write!(std::io::stdout(), "$ ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}

/// Stored detector config. A missing or unreadable file falls back to
/// defaults; an invalid one is an error.
pub fn load_config() -> Result<DetectorConfig, String> {
    let config: DetectorConfig = match confy::load(APP_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            DetectorConfig::default()
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

pub fn store_config(config: &DetectorConfig) -> Result<(), String> {
    confy::store(APP_NAME, None, config).map_err(|e| e.to_string())
}
