pub mod types;

use std::path::Path;

use crate::error::{BookingError, Result};
use types::Config;

/// Load the YAML config at `path`. A missing file means "run with defaults":
/// local API, 1.5 s simulated payments, EUR/fr sessions.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        BookingError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    let config: Config = serde_yml::from_str(&content).map_err(|e| {
        BookingError::Config(format!("invalid config file {}: {e}", path.display()))
    })?;
    tracing::info!(
        base_url = %config.api.base_url,
        payment_delay_ms = config.payment.simulated_delay_ms,
        currency = %config.session.default_currency,
        "Loaded config from {}",
        path.display()
    );
    Ok(config)
}
