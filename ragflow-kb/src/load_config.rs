/// `load_config` module: reads the JSON config file and the environment into layers and
/// resolves them, with CLI flags on top, into the run's [`Settings`].
///
/// # Responsibilities
/// - Parse the optional `ragflow_config.json` (`{ "api_url": ..., "api_key": ... }`)
/// - Read `RAGFLOW_API_URL` / `RAGFLOW_API_KEY`
/// - Hand all three layers to [`Settings::resolve`], which owns precedence and validation
///
/// # Errors
/// A missing, unreadable or malformed config file is only logged; resolution carries on
/// with the environment and flags. [`ragflow_kb_core::KbError::Config`] is raised when api_url or api_key
/// is still missing after merging.
use ragflow_kb_core::config::{ConfigLayer, Settings, ENV_API_KEY, ENV_API_URL};
use ragflow_kb_core::KbResult;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read the config file at `path` into a layer. An absent, unreadable or malformed
/// file yields an empty layer.
pub fn load_file_layer<P: AsRef<Path>>(path: P) -> ConfigLayer {
    let path_ref = path.as_ref();
    debug!(config_path = ?path_ref, "Loading configuration from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(config_path = ?path_ref, "Config file not found, relying on environment and flags");
            return ConfigLayer::default();
        }
        Err(e) => {
            warn!(error = %e, config_path = ?path_ref, "Failed to read config file, ignoring it");
            return ConfigLayer::default();
        }
    };

    match serde_json::from_str::<ConfigLayer>(&content) {
        Ok(layer) => {
            info!(config_path = ?path_ref, "Loaded config file");
            ConfigLayer::new(layer.api_url, layer.api_key)
        }
        Err(e) => {
            warn!(error = %e, config_path = ?path_ref, "Failed to parse config file as JSON, ignoring it");
            ConfigLayer::default()
        }
    }
}

/// Read the `RAGFLOW_*` environment variables into a layer.
pub fn env_layer() -> ConfigLayer {
    ConfigLayer::new(std::env::var(ENV_API_URL).ok(), std::env::var(ENV_API_KEY).ok())
}

/// Resolve settings from `file < env < flags`.
pub fn load_config<P: AsRef<Path>>(path: P, flags: ConfigLayer) -> KbResult<Settings> {
    let file = load_file_layer(path);
    let settings = Settings::resolve(file, env_layer(), flags)?;
    info!(api_url = %settings.api_url, "Configuration resolved");
    Ok(settings)
}
