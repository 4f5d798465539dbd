use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "config/netgraph.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Capture directory; overrides `NETWORKVIS` and `~/.network_vis`.
    pub input_dir: Option<PathBuf>,
    pub file_extension: String,
    pub output_path: PathBuf,
    pub pretty: bool,
    pub debug: bool,
    /// Fixed name for the local node in every capture.
    pub host_identity: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: None,
            file_extension: "txt".to_string(),
            output_path: PathBuf::from("graph.json"),
            pretty: false,
            debug: false,
            host_identity: None,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_PATH))
}

pub fn load_settings_from(config_path: &Path) -> Settings {
    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    log::info!("Loaded configuration from {}", config_path.display());
                    return settings;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}. Using defaults.", e);
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file: {}. Using defaults.", e);
            }
        }
    }

    log::info!("Using default configuration");
    Settings::default()
}
