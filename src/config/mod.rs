pub mod settings;

pub use settings::{load_settings, load_settings_from, Settings, SETTINGS_PATH};
