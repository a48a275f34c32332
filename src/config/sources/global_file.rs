//! Global config file source: `<platform config dir>/telget/config.toml`
//! (`$XDG_CONFIG_HOME/telget/config.toml` on Linux).

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "telget").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) if path.exists() => {
            let path = dunce::canonicalize(&path).unwrap_or(path);
            debug!(config_path = %path.display(), "using global configuration");
            builder.add_source(File::from(path).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "no global configuration file");
            builder
        }
        None => builder,
    }
}
