//! Config facade: single entry point for loading `TelgetConfig`.

use super::merge::{builder_with_defaults, environment};
use super::sources::{global_file, workspace_file};
use super::TelgetConfig;
use crate::error::TelgetError;
use config::File;
use std::path::Path;

/// Loads layered configuration.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, `<workspace_root>/telget.toml`, then environment.
    pub fn load(workspace_root: &Path) -> Result<TelgetConfig, TelgetError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder);
        let builder = workspace_file::add_to_builder(builder, workspace_root);
        let config = builder.add_source(environment()).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Defaults, then the given file (which must exist), then environment.
    /// Replaces both file layers of [`ConfigLoader::load`].
    pub fn load_from_file(path: &Path) -> Result<TelgetConfig, TelgetError> {
        let config = builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
