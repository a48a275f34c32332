//! Merge rules: defaults and override order.
//!
//! Later sources win: defaults < global file < workspace file < environment.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Prefix of environment overrides, e.g. `TELGET__CACHE__PATH`.
pub const ENV_PREFIX: &str = "TELGET";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("provider.base_url", crate::provider::openf1::DEFAULT_BASE_URL)?
        .set_default("provider.connect_timeout_secs", 10)?
        .set_default("provider.request_timeout_secs", 120)?
        .set_default("cache.enabled", true)?
        .set_default("cache.path", "./f1-telget-cache")?
        .set_default("output.dir", ".")
}

/// Environment source; applied last so it overrides every file.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
