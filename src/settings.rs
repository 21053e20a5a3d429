//! Runtime settings.
//!
//! Layered the usual way: built-in defaults, then an optional
//! `reception-sync.toml` in the working directory, then
//! `RECEPTION_SYNC_*` environment variables. The editor list is only
//! read from the file.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "reception-sync";
pub const ENV_PREFIX: &str = "RECEPTION_SYNC";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Where a signed-in user lands after a denied navigation.
    pub landing_path: String,
    pub login_path: String,
    /// Receptions allowed to edit the waitlist, besides admins.
    pub waitlist_editors: Vec<String>,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            landing_path: "/dashboard".to_string(),
            login_path: "/login".to_string(),
            waitlist_editors: vec!["1002".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load with `file` (extension optional) as the file layer.
    pub fn load_from(file: &str) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("landing_path", defaults.landing_path)?
            .set_default("login_path", defaults.login_path)?
            .set_default("waitlist_editors", defaults.waitlist_editors)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
