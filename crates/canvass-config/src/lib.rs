//! # canvass-config
//!
//! Layered configuration loading for canvass using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CANVASS_*` prefix, `__` as separator)
//! 2. Project-level `.canvass/config.toml`
//! 3. User-level `~/.config/canvass/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `CANVASS_HTTP__BASE_URL` -> `http.base_url`,
//! `CANVASS_BACKEND__KIND` -> `backend.kind`, and so on.
//!
//! ```no_run
//! use canvass_config::{BackendKind, CanvassConfig};
//!
//! let config = CanvassConfig::load_with_dotenv().expect("config");
//! if config.backend.kind == BackendKind::Http {
//!     println!("API: {}", config.http.base_url);
//! }
//! ```

mod auth;
mod backend;
mod error;
mod general;
mod http;
mod store;

pub use auth::AuthConfig;
pub use backend::{BackendConfig, BackendKind};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use http::HttpConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const OUTPUT_FORMATS: [&str; 3] = ["json", "table", "raw"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CanvassConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CanvassConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables) and validate it.
    ///
    /// Does not read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on extraction failure or when
    /// [`Self::validate`] rejects the result.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the workspace root, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".canvass/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CANVASS_").split("__"))
    }

    /// Cross-field checks figment cannot express.
    ///
    /// # Errors
    ///
    /// `NotConfigured` when the HTTP backend is selected without a base URL,
    /// `InvalidValue` for a zero timeout or an unknown output format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Http && !self.http.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "http".into(),
            });
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !OUTPUT_FORMATS.contains(&self.general.default_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.default_format".into(),
                reason: format!("expected one of {}", OUTPUT_FORMATS.join(", ")),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("canvass").join("config.toml"))
    }

    /// Walk up from `CARGO_MANIFEST_DIR` (when set) looking for `.env`,
    /// falling back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
