//! # Sensorlab Configuration
//!
//! Layered configuration for the simulation views.
//!
//! ## Features
//! - **Layering**: defaults, base file, environment file, `SENSORLAB_*` variables
//! - **Validation**: ranges and enumerations are checked after extraction

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod error;
mod simulation;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use simulation::SimulationConfig;
pub use telemetry::TelemetryConfig;

/// Base configuration file, relative to the working directory.
pub const BASE_CONFIG_PATH: &str = "config/sensorlab.yaml";

const ENV_PREFIX: &str = "SENSORLAB_";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct SensorlabConfig {
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl SensorlabConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/sensorlab.yaml`, skipped if missing
    /// 3. `config/<SENSORLAB_ENV>.yaml`, environment overrides (default `development`)
    /// 4. `SENSORLAB_*` environment variables, `__` separating nested keys
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SensorlabConfig::default()));

        if Path::new(BASE_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(BASE_CONFIG_PATH));
        } else {
            debug!("{BASE_CONFIG_PATH} not found, using default configuration");
        }

        let env = std::env::var("SENSORLAB_ENV").unwrap_or_else(|_| "development".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, then environment variables.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        let figment = Figment::from(Serialized::defaults(SensorlabConfig::default()))
            .merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
