use config::{Config, Environment, File};
use serde::Deserialize;
use std::{num::NonZeroU32, path::Path};
use tracing::info;

/// Number of pence a customer spends to earn one point
const DEFAULT_PENCE_PER_POINT: u32 = 100;

/// Settings of the loyalty registry
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Conversion rate for money purchases
    ///
    /// Points earned are `pence / pence_per_point`, truncated toward zero.
    pub pence_per_point: NonZeroU32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pence_per_point: NonZeroU32::new(DEFAULT_PENCE_PER_POINT)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl RegistryConfig {
    /// Load the configuration from layered sources
    ///
    /// Built-in defaults come first, then the optional file at `path`, then environment variables
    /// prefixed with `LOYALTY__` (e.g. `LOYALTY__PENCE_PER_POINT=50`).
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::load_with_environment(path, environment())
    }

    fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self, Error> {
        let mut builder =
            Config::builder().set_default("pence_per_point", i64::from(DEFAULT_PENCE_PER_POINT))?;

        if let Some(path) = path {
            info!("Loading registry config from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(environment)
            .build()?
            .try_deserialize::<Self>()?;

        Ok(config)
    }
}

/// Environment overrides, e.g. `LOYALTY__PENCE_PER_POINT` maps to `pence_per_point`
fn environment() -> Environment {
    Environment::with_prefix("LOYALTY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}
