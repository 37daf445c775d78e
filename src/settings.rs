use std::time::Duration;

use serde::Deserialize;
use validator::Validate;

use crate::{ReassemblerConfig, RecordExtractor};

/// Where and how often to fetch the price array.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct FetchConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(length(min = 1))]
    pub path: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(range(min = 1))]
    pub poll_interval_secs: u32,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u32,
    pub retries: usize,
    #[validate(length(min = 1))]
    pub price_field: String,
    pub timestamp_field: Option<String>,
    #[validate(range(min = 2))]
    pub max_element_size: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            host: "sahkohinta-api.fi".to_string(),
            path: "/api/v1/halpa?tunnit=24&tulos=sarja".to_string(),
            port: 80,
            poll_interval_secs: 10,
            request_timeout_secs: 30,
            retries: 3,
            price_field: "hinta".to_string(),
            timestamp_field: Some("aikaleima_suomi".to_string()),
            max_element_size: 64 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn url(&self) -> String {
        let separator = if self.path.starts_with('/') { "" } else { "/" };
        format!("http://{}:{}{}{}", self.host, self.port, separator, self.path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_secs))
    }

    pub fn reassembler(&self) -> ReassemblerConfig {
        ReassemblerConfig {
            max_element_size: self.max_element_size as usize,
        }
    }

    pub fn extractor(&self) -> RecordExtractor {
        RecordExtractor::new(self.price_field.clone(), self.timestamp_field.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "configs")]
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[cfg(feature = "configs")]
pub mod configuration {
    use config::{Config, Environment, File};
    use validator::Validate;

    use super::{ConfigError, FetchConfig};

    /// Loads a [`FetchConfig`] from an optional file, then `PRICE_*`
    /// environment variables, falling back to the defaults.
    pub fn load_config(path: Option<&str>) -> Result<FetchConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("PRICE"))
            .build()?;

        let config: FetchConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
