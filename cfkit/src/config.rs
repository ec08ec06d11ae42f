use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::errors::CfError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CfKitConfig {
    pub template: TemplateConfig,
    pub observability: ObservabilityConfig,
}

/// Settings for a single column family template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub keyspace: String,
    pub column_family: String,
    /// When false every update is executed as soon as it is queued
    pub batched: bool,
    pub default_ttl_secs: Option<i32>,
    pub max_batch_size: Option<usize>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            keyspace: "system".to_string(),
            column_family: "default".to_string(),
            batched: false,
            default_ttl_secs: None,
            max_batch_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Gates every prometheus metric this crate records
    pub metrics_enabled: bool,
    /// Filter directive for the host binary's tracing subscriber.
    /// The library never installs a subscriber, so it does not read this itself.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Load configuration from a file, then apply `CFKIT__SECTION__KEY` overrides
pub fn load_config(path: &str) -> Result<CfKitConfig, CfError> {
    let config = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("CFKIT").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
