pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use self::adapters::llm::{ChatCompletionClient, ModelSettings};
pub use self::config::{cli::LocalStorage, toml_config::AuditConfig};
pub use self::core::{
    driver::{ComparisonDriver, ProvisionFilter},
    engine::{AuditEngine, AuditRun},
    segmenter::segment,
};
pub use self::utils::error::{AuditError, ModelError, Result};
