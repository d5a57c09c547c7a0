mod app_config;
pub mod catalog;
mod config;
pub mod events;

pub use app_config::{AppConfig, Environment};
pub use catalog::{GroupKey, ProductGroup, ReturnInfo, WarehouseOffer};
pub use config::{load_app_config, load_app_config_from_env};
pub use events::{ErrorEvent, ImagesEvent, ItemEvent, OfferRecord, StreamEvent};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
