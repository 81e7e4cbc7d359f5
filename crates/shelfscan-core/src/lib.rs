pub mod app_config;
pub mod config;
pub mod records;

pub use app_config::{AppConfig, FetchStrategy};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use records::{ProductRecord, NOT_AVAILABLE};
