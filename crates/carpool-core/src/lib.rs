pub mod config;
pub mod types;

pub use config::{CarpoolConfig, ConfigError, GroupSizeRange, MatchingConfig, ServerConfig};
pub use types::*;
