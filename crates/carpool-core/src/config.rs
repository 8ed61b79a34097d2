//! carpool.toml configuration parser.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Car, Seats};

pub const DEFAULT_PORT: u16 = 9091;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("group size range is empty: min {min} > max {max}")]
    EmptyGroupSizes { min: Seats, max: Seats },

    #[error("duplicate car id in [[cars]]: {0}")]
    DuplicateCar(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarpoolConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Fleet loaded at startup, before any `PUT /cars`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cars: Vec<Car>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub group_sizes: GroupSizeRange,
}

/// Group sizes the waiting queue indexes up front. Sizes outside the
/// range are still accepted; their thresholds are created on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSizeRange {
    pub min: Seats,
    pub max: Seats,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl Default for GroupSizeRange {
    fn default() -> Self {
        Self { min: 1, max: 6 }
    }
}

impl GroupSizeRange {
    pub fn as_range(&self) -> RangeInclusive<Seats> {
        self.min..=self.max
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl CarpoolConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: CarpoolConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = self.matching.group_sizes;
        if sizes.min > sizes.max {
            return Err(ConfigError::EmptyGroupSizes {
                min: sizes.min,
                max: sizes.max,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for car in &self.cars {
            if !seen.insert(car.id) {
                return Err(ConfigError::DuplicateCar(car.id.0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CarpoolConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.matching.group_sizes.as_range(), 1..=6);
        assert!(config.cars.is_empty());
    }

    #[test]
    fn parse_full() {
        let toml_str = r#"
[server]
port = 8080
bind = "127.0.0.1"

[matching]
group_sizes = { min = 1, max = 8 }

[[cars]]
id = 1
seats = 4

[[cars]]
id = 2
seats = 6
"#;
        let config = CarpoolConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.matching.group_sizes.max, 8);
        assert_eq!(config.cars, vec![Car::new(1, 4), Car::new(2, 6)]);
    }

    #[test]
    fn rejects_inverted_group_sizes() {
        let err = CarpoolConfig::from_toml_str("[matching]\ngroup_sizes = { min = 6, max = 1 }\n")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::EmptyGroupSizes { min: 6, max: 1 })
        );
    }

    #[test]
    fn rejects_duplicate_cars() {
        let toml_str = "[[cars]]\nid = 1\nseats = 4\n\n[[cars]]\nid = 1\nseats = 5\n";
        let err = CarpoolConfig::from_toml_str(toml_str).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::DuplicateCar(1))
        );
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = CarpoolConfig::default();
        config.cars.push(Car::new(3, 5));
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[server]"));
        assert_eq!(CarpoolConfig::from_toml_str(&toml_str).unwrap(), config);
    }
}
