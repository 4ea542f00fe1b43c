//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;

use crate::scoring::handicap::{HandicapConfig, DEFAULT_COURSE_RATING, STANDARD_SLOPE};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_slope_reference")]
    pub slope_reference: u32,
    #[serde(default = "default_course_rating")]
    pub default_course_rating: Decimal,
    #[serde(default)]
    pub handicap_index_min: Option<Decimal>,
    #[serde(default)]
    pub handicap_index_max: Option<Decimal>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slope_reference: STANDARD_SLOPE,
            default_course_rating: DEFAULT_COURSE_RATING,
            handicap_index_min: None,
            handicap_index_max: None,
        }
    }
}

fn default_slope_reference() -> u32 {
    STANDARD_SLOPE
}

fn default_course_rating() -> Decimal {
    DEFAULT_COURSE_RATING
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub snapshot_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Invalid config file: {path}"))
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.slope_reference == 0 {
            anyhow::bail!("engine.slope_reference must be greater than zero");
        }
        if let (Some(min), Some(max)) = (self.engine.handicap_index_min, self.engine.handicap_index_max) {
            if min > max {
                anyhow::bail!("engine.handicap_index_min ({min}) exceeds handicap_index_max ({max})");
            }
        }
        Ok(())
    }

    /// Handicap settings for the scoring engine. The index range applies
    /// only when both bounds are set.
    pub fn handicap_config(&self) -> HandicapConfig {
        HandicapConfig {
            slope_reference: self.engine.slope_reference,
            default_course_rating: self.engine.default_course_rating,
            index_range: self
                .engine
                .handicap_index_min
                .zip(self.engine.handicap_index_max),
        }
    }
}
