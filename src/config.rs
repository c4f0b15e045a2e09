//! Configuration management for the Playtrust Engine
//!
//! Strongly-typed configuration with validation, environment variable parsing
//! and defaults matching the production scoring policy.
//!
//! # Example
//! ```no_run
//! use playtrust::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Hall threshold: {}", config.scoring.tiers.hall);
//! ```

use crate::error::{Error, Result};
use crate::scoring::ScoringPolicy;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,
    /// Weights and thresholds shared by the scorer and the recommender
    pub scoring: ScoringPolicy,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Whether to allow cross-origin requests
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            cors_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Platforms that mount secrets as files point FFOLDER at a directory where
        // each file name is a variable name and its contents the value.
        if let Ok(folder) = std::env::var("FFOLDER") {
            load_env_folder(&folder)?;
        } else {
            // Try to load .env file (ignore if not found)
            dotenvy::dotenv().ok();
        }

        let config = Self {
            api: ApiConfig::from_env()?,
            scoring: scoring_policy_from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;

        if (scoring.engagement.total() - 1.0).abs() > 1e-6 {
            return Err(Error::InvalidConfig {
                key: "ENGAGEMENT_*_WEIGHT",
                message: format!(
                    "engagement weights must sum to 1.0, got {:.3}",
                    scoring.engagement.total()
                )
                .into(),
            });
        }

        if scoring.engagement.play_time_cap_minutes <= 0.0 {
            return Err(Error::InvalidConfig {
                key: "ENGAGEMENT_PLAY_TIME_CAP_MINUTES",
                message: "play time cap must be positive".into(),
            });
        }

        let tiers = &scoring.tiers;
        if !(0.0 < tiers.featured && tiers.featured < tiers.hall && tiers.hall <= 1.0) {
            return Err(Error::InvalidConfig {
                key: "TRUST_HALL_THRESHOLD",
                message: format!(
                    "tier thresholds must satisfy 0 < featured ({}) < hall ({}) <= 1",
                    tiers.featured, tiers.hall
                )
                .into(),
            });
        }

        if !(scoring.safety.floor > 0.0 && scoring.safety.floor <= 1.0) {
            return Err(Error::InvalidConfig {
                key: "SAFETY_FLOOR",
                message: "safety floor must be in (0, 1]".into(),
            });
        }

        if scoring.rating.range_min_ratings > scoring.rating.exact_min_ratings {
            return Err(Error::InvalidConfig {
                key: "RATING_RANGE_MIN",
                message: "range display minimum must not exceed the exact display minimum"
                    .into(),
            });
        }

        if scoring.history_capacity == 0 {
            return Err(Error::InvalidConfig {
                key: "HISTORY_CAPACITY",
                message: "history capacity must be positive".into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary
    fn log_summary(&self) {
        let scoring = &self.scoring;
        info!("Configuration loaded:");
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
        info!("    Request timeout: {:?}", self.api.request_timeout);
        info!("  Scoring:");
        info!(
            "    Tiers: featured >= {}, hall >= {}",
            scoring.tiers.featured, scoring.tiers.hall
        );
        info!(
            "    Engagement weights: play {} / likes {} / reports {}",
            scoring.engagement.play_time,
            scoring.engagement.like_rate,
            scoring.engagement.report_suppression
        );
        info!("    History capacity: {}", scoring.history_capacity);
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: get_env_or("API_HOST", &defaults.host),
            port: get_env_parsed_or("API_PORT", defaults.port)?,
            request_timeout: Duration::from_secs(get_env_parsed_or(
                "API_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            cors_enabled: get_env_parsed_or("API_CORS_ENABLED", defaults.cors_enabled)?,
        })
    }
}

/// Scoring policy with environment overrides applied to the defaults
fn scoring_policy_from_env() -> Result<ScoringPolicy> {
    let mut policy = ScoringPolicy::default();

    policy.tiers.hall = get_env_parsed_or("TRUST_HALL_THRESHOLD", policy.tiers.hall)?;
    policy.tiers.featured = get_env_parsed_or("TRUST_FEATURED_THRESHOLD", policy.tiers.featured)?;

    policy.engagement.play_time =
        get_env_parsed_or("ENGAGEMENT_PLAY_TIME_WEIGHT", policy.engagement.play_time)?;
    policy.engagement.like_rate =
        get_env_parsed_or("ENGAGEMENT_LIKE_RATE_WEIGHT", policy.engagement.like_rate)?;
    policy.engagement.report_suppression = get_env_parsed_or(
        "ENGAGEMENT_REPORT_WEIGHT",
        policy.engagement.report_suppression,
    )?;
    policy.engagement.play_time_cap_minutes = get_env_parsed_or(
        "ENGAGEMENT_PLAY_TIME_CAP_MINUTES",
        policy.engagement.play_time_cap_minutes,
    )?;

    policy.safety.floor = get_env_parsed_or("SAFETY_FLOOR", policy.safety.floor)?;

    policy.rating.exact_min_ratings =
        get_env_parsed_or("RATING_EXACT_MIN", policy.rating.exact_min_ratings)?;
    policy.rating.range_min_ratings =
        get_env_parsed_or("RATING_RANGE_MIN", policy.rating.range_min_ratings)?;

    policy.history_capacity = get_env_parsed_or("HISTORY_CAPACITY", policy.history_capacity)?;

    Ok(policy)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Export every file in `folder` as an environment variable, unless already set
fn load_env_folder(folder: &str) -> Result<()> {
    let path = std::path::Path::new(folder);
    if !path.is_dir() {
        warn!("FFOLDER {} is not a directory, ignoring", folder);
        return Ok(());
    }

    let entries = std::fs::read_dir(path).map_err(|e| Error::Config {
        message: format!("Failed to read FFOLDER {}", folder).into(),
        source: Some(Box::new(e)),
    })?;

    for entry in entries.flatten() {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if std::env::var(&name).is_ok() {
            continue;
        }
        match std::fs::read_to_string(&file_path) {
            Ok(contents) => std::env::set_var(&name, contents.trim()),
            Err(e) => warn!("Skipping unreadable secret file {}: {}", name, e),
        }
    }

    info!("Loaded configuration from FFOLDER={}", folder);
    Ok(())
}

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset
fn get_env_parsed_or<T>(key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => parse_value(key, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
        key,
        message: format!("Invalid value '{}': {}", value, e).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unbalanced_weights() {
        let mut config = Config::default();
        config.scoring.engagement.like_rate = 0.6;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { key: "ENGAGEMENT_*_WEIGHT", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_tiers() {
        let mut config = Config::default();
        config.scoring.tiers.featured = 0.95;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { key: "TRUST_HALL_THRESHOLD", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.scoring.history_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_rating_thresholds_out_of_order() {
        let mut config = Config::default();
        config.scoring.rating.range_min_ratings = 200;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { key: "RATING_RANGE_MIN", .. })
        ));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("API_PORT", " 9090 ").unwrap(), 9090);
        assert_eq!(parse_value::<f64>("SAFETY_FLOOR", "0.4").unwrap(), 0.4);
        assert!(matches!(
            parse_value::<u16>("API_PORT", "eighty"),
            Err(Error::InvalidConfig { key: "API_PORT", .. })
        ));
    }
}
