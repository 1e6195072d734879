use thiserror::Error;

use crate::api::yahoo::YahooClient;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
    pub yahoo_base_url: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Config {
    pub const DEFAULT_PREFIX: &'static str = "$";
    pub const DEFAULT_CHART_WIDTH: u32 = 1200;
    pub const DEFAULT_CHART_HEIGHT: u32 = 600;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let command_prefix = lookup("COMMAND_PREFIX")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_PREFIX.to_string());

        let yahoo_base_url = lookup("YAHOO_BASE_URL")
            .unwrap_or_else(|| YahooClient::DEFAULT_BASE_URL.to_string());

        let chart_width = parse_dimension(&lookup, "CHART_WIDTH", Self::DEFAULT_CHART_WIDTH)?;
        let chart_height = parse_dimension(&lookup, "CHART_HEIGHT", Self::DEFAULT_CHART_HEIGHT)?;

        Ok(Self {
            discord_token,
            command_prefix,
            yahoo_base_url,
            chart_width,
            chart_height,
        })
    }
}

fn parse_dimension<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u32>() {
            Ok(n) if (200..=4000).contains(&n) => Ok(n),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}
