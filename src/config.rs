//! Process configuration, read once at startup from the environment.
//!
//! The resulting [`Config`] is immutable and handed to constructors by reference;
//! nothing in the pipeline reads the environment after startup.

use crate::weather_data::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::weather_data::fetcher::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CITIES: [&str; 4] = ["London", "New York", "Hyderabad", "Tokyo"];
pub const DEFAULT_LOG_FILE: &str = "weather.log";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_REGION: &str = "AWS_REGION";
const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
const S3_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";
const OPENWEATHER_BASE_URL: &str = "OPENWEATHER_BASE_URL";
const HARVEST_CITIES: &str = "HARVEST_CITIES";
const HARVEST_LOG_FILE: &str = "HARVEST_LOG_FILE";
const HARVEST_INTERVAL_SECS: &str = "HARVEST_INTERVAL_SECS";
const HARVEST_MAX_RETRIES: &str = "HARVEST_MAX_RETRIES";
const HARVEST_RETRY_DELAY_SECS: &str = "HARVEST_RETRY_DELAY_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    #[error("No cities configured in HARVEST_CITIES")]
    EmptyCityList,

    #[error("Invalid number '{value}' for {var}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Access to the weather API.
#[derive(Clone)]
pub struct WeatherApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for WeatherApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Access to the S3 bucket batches are written to.
#[derive(Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// Custom endpoint for S3-compatible servers; `None` means AWS.
    pub endpoint_url: Option<String>,
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub weather: WeatherApiConfig,
    pub storage: StorageConfig,
    /// Cities fetched each cycle, in this order.
    pub cities: Vec<String>,
    pub log_file: PathBuf,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as missing. All missing required variables are reported
    /// together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut missing = Vec::new();
        let mut require = |name: &'static str| {
            let value = get(name);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let access_key_id = require(AWS_ACCESS_KEY_ID);
        let secret_access_key = require(AWS_SECRET_ACCESS_KEY);
        let region = require(AWS_REGION);
        let bucket = require(S3_BUCKET_NAME);
        let api_key = require(OPENWEATHER_API_KEY);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let cities = match get(HARVEST_CITIES) {
            Some(raw) => parse_cities(&raw)?,
            None => DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
        };

        let interval = match get(HARVEST_INTERVAL_SECS) {
            Some(raw) => Duration::from_secs(parse_number(HARVEST_INTERVAL_SECS, &raw)?),
            None => DEFAULT_INTERVAL,
        };

        let max_retries = match get(HARVEST_MAX_RETRIES) {
            Some(raw) => parse_number(HARVEST_MAX_RETRIES, &raw)?,
            None => DEFAULT_MAX_RETRIES,
        };

        let retry_delay = match get(HARVEST_RETRY_DELAY_SECS) {
            Some(raw) => Duration::from_secs(parse_number(HARVEST_RETRY_DELAY_SECS, &raw)?),
            None => DEFAULT_RETRY_DELAY,
        };

        Ok(Self {
            weather: WeatherApiConfig {
                api_key,
                base_url: get(OPENWEATHER_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: DEFAULT_TIMEOUT,
            },
            storage: StorageConfig {
                access_key_id,
                secret_access_key,
                region,
                bucket,
                endpoint_url: get(S3_ENDPOINT_URL),
            },
            cities,
            log_file: get(HARVEST_LOG_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            interval,
            retry: RetryPolicy::builder()
                .max_retries(max_retries)
                .delay(retry_delay)
                .build(),
        })
    }
}

fn parse_cities(raw: &str) -> Result<Vec<String>, ConfigError> {
    let cities: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if cities.is_empty() {
        return Err(ConfigError::EmptyCityList);
    }
    Ok(cities)
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
