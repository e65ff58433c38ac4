use crate::config::ConfigError;
use crate::logger::LoggerError;
use crate::weather_data::error::WeatherDataError;
use thiserror::Error;

/// Errors that stop the process before the first cycle runs.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),
}
