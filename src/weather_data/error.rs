use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Failed to build HTTP client for the weather API")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {city}")]
    NetworkRequest {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request for {city} failed with status {status}")]
    HttpStatus {
        city: String,
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse weather response for {city}")]
    Parse {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather response for {city} has no condition description")]
    MissingCondition { city: String },
}

/// Terminal outcome for a city whose every attempt failed.
#[derive(Debug, Error)]
#[error("Failed to fetch data for {city} after {attempts} attempts")]
pub struct FetchFailure {
    pub city: String,
    pub attempts: u32,
    #[source]
    pub last_error: WeatherDataError,
}
