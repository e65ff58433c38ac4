use crate::types::observation::CurrentConditions;
use crate::types::openweather::CurrentWeatherResponse;
use crate::weather_data::error::WeatherDataError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Unit system requested from the API; temperatures come back in Fahrenheit.
const UNITS: &str = "imperial";

/// A single attempt at reading the current conditions for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherDataError>;
}

/// Client for the OpenWeatherMap current weather endpoint.
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str) -> Result<Self, WeatherDataError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherDataError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherDataError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherDataError> {
        // The key travels as a query parameter, so the full URL is never logged.
        debug!("Requesting current weather for {} from {}", city, self.base_url);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest {
                city: city.to_string(),
                source: e.without_url(),
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                warn!("HTTP error for {}: {:?}", city, e);
                return Err(match e.status() {
                    Some(status) => WeatherDataError::HttpStatus {
                        city: city.to_string(),
                        status,
                        source: e,
                    },
                    None => WeatherDataError::NetworkRequest {
                        city: city.to_string(),
                        source: e,
                    },
                });
            }
        };

        let body: CurrentWeatherResponse =
            response
                .json()
                .await
                .map_err(|e| WeatherDataError::Parse {
                    city: city.to_string(),
                    source: e.without_url(),
                })?;

        let condition = body
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| WeatherDataError::MissingCondition {
                city: city.to_string(),
            })?;

        Ok(CurrentConditions {
            temperature: body.main.temp,
            humidity: body.main.humidity,
            condition,
        })
    }
}
