//! Wire types for the OpenWeatherMap "current weather" response.
//!
//! Only the fields the collector reads are modelled; everything else in the payload
//! is ignored.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescription>,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct WeatherDescription {
    pub description: String,
}
