//! Hourly weather collection into S3.
//!
//! Each cycle fetches the current conditions for a fixed list of cities from
//! OpenWeatherMap, retrying failed requests a bounded number of times, and stores the
//! successful observations as one JSON document under
//! `<YYYY-MM-DD>/weather_<HHMMSS>.json`. Every step is written to a timestamped
//! journal. [`Harvester`] wires the production pieces together; the individual
//! components are public so they can be driven with other sources, stores and clocks.

mod clock;
mod collector;
mod config;
mod error;
mod harvester;
mod logger;
mod scheduler;
mod storage;
mod types;
mod utils;
mod weather_data;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use collector::{Collector, CycleReport, UploadOutcome};
pub use config::{Config, ConfigError, StorageConfig, WeatherApiConfig};
pub use error::HarvestError;
pub use harvester::Harvester;
pub use logger::{ConsoleSink, FileSink, LogSink, Logger, LoggerError, MemorySink};
pub use scheduler::Scheduler;
pub use utils::format_timestamp;

pub use storage::error::{StorageError, UploadError};
pub use storage::s3::S3Store;
pub use storage::uploader::Uploader;
pub use storage::ObjectStore;

pub use types::batch::Batch;
pub use types::observation::{CurrentConditions, Observation};
pub use types::stored_object::{storage_key, StoredObject, JSON_CONTENT_TYPE};

pub use weather_data::client::{OpenWeatherClient, WeatherSource};
pub use weather_data::error::{FetchFailure, WeatherDataError};
pub use weather_data::fetcher::{RetryPolicy, WeatherFetcher};
