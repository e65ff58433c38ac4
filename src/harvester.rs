//! Entry point that assembles the collection pipeline from a [`Config`].

use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::collector::{Collector, CycleReport};
use crate::config::Config;
use crate::error::HarvestError;
use crate::logger::Logger;
use crate::scheduler::Scheduler;
use crate::storage::s3::S3Store;
use crate::storage::uploader::Uploader;
use crate::storage::ObjectStore;
use crate::weather_data::client::{OpenWeatherClient, WeatherSource};
use crate::weather_data::fetcher::WeatherFetcher;
use log::info;
use std::sync::Arc;

/// The fully wired pipeline: weather API client, S3 store, journal and scheduler.
///
/// # Examples
///
/// ```no_run
/// use weather_harvest::{Config, Harvester, HarvestError};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), HarvestError> {
/// let config = Config::from_env()?;
/// let harvester = Harvester::from_config(&config)?;
/// harvester.run().await;
/// # Ok(())
/// # }
/// ```
pub struct Harvester {
    scheduler: Scheduler,
}

impl Harvester {
    /// Builds the production pipeline: OpenWeatherMap over HTTPS, S3, a journal at
    /// `config.log_file` mirrored to stdout, the system clock and the Tokio timer.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Logger`] if the log file cannot be opened and
    /// [`HarvestError::WeatherData`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let logger = Logger::to_file_and_console(&config.log_file)?;
        let source = OpenWeatherClient::with_base_url(
            &config.weather.api_key,
            &config.weather.base_url,
            config.weather.timeout,
        )?;
        let store = S3Store::new(&config.storage);

        Ok(Self::with_parts(
            config,
            Arc::new(source),
            Arc::new(store),
            logger,
            Arc::new(SystemClock),
            Arc::new(TokioSleeper),
        ))
    }

    /// Builds the pipeline around caller-supplied collaborators.
    pub fn with_parts(
        config: &Config,
        source: Arc<dyn WeatherSource>,
        store: Arc<dyn ObjectStore>,
        logger: Logger,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        info!(
            "Collecting {} cities into bucket {} every {:?}",
            config.cities.len(),
            store.bucket(),
            config.interval
        );

        let fetcher = WeatherFetcher::builder()
            .source(source)
            .logger(logger.clone())
            .retry(config.retry)
            .sleeper(sleeper.clone())
            .clock(clock.clone())
            .build();
        let uploader = Uploader::new(store, clock, logger.clone());
        let collector = Collector::new(config.cities.clone(), fetcher, uploader, logger.clone());

        Self {
            scheduler: Scheduler::new(collector, logger, sleeper, config.interval),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs collection cycles forever.
    pub async fn run(&self) {
        self.scheduler.run().await
    }

    /// Runs a single collection cycle and returns as soon as it completes.
    ///
    /// Unlike [`Harvester::run`], no interval sleep follows the cycle.
    pub async fn run_once(&self) -> CycleReport {
        self.scheduler.collect().await
    }
}
