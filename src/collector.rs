//! One collection cycle: every configured city is fetched once and the successes are
//! uploaded together.

use crate::logger::Logger;
use crate::storage::error::UploadError;
use crate::storage::uploader::Uploader;
use crate::types::batch::Batch;
use crate::weather_data::error::FetchFailure;
use crate::weather_data::fetcher::WeatherFetcher;
use log::debug;

/// What happened to the batch at the end of a cycle.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The batch was stored under this key.
    Uploaded { key: String },
    /// The store rejected the batch; it is not retried.
    Failed(UploadError),
    /// Every city failed, so nothing was sent.
    Skipped,
}

/// Summary of a single cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub batch: Batch,
    pub failures: Vec<FetchFailure>,
    pub upload: UploadOutcome,
}

impl CycleReport {
    pub fn failed_cities(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.city.as_str()).collect()
    }
}

pub struct Collector {
    cities: Vec<String>,
    fetcher: WeatherFetcher,
    uploader: Uploader,
    logger: Logger,
}

impl Collector {
    pub fn new(
        cities: Vec<String>,
        fetcher: WeatherFetcher,
        uploader: Uploader,
        logger: Logger,
    ) -> Self {
        Self {
            cities,
            fetcher,
            uploader,
            logger,
        }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Fetches the cities in configured order and uploads whatever succeeded.
    ///
    /// A failing city is skipped without affecting the others. An empty batch is
    /// journaled and never uploaded.
    pub async fn run(&self) -> CycleReport {
        let mut batch = Batch::new();
        let mut failures = Vec::new();

        for city in &self.cities {
            match self.fetcher.fetch(city).await {
                Ok(observation) => batch.push(observation),
                Err(failure) => failures.push(failure),
            }
        }

        debug!(
            "Cycle collected {} of {} cities",
            batch.len(),
            self.cities.len()
        );

        let upload = if batch.is_empty() {
            self.logger.log("No weather data collected to upload.");
            UploadOutcome::Skipped
        } else {
            match self.uploader.upload(&batch).await {
                Ok(object) => UploadOutcome::Uploaded { key: object.key },
                Err(e) => UploadOutcome::Failed(e),
            }
        };

        CycleReport {
            batch,
            failures,
            upload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::test_support::{
        collector_with, conditions, journal, FixedClock, MemoryStore, ScriptedSource,
    };
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_london_succeeds_tokyo_fails() {
        let source = ScriptedSource::new()
            .succeed("London", conditions(58.3, 81, "light rain"))
            .fail_always("Tokyo");
        let store = Arc::new(MemoryStore::new("weather-bucket"));
        let (logger, memory) = journal();
        let (collector, source, sleeper) =
            collector_with(&["London", "Tokyo"], source, store.clone(), clock(), logger);

        let report = collector.run().await;

        assert_eq!(source.calls_for("London"), 1);
        assert_eq!(source.calls_for("Tokyo"), 3);
        assert_eq!(sleeper.sleeps().len(), 2);

        assert_eq!(report.batch.len(), 1);
        assert_eq!(report.batch.observations()[0].city, "London");
        assert_eq!(report.failed_cities(), ["Tokyo"]);
        assert!(matches!(report.upload, UploadOutcome::Uploaded { .. }));

        let puts = store.puts();
        assert_eq!(puts.len(), 1);
        let uploaded = Batch::from_json(&puts[0].body).unwrap();
        assert_eq!(uploaded, report.batch);

        assert_eq!(memory.count_containing("Failed to fetch data for Tokyo"), 1);
        assert_eq!(memory.count_containing("No weather data collected to upload."), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_cities() {
        let source = ScriptedSource::new()
            .fail_always("London")
            .succeed("New York", conditions(71.6, 55, "few clouds"))
            .fail_always("Hyderabad")
            .succeed("Tokyo", conditions(66.0, 60, "broken clouds"));
        let store = Arc::new(MemoryStore::new("weather-bucket"));
        let (logger, _memory) = journal();
        let (collector, source, _sleeper) = collector_with(
            &["London", "New York", "Hyderabad", "Tokyo"],
            source,
            store.clone(),
            clock(),
            logger,
        );

        let report = collector.run().await;

        assert_eq!(
            source.call_order(),
            [
                "London", "London", "London", "New York", "Hyderabad", "Hyderabad",
                "Hyderabad", "Tokyo"
            ]
        );
        let cities: Vec<&str> = report.batch.iter().map(|o| o.city.as_str()).collect();
        assert_eq!(cities, ["New York", "Tokyo"]);
        assert_eq!(report.failed_cities(), ["London", "Hyderabad"]);
        assert_eq!(store.puts().len(), 1);
    }

    #[tokio::test]
    async fn test_all_successes_keep_configured_order() {
        let source = ScriptedSource::new()
            .succeed("Tokyo", conditions(66.0, 60, "broken clouds"))
            .succeed("London", conditions(58.3, 81, "light rain"))
            .succeed("New York", conditions(71.6, 55, "few clouds"));
        let store = Arc::new(MemoryStore::new("weather-bucket"));
        let (logger, _memory) = journal();
        let (collector, _source, sleeper) = collector_with(
            &["Tokyo", "London", "New York"],
            source,
            store.clone(),
            clock(),
            logger,
        );

        let report = collector.run().await;

        let uploaded = Batch::from_json(&store.puts()[0].body).unwrap();
        let cities: Vec<&str> = uploaded.iter().map(|o| o.city.as_str()).collect();
        assert_eq!(cities, ["Tokyo", "London", "New York"]);
        assert_eq!(report.batch.len(), 3);
        assert!(report.failures.is_empty());
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_upload_and_logs_once() {
        let source = ScriptedSource::new()
            .fail_always("London")
            .fail_always("Tokyo");
        let store = Arc::new(MemoryStore::new("weather-bucket"));
        let (logger, memory) = journal();
        let (collector, _source, _sleeper) =
            collector_with(&["London", "Tokyo"], source, store.clone(), clock(), logger);

        let report = collector.run().await;

        assert!(report.batch.is_empty());
        assert!(matches!(report.upload, UploadOutcome::Skipped));
        assert_eq!(store.attempts(), 0);
        assert_eq!(memory.count_containing("No weather data collected to upload."), 1);
        assert_eq!(memory.count_containing("Uploaded"), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported_not_raised() {
        let source = ScriptedSource::new().succeed("London", conditions(58.3, 81, "light rain"));
        let store = Arc::new(MemoryStore::failing("weather-bucket"));
        let (logger, memory) = journal();
        let (collector, _source, _sleeper) =
            collector_with(&["London"], source, store.clone(), clock(), logger);

        let report = collector.run().await;

        assert!(matches!(report.upload, UploadOutcome::Failed(UploadError::Storage(_))));
        assert_eq!(store.attempts(), 1);
        assert_eq!(memory.count_containing("Failed to upload"), 1);
    }

    #[tokio::test]
    async fn test_observations_are_stamped_at_fetch_time() {
        let source = ScriptedSource::new().succeed("London", conditions(58.3, 81, "light rain"));
        let store = Arc::new(MemoryStore::new("weather-bucket"));
        let clock = clock();
        let (logger, _memory) = journal();
        let (collector, _source, _sleeper) =
            collector_with(&["London"], source, store, clock.clone(), logger);

        let report = collector.run().await;

        assert_eq!(report.batch.observations()[0].timestamp, clock.now());
    }
}
