//! Test doubles shared by the unit tests.

use crate::clock::{Clock, Sleeper};
use crate::collector::Collector;
use crate::logger::{LogSink, Logger, MemorySink};
use crate::storage::error::StorageError;
use crate::storage::uploader::Uploader;
use crate::storage::ObjectStore;
use crate::types::observation::CurrentConditions;
use crate::weather_data::client::WeatherSource;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::fetcher::WeatherFetcher;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn conditions(temperature: f64, humidity: u8, condition: &str) -> CurrentConditions {
    CurrentConditions {
        temperature,
        humidity,
        condition: condition.to_string(),
    }
}

/// A journal that only writes to memory, stamped by a fixed clock.
pub fn journal() -> (Logger, MemorySink) {
    let memory = MemorySink::new();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let logger = Logger::new(vec![Box::new(memory.clone()) as Box<dyn LogSink>], Arc::new(clock));
    (logger, memory)
}

/// Wires a collector over scripted doubles with the default retry policy.
pub fn collector_with(
    cities: &[&str],
    source: ScriptedSource,
    store: Arc<dyn ObjectStore>,
    clock: Arc<dyn Clock>,
    logger: Logger,
) -> (Collector, Arc<ScriptedSource>, Arc<RecordingSleeper>) {
    let source = Arc::new(source);
    let sleeper = Arc::new(RecordingSleeper::default());
    let fetcher = WeatherFetcher::builder()
        .source(source.clone())
        .logger(logger.clone())
        .sleeper(sleeper.clone())
        .clock(clock.clone())
        .build();
    let uploader = Uploader::new(store, clock, logger.clone());
    let collector = Collector::new(
        cities.iter().map(|c| c.to_string()).collect(),
        fetcher,
        uploader,
        logger,
    );
    (collector, source, sleeper)
}

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Returns immediately and remembers every requested duration.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

struct Plan {
    failures_before_success: u32,
    conditions: Option<CurrentConditions>,
}

/// A weather source whose per-city behaviour is scripted up front.
///
/// Cities without a plan always fail.
#[derive(Default)]
pub struct ScriptedSource {
    plans: HashMap<String, Plan>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(self, city: &str, conditions: CurrentConditions) -> Self {
        self.fail_then_succeed(city, 0, conditions)
    }

    pub fn fail_then_succeed(mut self, city: &str, failures: u32, conditions: CurrentConditions) -> Self {
        self.plans.insert(
            city.to_string(),
            Plan {
                failures_before_success: failures,
                conditions: Some(conditions),
            },
        );
        self
    }

    pub fn fail_always(mut self, city: &str) -> Self {
        self.plans.insert(
            city.to_string(),
            Plan {
                failures_before_success: u32::MAX,
                conditions: None,
            },
        );
        self
    }

    pub fn calls_for(&self, city: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == city).count()
    }

    pub fn call_order(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherSource for ScriptedSource {
    async fn current_conditions(&self, city: &str) -> Result<CurrentConditions, WeatherDataError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(city.to_string());
            calls.iter().filter(|c| *c == city).count() as u32
        };

        match self.plans.get(city) {
            Some(plan) if attempt > plan.failures_before_success => plan
                .conditions
                .clone()
                .ok_or_else(|| WeatherDataError::MissingCondition {
                    city: city.to_string(),
                }),
            _ => Err(WeatherDataError::MissingCondition {
                city: city.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory bucket; optionally rejects every put.
pub struct MemoryStore {
    bucket: String,
    fail: bool,
    attempts: Mutex<usize>,
    puts: Mutex<Vec<PutRecord>>,
}

impl MemoryStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            fail: false,
            attempts: Mutex::new(0),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(bucket: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(bucket)
        }
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    pub fn puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }

    /// Current bucket contents; later puts replace earlier ones with the same key.
    pub fn objects(&self) -> HashMap<String, Vec<u8>> {
        self.puts()
            .into_iter()
            .map(|put| (put.key, put.body))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(StorageError::PutObject {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: "service unavailable".to_string(),
            });
        }
        self.puts.lock().unwrap().push(PutRecord {
            key: key.to_string(),
            body: body.to_vec(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}
