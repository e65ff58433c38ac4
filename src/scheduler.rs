//! Drives the collector on a fixed cadence.
//!
//! The loop alternates between running a cycle and sleeping for the configured
//! interval. Cycles are not aligned to the wall clock and a long cycle is never
//! caught up on: the next one simply starts one interval after the previous one ended.

use crate::clock::Sleeper;
use crate::collector::{Collector, CycleReport};
use crate::logger::Logger;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

pub struct Scheduler {
    collector: Collector,
    logger: Logger,
    sleeper: Arc<dyn Sleeper>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        collector: Collector,
        logger: Logger,
        sleeper: Arc<dyn Sleeper>,
        interval: Duration,
    ) -> Self {
        Self {
            collector,
            logger,
            sleeper,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs cycles forever. Only external termination stops the process.
    pub async fn run(&self) {
        loop {
            self.run_cycle().await;
        }
    }

    /// Runs exactly `count` cycles, each followed by its sleep.
    pub async fn run_cycles(&self, count: usize) -> Vec<CycleReport> {
        let mut reports = Vec::new();
        for _ in 0..count {
            reports.push(self.run_cycle().await);
        }
        reports
    }

    /// One cycle: start marker, collection, completion marker, then the sleep.
    pub async fn run_cycle(&self) -> CycleReport {
        let report = self.collect().await;

        debug!("Sleeping {:?} until the next cycle", self.interval);
        self.sleeper.sleep(self.interval).await;
        report
    }

    /// The collection part of a cycle, between its two markers, without the sleep.
    pub async fn collect(&self) -> CycleReport {
        self.logger.log("Starting weather data collection...");
        let report = self.collector.run().await;
        self.logger.log("Weather data collection completed.");
        report
    }
}
