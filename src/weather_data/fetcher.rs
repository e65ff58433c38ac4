use crate::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::logger::Logger;
use crate::types::observation::Observation;
use crate::utils::error_chain;
use crate::weather_data::client::WeatherSource;
use crate::weather_data::error::FetchFailure;
use bon::bon;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How often, and how patiently, a city is retried.
///
/// The delay is fixed; there is no backoff growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bon::Builder)]
pub struct RetryPolicy {
    /// Retries after the first attempt, so a city gets `max_retries + 1` attempts in total.
    #[builder(default = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    /// Pause between two consecutive attempts.
    #[builder(default = DEFAULT_RETRY_DELAY)]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Fetches one city's observation, retrying failed attempts with a fixed delay.
pub struct WeatherFetcher {
    source: Arc<dyn WeatherSource>,
    logger: Logger,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
}

#[bon]
impl WeatherFetcher {
    /// Creates a fetcher over `source`.
    ///
    /// `retry` defaults to [`RetryPolicy::default`], `sleeper` to the Tokio timer and
    /// `clock` to the system clock.
    #[builder]
    pub fn new(
        source: Arc<dyn WeatherSource>,
        logger: Logger,
        retry: Option<RetryPolicy>,
        sleeper: Option<Arc<dyn Sleeper>>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        Self {
            source,
            logger,
            retry: retry.unwrap_or_default(),
            sleeper: sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetches `city`, making exactly `max_retries + 1` attempts before giving up.
    ///
    /// Every failed attempt is written to the journal, and so is the final give-up.
    /// The returned [`FetchFailure`] carries the error of the last attempt.
    pub async fn fetch(&self, city: &str) -> Result<Observation, FetchFailure> {
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        let last_error = loop {
            match self.source.current_conditions(city).await {
                Ok(conditions) => {
                    return Ok(Observation::new(city, conditions, self.clock.now()));
                }
                Err(e) => {
                    self.logger.log(format!(
                        "Error fetching {} (attempt {}): {}",
                        city,
                        attempt,
                        error_chain(&e)
                    ));
                    if attempt >= attempts {
                        break e;
                    }
                    self.sleeper.sleep(self.retry.delay).await;
                    attempt += 1;
                }
            }
        };

        self.logger.log(format!(
            "Failed to fetch data for {} after {} attempts.",
            city, attempts
        ));
        Err(FetchFailure {
            city: city.to_string(),
            attempts,
            last_error,
        })
    }
}
