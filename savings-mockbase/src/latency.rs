//! Simulated network latency
//!
//! Every terminal query and every mutating auth call pauses for a random
//! duration drawn uniformly from `[min, max]` milliseconds before touching
//! shared state. The pause goes through a [`Sleeper`] so tests can swap the
//! wall clock for paused tokio time or a recording fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::BackendConfig;

/// Source of asynchronous pauses
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Inclusive latency window plus the sleeper that realizes it
#[derive(Clone)]
pub struct Latency {
    min_ms: u64,
    max_ms: u64,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Latency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Latency")
            .field("min_ms", &self.min_ms)
            .field("max_ms", &self.max_ms)
            .finish_non_exhaustive()
    }
}

impl Latency {
    /// Window `[min_ms, max_ms]`; the bounds are swapped if given inverted
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.delay_min_ms, config.delay_max_ms)
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    /// Draw a duration from the window
    pub fn sample(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Pause for a sampled duration; returns immediately when the window is `[0, 0]`
    pub async fn simulate(&self) {
        if self.is_disabled() {
            return;
        }
        self.sleeper.sleep(self.sample()).await;
    }
}
