//! Scheduler Configuration

use crate::error::{RasterError, RasterResult};

/// Environment variable overriding the number of workers
pub const ENV_WORKERS : &str = "RASTER_RLE_WORKERS";
/// Environment variable overriding the number of stealing rounds
pub const ENV_STEAL_ROUNDS : &str = "RASTER_RLE_STEAL_ROUNDS";

/// Stealing rounds over all queues before a worker blocks on its own
pub const DEFAULT_STEAL_ROUNDS : usize = 32;

/// Scheduler Configuration
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct SchedulerConfig {
    /// Number of worker threads and queues
    pub workers: usize,
    /// A worker tries `workers * steal_rounds` non-blocking pops before
    /// blocking on its own queue
    pub steal_rounds: usize,
    /// Prefix of worker thread names, the worker index is appended
    pub thread_name: String,
}

impl Default for SchedulerConfig {
    /// One worker per hardware thread
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            workers,
            steal_rounds: DEFAULT_STEAL_ROUNDS,
            thread_name: "raster-worker".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Defaults, overridden by `RASTER_RLE_WORKERS` and
    /// `RASTER_RLE_STEAL_ROUNDS` when they hold positive integers
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let parse = |key: &str| lookup(key)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        let mut config = Self::default();
        if let Some(n) = parse(ENV_WORKERS) {
            config.workers = n;
        }
        if let Some(n) = parse(ENV_STEAL_ROUNDS) {
            config.steal_rounds = n;
        }
        config
    }
    /// Set the number of workers, at least one is used
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
    /// Set the number of stealing rounds
    pub fn with_steal_rounds(mut self, steal_rounds: usize) -> Self {
        self.steal_rounds = steal_rounds;
        self
    }
    /// Set the worker thread name prefix
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
    pub fn validate(&self) -> RasterResult<()> {
        if self.workers == 0 {
            return Err(RasterError::config("workers must be at least 1"));
        }
        if self.steal_rounds == 0 {
            return Err(RasterError::config("steal_rounds must be at least 1"));
        }
        Ok(())
    }
}
