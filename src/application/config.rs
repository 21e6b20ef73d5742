use crate::error::{BatchError, Result};
use std::time::Duration;

pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_millis(500);

/// Engine tuning knobs.
///
/// `max_batch_size` caps how many jobs a single tick may dispatch;
/// `batch_interval` is the period of the dispatch timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchConfig {
    pub max_batch_size: usize,
    pub batch_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            batch_interval: DEFAULT_BATCH_INTERVAL,
        }
    }
}

impl BatchConfig {
    /// Creates a validated configuration. Both values must be positive.
    pub fn new(max_batch_size: usize, batch_interval: Duration) -> Result<Self> {
        if max_batch_size == 0 {
            return Err(BatchError::InvalidConfig(
                "max_batch_size must be positive".to_string(),
            ));
        }
        if batch_interval.is_zero() {
            return Err(BatchError::InvalidConfig(
                "batch_interval must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_batch_size,
            batch_interval,
        })
    }
}
