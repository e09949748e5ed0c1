use crate::prelude::MatrixError;
use std::sync::Mutex;

/// Point-in-time copy of the multiplier counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub multiplied: usize,
    /// Operand pairs refused for their shapes.
    pub mismatched: usize,
    pub overflowed: usize,
}

impl MetricsSnapshot {
    pub fn failed(&self) -> usize {
        self.mismatched + self.overflowed
    }
}

/// Multiplication outcome counters; safe to share between threads.
#[derive(Default)]
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_multiplied(&self) {
        self.update(|metrics| metrics.multiplied += 1);
    }

    /// Buckets a rejected multiplication by its cause.
    pub fn record_rejected(&self, err: &MatrixError) {
        match err {
            MatrixError::Overflow { .. } => self.update(|metrics| metrics.overflowed += 1),
            _ => self.update(|metrics| metrics.mismatched += 1),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut *metrics);
        }
    }
}
