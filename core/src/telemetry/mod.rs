//! Logging and counters for the multiplier.

pub mod log;
pub mod metrics;

pub use self::log::LogManager;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
