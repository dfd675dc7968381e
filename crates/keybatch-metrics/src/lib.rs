//! # keybatch-metrics
//!
//! Statistics over completed batches for the keybatch scheduler.
//!
//! Features:
//! - Ordered record of completed batch sizes with mean / standard deviation
//! - Histogram of batch sizes
//! - Counters and gauges for scheduler activity
//! - JSON export

#![warn(missing_docs)]
#![warn(clippy::all)]

mod collector;
mod export;
mod histogram;
mod stats;

pub use collector::{Metrics, MetricsCollector};
pub use export::{HistogramSummary, MetricsSnapshot};
pub use histogram::Histogram;
pub use stats::BatchStats;

/// Counter: transactions pulled from the generator
pub const TRANSACTIONS_EXAMINED: &str = "transactions_examined";
/// Counter: successful first-fit merges into an accumulating station
pub const MERGES: &str = "merges";
/// Counter: stations flushed as completed batches
pub const EVICTIONS: &str = "evictions";
/// Gauge: stations currently holding at least one transaction
pub const STATIONS_ACTIVE: &str = "stations_active";
/// Histogram: sizes of completed batches
pub const BATCH_SIZE: &str = "batch_size";
