//! # keybatch-workload
//!
//! Transaction sources for the keybatch scheduler.
//!
//! Every source implements [`KeySetGenerator`]:
//! - [`HotColdGenerator`]: seeded random keys with a hot subset
//! - [`CyclicGenerator`]: a fixed list of transactions, repeated forever
//! - [`ReplayGenerator`]: transactions read from a text trace, finite
//!
//! [`WorkloadConfig`] selects and parameterizes one of them from a
//! configuration file.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod cyclic;
mod error;
mod hot_cold;
mod replay;

pub use config::WorkloadConfig;
pub use cyclic::CyclicGenerator;
pub use error::{WorkloadError, WorkloadResult};
pub use hot_cold::{HotColdGenerator, HotColdParams};
pub use keybatch_scheduler::KeySetGenerator;
pub use replay::ReplayGenerator;
