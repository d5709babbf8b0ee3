//! Pruner configuration module
//!
//! Provides the ramp curve and granularity selectors plus the
//! [`PrunerConfig`] consumed by the pruner.

mod granularity;
mod pruner_config;
mod ramp;


pub use granularity::PruneGranularity;
pub use pruner_config::PrunerConfig;
pub use ramp::RampType;
