//! Ramp curve selection for the sparsity schedule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Curve mapping a training step to a target sparsity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RampType {
    /// Straight line from initial to final sparsity across the window.
    #[default]
    Linear,

    /// Quarter sine wave restarted every cycle (sawtooth).
    HalfCycle,

    /// Absolute sine over the raw step, no restart.
    FullCycle,
}

impl RampType {
    /// Configuration name of this ramp.
    pub fn as_str(&self) -> &'static str {
        match self {
            RampType::Linear => "linear",
            RampType::HalfCycle => "half_cycle",
            RampType::FullCycle => "full_cycle",
        }
    }

    /// Check if this ramp depends on `ramp_cycle_step`.
    pub fn is_cyclic(&self) -> bool {
        matches!(self, RampType::HalfCycle | RampType::FullCycle)
    }
}

impl fmt::Display for RampType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RampType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(RampType::Linear),
            "half_cycle" => Ok(RampType::HalfCycle),
            "full_cycle" => Ok(RampType::FullCycle),
            other => Err(Error::UnsupportedRampType(other.to_string())),
        }
    }
}
