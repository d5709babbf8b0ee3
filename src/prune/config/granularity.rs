//! Pruning granularity selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Unit of removal for magnitude pruning.
///
/// Parsing any name other than `weight` or `unit` fails with
/// [`Error::UnsupportedPruneType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PruneGranularity {
    /// Individual weights, thresholded per output feature.
    #[default]
    Weight,

    /// Whole output units, ranked by the L2 norm of their parameter vector.
    Unit,
}

impl PruneGranularity {
    /// Configuration name of this granularity.
    pub fn as_str(&self) -> &'static str {
        match self {
            PruneGranularity::Weight => "weight",
            PruneGranularity::Unit => "unit",
        }
    }

    /// Check if this granularity removes entire output units.
    pub fn is_structured(&self) -> bool {
        matches!(self, PruneGranularity::Unit)
    }
}

impl fmt::Display for PruneGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PruneGranularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(PruneGranularity::Weight),
            "unit" => Ok(PruneGranularity::Unit),
            other => Err(Error::UnsupportedPruneType(other.to_string())),
        }
    }
}
