use std::fs;
use std::path::Path;

use tracing::debug;

use super::RunConfig;
use crate::error::{Error, Result};
use crate::prune::PrunerConfig;

/// Load and validate a run configuration from a YAML file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<RunConfig> {
    let path = config_path.as_ref();
    let yaml = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("failed to read config file {}", path.display()), e))?;
    let config = parse_config(&yaml)?;
    debug!(path = %path.display(), adversarial = config.attack.is_some(), "loaded run config");
    Ok(config)
}

/// Parse and validate a run configuration from YAML text.
///
/// Unknown keys in any section are rejected. An unknown `prune_type` or
/// `ramp_type` fails with [`Error::UnsupportedPruneType`] or
/// [`Error::UnsupportedRampType`].
pub fn parse_config(yaml: &str) -> Result<RunConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    if let Some(pruning) = value.get("pruning") {
        PrunerConfig::check_names(pruning)?;
    }
    let config: RunConfig = serde_yaml::from_value(value)?;
    config.validate()?;
    Ok(config)
}
