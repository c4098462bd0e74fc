// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::path::Path;

use anyhow::Result;

use crate::constants::ROOT_INFLOW;
use crate::errors::Error;
use crate::evolution::linking::LinkingStrategy;

/// Settings of the genotype graph construction.
///
/// Can be loaded from YAML, missing keys fall back to the defaults:
/// ```yaml
/// linking: minimal-distance
/// root-inflow: 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    pub linking: LinkingStrategy,
    /// Mass entering the up-weight pass at the clonal root.
    pub root_inflow: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            linking: LinkingStrategy::default(),
            root_inflow: ROOT_INFLOW,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_reader(File::open(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.root_inflow.is_finite() || self.root_inflow < 0.0 {
            return Err(Error::InvalidRootInflow {
                value: self.root_inflow,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml() {
        let config: EngineConfig = serde_yaml::from_str("linking: single-mutation\n").unwrap();
        assert_eq!(config.linking, LinkingStrategy::SingleMutation);
        assert_relative_eq!(config.root_inflow, 1.0);
    }

    #[test]
    fn test_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "root-inflow: 0.0\n").unwrap();
        let config = EngineConfig::from_yaml(&path).unwrap();
        assert_eq!(config.linking, LinkingStrategy::MinimalDistance);
        assert_relative_eq!(config.root_inflow, 0.0);
    }

    #[test]
    fn test_invalid_root_inflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "root-inflow: -2.0\n").unwrap();
        let err = EngineConfig::from_yaml(&path).unwrap_err();
        assert_eq!(
            err.downcast::<Error>().unwrap(),
            Error::InvalidRootInflow { value: -2.0 }
        );

        let config: EngineConfig = serde_yaml::from_str("root-inflow: .inf\n").unwrap();
        assert!(config.validate().is_err());
    }
}
