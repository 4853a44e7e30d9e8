use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfGenError, Result};
use crate::slurm::ResourceOptions;

/// Interfaces tried, in order, when looking up the node address.
pub const DEFAULT_INTERFACES: [&str; 2] = ["eno1", "eno2"];

/// Share of physical memory held back from the scheduler.
pub const MEMORY_RESERVE_PERCENT: u8 = 5;

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_DEVICE_PATH_PREFIX: &str = "/dev/nvidia";

const CONFIG_DIR_NAME: &str = "node-confgen";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// How de-duplicated accelerator names are ordered in the feature tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureOrder {
    #[default]
    Sorted,
    ReportOrder,
}

/// Where accelerator names (and device indices) come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AcceleratorSource {
    /// `nvidia-smi` name listing; device files follow report order.
    #[default]
    Smi,
    /// NVML device enumeration; device files follow each device's minor number.
    Nvml,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub interfaces: Vec<String>,
    pub probe_timeout_secs: u64,
    pub memory_reserve_percent: u8,
    pub device_path_prefix: String,
    pub feature_order: FeatureOrder,
    pub accelerator_source: AcceleratorSource,
    pub include_gpu_types: bool,
    pub include_hyperthreads: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interfaces: DEFAULT_INTERFACES.iter().map(|s| s.to_string()).collect(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            memory_reserve_percent: MEMORY_RESERVE_PERCENT,
            device_path_prefix: DEFAULT_DEVICE_PATH_PREFIX.to_string(),
            feature_order: FeatureOrder::default(),
            accelerator_source: AcceleratorSource::default(),
            include_gpu_types: false,
            include_hyperthreads: false,
        }
    }
}

impl GeneratorConfig {
    /// Load from an explicit file, or from the per-user config file when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        let config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading configuration");
                let text = fs::read_to_string(&path).map_err(|e| ConfGenError::io(&path, e))?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| ConfGenError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.interfaces.is_empty() {
            return Err(ConfGenError::Config("interfaces must not be empty".to_string()));
        }
        if self.memory_reserve_percent > 100 {
            return Err(ConfGenError::Config(format!(
                "memory_reserve_percent must be between 0 and 100, got {}",
                self.memory_reserve_percent
            )));
        }
        if self.device_path_prefix.trim().is_empty() {
            return Err(ConfGenError::Config("device_path_prefix must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn resource_options(&self) -> ResourceOptions {
        ResourceOptions {
            include_gpu_types: self.include_gpu_types,
            include_hyperthreads: self.include_hyperthreads,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.interfaces, vec!["eno1", "eno2"]);
        assert_eq!(config.memory_reserve_percent, 5);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.feature_order, FeatureOrder::Sorted);
        assert_eq!(config.accelerator_source, AcceleratorSource::Smi);
        assert!(!config.resource_options().include_gpu_types);
        assert!(!config.resource_options().include_hyperthreads);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = GeneratorConfig::from_yaml("interfaces: [ib0]\nfeature_order: report-order\n").unwrap();
        assert_eq!(config.interfaces, vec!["ib0"]);
        assert_eq!(config.feature_order, FeatureOrder::ReportOrder);
        assert_eq!(config.memory_reserve_percent, 5);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GeneratorConfig::from_yaml("interface: eno1\n").unwrap_err();
        assert!(matches!(err, ConfGenError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GeneratorConfig::default();
        config.memory_reserve_percent = 101;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.interfaces.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "include_gpu_types: true\naccelerator_source: nvml\n").unwrap();

        let config = GeneratorConfig::load(Some(path.as_path())).unwrap();
        assert!(config.include_gpu_types);
        assert_eq!(config.accelerator_source, AcceleratorSource::Nvml);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::load(Some(dir.path().join("absent.yaml").as_path())).unwrap_err();
        assert!(matches!(err, ConfGenError::Io { .. }));
    }
}
