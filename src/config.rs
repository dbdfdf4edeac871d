//! Survey configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::ble::advertising::DECAWAVE_NAME_PREFIX;
use crate::error::{Error, Result};

/// Default length of the discovery window.
pub const DEFAULT_SCAN_DURATION: Duration = Duration::from_secs(10);

/// Default report destination.
pub const DEFAULT_OUTPUT_PATH: &str = "scan_results.txt";

/// Settings for one survey run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyConfig {
    /// How long the discovery pass listens for advertisements.
    pub scan_duration: Duration,
    /// Short-name prefix identifying target devices.
    pub name_prefix: String,
    /// Index of the local Bluetooth adapter to use.
    pub adapter_index: usize,
    /// Where the report is written.
    pub output_path: PathBuf,
    /// Read and decode Network Node characteristic values while connected.
    pub read_values: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            scan_duration: DEFAULT_SCAN_DURATION,
            name_prefix: DECAWAVE_NAME_PREFIX.to_string(),
            adapter_index: 0,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            read_values: true,
        }
    }
}

impl SurveyConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discovery window.
    pub fn with_scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }

    /// Set the short-name prefix.
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Set the adapter index.
    pub fn with_adapter_index(mut self, index: usize) -> Self {
        self.adapter_index = index;
        self
    }

    /// Set the report destination.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Enable or disable reading characteristic values.
    pub fn with_read_values(mut self, enabled: bool) -> Self {
        self.read_values = enabled;
        self
    }

    /// Check the configuration for values no survey can run with.
    pub fn validate(&self) -> Result<()> {
        if self.scan_duration.is_zero() {
            return Err(Error::InvalidParameter {
                name: "scan_duration".to_string(),
                value: format!("{:?}", self.scan_duration),
            });
        }

        if self.name_prefix.is_empty() {
            return Err(Error::InvalidParameter {
                name: "name_prefix".to_string(),
                value: String::new(),
            });
        }

        Ok(())
    }
}
