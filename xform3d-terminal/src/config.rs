//! Coverage runner configuration
//!
//! Settings are read from `xform3d.toml` and may be overridden through
//! environment variables.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "xform3d.toml";

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for the coverage runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Largest accepted round-trip deviation
    pub tolerance: f64,
    /// Sample geometry settings
    pub geometry: GeometryConfig,
    /// Report output settings
    pub report: ReportConfig,
}

/// Sample geometry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Grid subdivisions along each plane edge
    pub resolution: usize,
    /// Distance of each plane from the origin
    pub offset: f64,
    /// Read points from this STL file instead of the plane box
    pub stl: Option<PathBuf>,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Colour PASS/FAIL markers
    pub color: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            geometry: GeometryConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            resolution: 5,
            offset: 0.508,
            stl: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl CoverageConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `xform3d.toml` in the current directory, or
    /// fall back to the defaults if it is missing or unusable
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(DEFAULT_CONFIG_FILE)
    }

    fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                log::warn!("using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    fn merge_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("XFORM3D_TOLERANCE") {
            match val.parse::<f64>() {
                Ok(tolerance) => self.tolerance = tolerance,
                Err(_) => log::warn!("ignoring XFORM3D_TOLERANCE={}", val),
            }
        }
        if let Some(val) = var("XFORM3D_RESOLUTION") {
            match val.parse::<usize>() {
                Ok(resolution) => self.geometry.resolution = resolution,
                Err(_) => log::warn!("ignoring XFORM3D_RESOLUTION={}", val),
            }
        }
        if let Some(val) = var("XFORM3D_NO_COLOR") {
            self.report.color = !(val == "1" || val.eq_ignore_ascii_case("true"));
        }
    }
}
