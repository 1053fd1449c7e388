//! Configuration for an extraction run
//!
//! A run is described by six values: the executable, the point cloud to read,
//! the region, the region width and the level-of-detail range. They can come
//! from a TOML file, from `POTREE_EXTRACT_*` environment variables and from
//! explicit overrides; [`ConfigLayer`] holds one such source and
//! [`ConfigLayer::build`] validates the merged result into an
//! [`ExtractConfig`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{InvokeError, Result};
use crate::region::Region;

/// Executable looked up on `PATH` when none is configured
pub const DEFAULT_EXECUTABLE: &str = "CPotree";

/// Deepest level requested when no maximum is configured
pub const DEFAULT_MAX_LEVEL: u32 = 10_000;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "POTREE_EXTRACT_";

/// Validated configuration for a single extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Extraction executable, a path or a name resolved on `PATH`
    executable_path: PathBuf,

    /// Point cloud to extract from
    input_path: PathBuf,

    /// Region to extract
    region: Region,

    /// Width of the region around its outline
    width: f64,

    /// Shallowest octree level to include
    min_level: u32,

    /// Deepest octree level to include
    max_level: u32,
}

impl ExtractConfig {
    /// Create a new extraction configuration with validation
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::InvalidConfig` if:
    /// - Executable or input path is empty
    /// - Width is not a finite positive number
    /// - `min_level` exceeds `max_level`
    ///
    /// # Examples
    ///
    /// ```
    /// # use potree_invoke::ExtractConfig;
    /// let config = ExtractConfig::new(
    ///     "CPotree",
    ///     "pointclouds/CA13/cloud.js",
    ///     "{693550.968, 3915914.169},{693890.618, 3916387.819}".parse()?,
    ///     14.0,
    ///     0,
    ///     1,
    /// );
    /// assert!(config.is_ok());
    /// # Ok::<(), potree_invoke::InvokeError>(())
    /// ```
    pub fn new(
        executable_path: impl Into<PathBuf>,
        input_path: impl Into<PathBuf>,
        region: Region,
        width: f64,
        min_level: u32,
        max_level: u32,
    ) -> Result<Self> {
        let executable_path = executable_path.into();
        let input_path = input_path.into();

        Self::validate_path("executable path", &executable_path)?;
        Self::validate_path("input path", &input_path)?;
        Self::validate_width(width)?;
        Self::validate_levels(min_level, max_level)?;

        Ok(Self {
            executable_path,
            input_path,
            region,
            width,
            min_level,
            max_level,
        })
    }

    /// Get the executable path
    #[must_use]
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Get the input point cloud path
    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Get the region
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Get the region width
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Get the shallowest level
    #[must_use]
    pub const fn min_level(&self) -> u32 {
        self.min_level
    }

    /// Get the deepest level
    #[must_use]
    pub const fn max_level(&self) -> u32 {
        self.max_level
    }

    fn validate_path(what: &str, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            Err(InvokeError::invalid_config(format!("{what} cannot be empty")))
        } else {
            Ok(())
        }
    }

    fn validate_width(width: f64) -> Result<()> {
        if width.is_finite() && width > 0.0 {
            Ok(())
        } else {
            Err(InvokeError::invalid_config(format!(
                "width must be a positive number, got {width}"
            )))
        }
    }

    fn validate_levels(min_level: u32, max_level: u32) -> Result<()> {
        if min_level > max_level {
            Err(InvokeError::invalid_config(format!(
                "min level {min_level} exceeds max level {max_level}"
            )))
        } else {
            Ok(())
        }
    }
}

/// One source of configuration values; every field is optional.
///
/// Layers are merged with [`ConfigLayer::merge`], later layers winning, then
/// validated with [`ConfigLayer::build`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub executable_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub region_coordinates: Option<Region>,
    pub width: Option<f64>,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::ConfigFile` if the file cannot be read or is not
    /// valid TOML for this layer.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InvokeError::config_file(path, e.to_string()))?;

        toml::from_str(&content).map_err(|e| InvokeError::config_file(path, e.to_string()))
    }

    /// Load a layer from `POTREE_EXTRACT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Load a layer using `lookup` to read variables by full name.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        let number = |suffix: &str| -> Result<Option<u32>> {
            var(suffix)
                .map(|value| {
                    value.trim().parse::<u32>().map_err(|e| {
                        InvokeError::invalid_config(format!("{ENV_PREFIX}{suffix}='{value}': {e}"))
                    })
                })
                .transpose()
        };

        let width = var("WIDTH")
            .map(|value| {
                value.trim().parse::<f64>().map_err(|e| {
                    InvokeError::invalid_config(format!("{ENV_PREFIX}WIDTH='{value}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            executable_path: var("EXECUTABLE").map(PathBuf::from),
            input_path: var("INPUT").map(PathBuf::from),
            region_coordinates: var("COORDINATES")
                .map(|s| s.parse::<Region>())
                .transpose()?,
            width,
            min_level: number("MIN_LEVEL")?,
            max_level: number("MAX_LEVEL")?,
        })
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            executable_path: other.executable_path.or(self.executable_path),
            input_path: other.input_path.or(self.input_path),
            region_coordinates: other.region_coordinates.or(self.region_coordinates),
            width: other.width.or(self.width),
            min_level: other.min_level.or(self.min_level),
            max_level: other.max_level.or(self.max_level),
        }
    }

    /// Validate into an [`ExtractConfig`], applying defaults.
    ///
    /// Defaults: executable [`DEFAULT_EXECUTABLE`], min level 0, max level
    /// [`DEFAULT_MAX_LEVEL`]. Input path, region and width are required.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::InvalidConfig` for missing required values and
    /// for anything [`ExtractConfig::new`] rejects.
    pub fn build(self) -> Result<ExtractConfig> {
        let missing = |field: &str| InvokeError::invalid_config(format!("missing {field}"));

        ExtractConfig::new(
            self.executable_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
            self.input_path.ok_or_else(|| missing("input path"))?,
            self.region_coordinates
                .ok_or_else(|| missing("region coordinates"))?,
            self.width.ok_or_else(|| missing("width"))?,
            self.min_level.unwrap_or(0),
            self.max_level.unwrap_or(DEFAULT_MAX_LEVEL),
        )
    }
}
