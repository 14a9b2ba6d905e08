//! All things related to user-facing configurations.

use std::fs::read_to_string;
use std::num::NonZeroU64;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::output::DEFAULT_OUTPUT_SUFFIX;
use crate::record::{LatencyArithmetic, DEFAULT_TICKS_PER_UNIT};
use crate::ConfigError;

/// Everything a conversion needs to know besides the input file.
///
/// The default values give the classic `_lat.txt` files (2100 ticks per
/// latency unit, wrapping subtraction) and are what the command line always
/// uses. Library users can build their own with [`ConverterConfigBuilder`] or
/// read one from a TOML file with [`ConverterConfig::try_from_config_path`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Clock ticks per unit of the reported latency
    pub ticks_per_unit: NonZeroU64,
    /// Replaces the extension of the input file to form the output filename
    pub output_suffix: String,
    pub arithmetic: LatencyArithmetic,
    /// Level handed to [`crate::setup_logger`] by whoever installs the logger.
    /// The conversion itself doesn't look at it.
    pub log_level: LevelFilter,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfigBuilder::default().build()
    }
}

impl ConverterConfig {
    /// Read a TOML configuration file. Keys missing from the file keep their
    /// default value.
    pub fn try_from_config_path(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;
        let cfg: ConverterConfig = toml::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The suffix ends up as part of a file name, so it has to be a valid
    /// one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_suffix.is_empty() {
            return Err(ConfigError::EmptySuffix);
        }
        if self.output_suffix.chars().any(std::path::is_separator) {
            return Err(ConfigError::SuffixHasSeparator(self.output_suffix.clone()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ConverterConfigBuilder {
    ticks_per_unit: NonZeroU64,
    output_suffix: String,
    arithmetic: LatencyArithmetic,
    log_level: LevelFilter,
}

impl ConverterConfigBuilder {
    /// Starts the builder with the values of the classic `_lat.txt` output.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            ticks_per_unit: NonZeroU64::new(DEFAULT_TICKS_PER_UNIT).unwrap_or(NonZeroU64::MIN),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            arithmetic: LatencyArithmetic::Wrapping,
            log_level: LevelFilter::Warn,
        }
    }

    pub fn build(&self) -> ConverterConfig {
        ConverterConfig {
            ticks_per_unit: self.ticks_per_unit,
            output_suffix: self.output_suffix.clone(),
            arithmetic: self.arithmetic,
            log_level: self.log_level,
        }
    }

    pub fn with_ticks_per_unit(&mut self, ticks_per_unit: NonZeroU64) -> &mut Self {
        self.ticks_per_unit = ticks_per_unit;
        self
    }

    pub fn with_output_suffix<T: Into<String>>(&mut self, output_suffix: T) -> &mut Self {
        self.output_suffix = output_suffix.into();
        self
    }

    pub fn with_arithmetic(&mut self, arithmetic: LatencyArithmetic) -> &mut Self {
        self.arithmetic = arithmetic;
        self
    }

    pub fn with_log_level(&mut self, log_level: LevelFilter) -> &mut Self {
        self.log_level = log_level;
        self
    }
}
