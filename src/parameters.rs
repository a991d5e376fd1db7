use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::adjustment::Adjustment;
use crate::error::ParametersError;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Parameters {
    /// Slider positions a session starts with.
    pub adjustment: Adjustment,
    pub export: SheetNames,
    pub logging: Logging,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetNames {
    pub scores: String,
    pub statistics: String,
    pub parameters: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        SheetNames {
            scores: "adjusted_scores".to_owned(),
            statistics: "statistics".to_owned(),
            parameters: "parameters".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Logging {
    pub config_file: String,
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Logging {
            config_file: "log.yaml".to_owned(),
            level: "info".to_owned(),
        }
    }
}

impl Parameters {
    pub fn new(path: &str) -> Result<Self, ParametersError> {
        Self::from_config(Config::builder().add_source(File::with_name(path)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, ParametersError> {
        Self::from_config(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ParametersError> {
        let mut parameters: Parameters = builder.build()?.try_deserialize()?;

        // configured slider positions obey the same ranges as interactive ones
        parameters.adjustment = parameters.adjustment.clamped();

        Ok(parameters)
    }
}
