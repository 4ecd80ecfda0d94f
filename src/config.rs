//! TOML configuration.
//!
//! Every section is optional and falls back to the defaults of the model:
//!
//! ```toml
//! [assumptions]
//! start_year = 2024
//! oil_price = 70.0
//!
//! [sensitivity.low]
//! oil_price = 45.0
//! discount_rate = 0.15
//! cost_per_boe = 12.0
//!
//! [extraction.workover]
//! max_per_year = 8
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::economics::sensitivity::{CaseInputs, SensitivityBands};
use crate::error::{EconError, Result};
use crate::model::Assumptions;
use crate::report::production::ProductionPrep;
use crate::schedule::availability::AvailabilityTemplate;
use crate::schedule::template::ScheduleTemplate;
use crate::schedule::workover::WorkoverRule;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assumptions: Assumptions,
    pub sensitivity: SensitivityOverrides,
    pub extraction: ExtractionConfig,
}

/// Low and high cases replacing the defaults derived from the assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityOverrides {
    pub low: Option<CaseInputs>,
    pub high: Option<CaseInputs>,
}

impl SensitivityOverrides {
    pub fn resolve(&self, assumptions: &Assumptions) -> SensitivityBands {
        let defaults = SensitivityBands::around(assumptions);
        SensitivityBands {
            low: self.low.unwrap_or(defaults.low),
            high: self.high.unwrap_or(defaults.high),
        }
    }
}

/// Settings of the report extraction commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub production: ProductionPrep,
    pub workover: WorkoverRule,
    pub schedule: ScheduleTemplate,
    pub availability: AvailabilityTemplate,
}

impl AppConfig {
    /// Loads the configuration at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(EconError::MissingInput(path.to_path_buf()));
                }
                let content = fs::read_to_string(path)?;
                let config: AppConfig = toml::from_str(&content)?;
                info!(path = %path.display(), "configuration loaded");
                config
            }
            None => AppConfig::default(),
        };
        config.assumptions.validate()?;
        config.sensitivity_bands().validate(&config.assumptions)?;
        Ok(config)
    }

    pub fn sensitivity_bands(&self) -> SensitivityBands {
        self.sensitivity.resolve(&self.assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [assumptions]
            start_year = 2024
            oil_price = 70.0

            [sensitivity.low]
            oil_price = 45.0
            discount_rate = 0.2
            cost_per_boe = 12.0

            [extraction.workover]
            max_per_year = 8
            "#,
        )
        .expect("config parsed");

        assert_eq!(config.assumptions.start_year, 2024);
        assert_eq!(config.assumptions.oil_price, 70.0);
        assert_eq!(config.assumptions.cost_per_boe, 9.0);
        assert_eq!(config.extraction.workover.max_per_year, 8);
        assert_eq!(config.extraction.workover.threshold_year, 2027);

        let bands = config.sensitivity_bands();
        assert_eq!(bands.low.oil_price, 45.0);
        assert_eq!(bands.high.oil_price, 80.0);
    }

    #[test]
    fn invalid_assumptions_are_rejected() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[assumptions]\noperating_efficiency = 1.5\n").expect("config written");

        let error = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(
            error,
            EconError::InvalidAssumption {
                field: "operating_efficiency",
                ..
            }
        ));
    }

    #[test]
    fn sensitivity_overrides_are_range_checked() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[sensitivity.high]\noil_price = 70.0\ndiscount_rate = -1.0\ncost_per_boe = 7.0\n",
        )
        .expect("config written");

        let error = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(
            error,
            EconError::InvalidAssumption {
                field: "discount_rate",
                ..
            }
        ));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let error = AppConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(error, EconError::MissingInput(_)));
    }
}
