//! Low/mid/high sweep over oil price, discount rate and lifting cost, repeated
//! for a zero-cost and a user-cost make-up gas scenario.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::economics::{Evaluation, compute};
use crate::error::Result;
use crate::model::{Assumptions, YearInputs};

pub const NO_MAKEUP_GAS_LABEL: &str = "No Makeup Gas Cost";
pub const WITH_MAKEUP_GAS_LABEL: &str = "With Makeup Gas Cost";

/// The three scalars substituted for each case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseInputs {
    pub oil_price: f64,
    pub discount_rate: f64,
    pub cost_per_boe: f64,
}

impl CaseInputs {
    /// Case matching the base assumptions.
    pub fn from_assumptions(assumptions: &Assumptions) -> Self {
        Self {
            oil_price: assumptions.oil_price,
            discount_rate: assumptions.discount_rate,
            cost_per_boe: assumptions.cost_per_boe,
        }
    }

    /// Pessimistic case: cheaper oil, dearer money, dearer lifting.
    pub fn default_low(mid: &Self) -> Self {
        Self {
            oil_price: mid.oil_price - 10.0,
            discount_rate: mid.discount_rate + 0.05,
            cost_per_boe: mid.cost_per_boe + 3.0,
        }
    }

    /// Optimistic case.
    pub fn default_high(mid: &Self) -> Self {
        Self {
            oil_price: mid.oil_price + 10.0,
            discount_rate: mid.discount_rate - 0.05,
            cost_per_boe: mid.cost_per_boe - 2.0,
        }
    }

    fn apply(&self, base: &Assumptions, makeup_gas_cost: f64) -> Assumptions {
        Assumptions {
            oil_price: self.oil_price,
            discount_rate: self.discount_rate,
            cost_per_boe: self.cost_per_boe,
            makeup_gas_cost,
            ..base.clone()
        }
    }
}

/// Low and high substitutions; the mid case always uses the base assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityBands {
    pub low: CaseInputs,
    pub high: CaseInputs,
}

impl SensitivityBands {
    pub fn around(assumptions: &Assumptions) -> Self {
        let mid = CaseInputs::from_assumptions(assumptions);
        Self {
            low: CaseInputs::default_low(&mid),
            high: CaseInputs::default_high(&mid),
        }
    }

    /// Applies the range checks of [`Assumptions::validate`] to the low and
    /// high substitutions.
    pub fn validate(&self, base: &Assumptions) -> Result<()> {
        for case in [&self.low, &self.high] {
            case.apply(base, base.makeup_gas_cost).validate()?;
        }
        Ok(())
    }
}

/// Make-up gas treatment of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MakeupGasScenario {
    NoCost,
    WithCost(f64),
}

impl MakeupGasScenario {
    pub fn label(&self) -> &'static str {
        match self {
            MakeupGasScenario::NoCost => NO_MAKEUP_GAS_LABEL,
            MakeupGasScenario::WithCost(_) => WITH_MAKEUP_GAS_LABEL,
        }
    }

    pub fn unit_cost(&self) -> f64 {
        match self {
            MakeupGasScenario::NoCost => 0.0,
            MakeupGasScenario::WithCost(cost) => *cost,
        }
    }
}

/// Evaluations of the three cases under one make-up gas scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: MakeupGasScenario,
    pub low: Evaluation,
    pub mid: Evaluation,
    pub high: Evaluation,
}

impl ScenarioResult {
    pub fn label(&self) -> &'static str {
        self.scenario.label()
    }

    /// Cases in low, mid, high order with their display names.
    pub fn cases(&self) -> [(&'static str, &Evaluation); 3] {
        [
            ("Low Case", &self.low),
            ("Med Case", &self.mid),
            ("High Case", &self.high),
        ]
    }
}

/// Runs the three cases for one scenario against the shared skeleton.
pub fn run_scenario(
    inputs: &[YearInputs],
    base: &Assumptions,
    bands: &SensitivityBands,
    scenario: MakeupGasScenario,
) -> ScenarioResult {
    let cost = scenario.unit_cost();
    let mid = CaseInputs::from_assumptions(base);
    debug!(scenario = scenario.label(), makeup_gas_cost = cost, "running sensitivity scenario");

    ScenarioResult {
        scenario,
        low: compute(inputs, &bands.low.apply(base, cost)),
        mid: compute(inputs, &mid.apply(base, cost)),
        high: compute(inputs, &bands.high.apply(base, cost)),
    }
}

/// Runs the zero-cost and user-cost make-up gas scenarios.
pub fn run_sweep(
    inputs: &[YearInputs],
    base: &Assumptions,
    bands: &SensitivityBands,
) -> Vec<ScenarioResult> {
    let results: Vec<ScenarioResult> = [
        MakeupGasScenario::NoCost,
        MakeupGasScenario::WithCost(base.makeup_gas_cost),
    ]
    .into_iter()
    .map(|scenario| run_scenario(inputs, base, bands, scenario))
    .collect();

    for result in &results {
        info!(
            scenario = result.label(),
            low_npv = result.low.indicators.npv,
            mid_npv = result.mid.indicators.npv,
            high_npv = result.high.indicators.npv,
            "sensitivity scenario complete"
        );
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EconError;

    fn skeleton() -> Vec<YearInputs> {
        (2024..2034)
            .map(|year| YearInputs {
                year,
                vertical_wells: if year == 2024 { 4.0 } else { 0.0 },
                oil: 2_000_000.0 / f64::from(year - 2023),
                gas: 500_000.0,
                availability: if year < 2027 { 1.0 } else { 0.0 },
                ..YearInputs::default()
            })
            .collect()
    }

    #[test]
    fn npv_is_monotonic_in_oil_price() {
        let base = Assumptions {
            start_year: 2024,
            ..Assumptions::default()
        };
        let mid = CaseInputs::from_assumptions(&base);
        let bands = SensitivityBands {
            low: CaseInputs {
                oil_price: mid.oil_price - 15.0,
                ..mid
            },
            high: CaseInputs {
                oil_price: mid.oil_price + 15.0,
                ..mid
            },
        };

        for result in run_sweep(&skeleton(), &base, &bands) {
            let low = result.low.indicators.npv;
            let mid = result.mid.indicators.npv;
            let high = result.high.indicators.npv;
            assert!(low <= mid && mid <= high, "{low} {mid} {high}");
        }
    }

    #[test]
    fn no_cost_scenario_zeroes_makeup_gas_opex() {
        let base = Assumptions {
            start_year: 2024,
            ..Assumptions::default()
        };
        let bands = SensitivityBands::around(&base);
        let results = run_sweep(&skeleton(), &base, &bands);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label(), NO_MAKEUP_GAS_LABEL);
        assert!(
            results[0]
                .mid
                .ledger
                .rows
                .iter()
                .all(|row| row.makeup_gas_opex == 0.0)
        );
        assert_eq!(results[1].label(), WITH_MAKEUP_GAS_LABEL);
        assert!(results[1].mid.ledger.rows[0].makeup_gas_opex > 0.0);
        assert!(results[1].mid.indicators.npv < results[0].mid.indicators.npv);
    }

    #[test]
    fn bands_reuse_assumption_range_checks() {
        let base = Assumptions::default();
        let mut bands = SensitivityBands::around(&base);
        assert!(bands.validate(&base).is_ok());

        bands.high.discount_rate = -1.0;
        let error = bands.validate(&base).unwrap_err();
        assert!(matches!(
            error,
            EconError::InvalidAssumption {
                field: "discount_rate",
                ..
            }
        ));

        let near_floor = Assumptions {
            discount_rate: -0.96,
            ..Assumptions::default()
        };
        assert!(near_floor.validate().is_ok());
        assert!(SensitivityBands::around(&near_floor).validate(&near_floor).is_err());
    }

    #[test]
    fn default_bands_shift_around_mid() {
        let base = Assumptions::default();
        let bands = SensitivityBands::around(&base);
        assert_eq!(bands.low.oil_price, 50.0);
        assert_eq!(bands.high.oil_price, 70.0);
        assert!((bands.low.discount_rate - 0.15).abs() < 1e-12);
        assert!((bands.high.discount_rate - 0.05).abs() < 1e-12);
        assert_eq!(bands.low.cost_per_boe, 12.0);
        assert_eq!(bands.high.cost_per_boe, 7.0);
    }
}
