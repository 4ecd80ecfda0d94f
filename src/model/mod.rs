use serde::{Deserialize, Serialize};

use crate::error::{EconError, Result};

/// Calendar year used as the join key for every table.
pub type Year = i32;

/// Yearly production deltas for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionRow {
    pub year: Year,
    /// Oil produced during the year [STB].
    pub oil: f64,
    /// Condensate produced during the year [STB].
    pub condensate: f64,
    /// Gas produced during the year [MSCF].
    pub gas: f64,
}

/// Yearly drilling, workover and facilities schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub year: Year,
    pub vertical_wells: f64,
    pub horizontal_wells: f64,
    pub injection_wells: f64,
    pub source_wells: f64,
    pub workover_perf_shutoff: f64,
    pub workover_pump_replacement: f64,
    /// Share of the facilities budget paid this year, as a fraction (0-1).
    pub facilities_fraction: f64,
}

/// Share of the year in which make-up gas is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub year: Year,
    pub availability: f64,
}

/// One joined row of the three input tables. This is the shared skeleton every
/// scenario evaluates against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearInputs {
    pub year: Year,
    pub vertical_wells: f64,
    pub horizontal_wells: f64,
    pub injection_wells: f64,
    pub source_wells: f64,
    pub workover_perf_shutoff: f64,
    pub workover_pump_replacement: f64,
    pub facilities_fraction: f64,
    pub oil: f64,
    pub condensate: f64,
    pub gas: f64,
    pub availability: f64,
}

impl YearInputs {
    /// Combines a schedule row and a production row for the same year.
    pub fn from_parts(schedule: &ScheduleRow, production: &ProductionRow, availability: f64) -> Self {
        Self {
            year: schedule.year,
            vertical_wells: schedule.vertical_wells,
            horizontal_wells: schedule.horizontal_wells,
            injection_wells: schedule.injection_wells,
            source_wells: schedule.source_wells,
            workover_perf_shutoff: schedule.workover_perf_shutoff,
            workover_pump_replacement: schedule.workover_pump_replacement,
            facilities_fraction: schedule.facilities_fraction,
            oil: production.oil,
            condensate: production.condensate,
            gas: production.gas,
            availability,
        }
    }
}

/// A fully derived ledger row. Monetary columns are in millions of dollars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub inputs: YearInputs,
    /// Oil volume after operating efficiency [STB].
    pub oil_volume: f64,
    /// Condensate volume after operating efficiency [STB].
    pub condensate_volume: f64,
    /// Gas volume after operating efficiency [MSCF].
    pub gas_volume: f64,
    pub total_capex: f64,
    pub escalation_factor: f64,
    pub escalated_capex: f64,
    pub cumulative_capex: f64,
    pub boe_mmstb: f64,
    pub operating_opex: f64,
    pub makeup_gas_opex: f64,
    pub total_opex: f64,
    pub escalated_opex: f64,
    pub cumulative_opex: f64,
    pub total_cost: f64,
    pub escalated_cost: f64,
    pub cumulative_escalated_cost: f64,
    pub oil_price: f64,
    pub condensate_price: f64,
    pub gas_price: f64,
    pub oil_revenue: f64,
    pub condensate_revenue: f64,
    pub gas_revenue: f64,
    pub total_revenue: f64,
    pub cumulative_revenue: f64,
    pub ncf: f64,
    pub cumulative_ncf: f64,
    pub discount_factor: f64,
    pub discounted_ncf: f64,
    pub discounted_capex: f64,
}

impl YearRecord {
    pub fn year(&self) -> Year {
        self.inputs.year
    }
}

/// Ordered annual ledger, ascending by year with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub rows: Vec<YearRecord>,
}

/// Summary indicators reduced from a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub npv: f64,
    /// Cumulative profitability index. `None` when the discounted CAPEX sum is
    /// zero, which renders as `inf`.
    pub cpi: Option<f64>,
    pub pir: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub cumulative_ncf: f64,
}

/// Economic assumptions for one evaluation. Monetary inputs are MM$ except the
/// unit prices and unit costs noted on each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub start_year: Year,
    /// Number of years kept from the start year. `None` keeps every joined row.
    pub horizon_years: Option<u32>,
    /// Oil price [$/bbl].
    pub oil_price: f64,
    /// Condensate price [$/bbl].
    pub condensate_price: f64,
    /// Gas price [$/MMSCF].
    pub gas_price: f64,
    pub price_inflation: f64,
    pub cost_inflation: f64,
    /// Keep prices flat instead of escalating them with `price_inflation`.
    pub fixed_price: bool,
    pub discount_rate: f64,
    /// Field operating efficiency applied to produced volumes (0-1).
    pub operating_efficiency: f64,
    /// Lifting cost [$/BOE].
    pub cost_per_boe: f64,
    /// Gas volume per barrel of oil equivalent [SCF/BOE].
    pub conversion_factor: f64,
    /// Daily make-up gas requirement [MMSCF/d].
    pub makeup_gas_daily_mmscf: f64,
    /// Make-up gas unit cost [$/MMSCF].
    pub makeup_gas_cost: f64,
    pub vertical_well_cost: f64,
    pub horizontal_well_cost: f64,
    pub injection_well_cost: f64,
    pub source_well_cost: f64,
    pub workover_perf_cost: f64,
    pub workover_pump_cost: f64,
    pub facilities_total_cost: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            start_year: 2023,
            horizon_years: None,
            oil_price: 60.0,
            condensate_price: 65.0,
            gas_price: 2.8,
            price_inflation: 0.02,
            cost_inflation: 0.05,
            fixed_price: true,
            discount_rate: 0.10,
            operating_efficiency: 1.0,
            cost_per_boe: 9.0,
            conversion_factor: 6000.0,
            makeup_gas_daily_mmscf: 56.0,
            makeup_gas_cost: 2.8,
            vertical_well_cost: 5.48,
            horizontal_well_cost: 8.0,
            injection_well_cost: 4.0,
            source_well_cost: 3.5,
            workover_perf_cost: 1.0,
            workover_pump_cost: 0.5,
            facilities_total_cost: 150.0,
        }
    }
}

impl Assumptions {
    /// Checks the ranges the formulas depend on.
    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("price_inflation", self.price_inflation),
            ("cost_inflation", self.cost_inflation),
            ("discount_rate", self.discount_rate),
        ];
        for (field, rate) in rates {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(EconError::InvalidAssumption {
                    field,
                    reason: format!("rate {rate} must be finite and greater than -1"),
                });
            }
        }

        if !(self.conversion_factor > 0.0) {
            return Err(EconError::InvalidAssumption {
                field: "conversion_factor",
                reason: format!("{} must be positive", self.conversion_factor),
            });
        }

        if !(0.0..=1.0).contains(&self.operating_efficiency) {
            return Err(EconError::InvalidAssumption {
                field: "operating_efficiency",
                reason: format!("{} must lie between 0 and 1", self.operating_efficiency),
            });
        }

        Ok(())
    }

    /// Year offset from the start of the analysis. Negative before the start.
    pub fn offset(&self, year: Year) -> i32 {
        year - self.start_year
    }
}
