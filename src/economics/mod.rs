//! Annual cash-flow calculator.
//!
//! [`compute`] derives every ledger column from the joined yearly inputs in a
//! single pass: CAPEX, cost escalation, OPEX, revenue, net cash flow and
//! discounting. [`reduce_indicators`] folds the ledger into NPV, CPI and PIR.

pub mod join;
pub mod sensitivity;

use serde::{Deserialize, Serialize};

use crate::model::{Assumptions, Indicators, Ledger, YearInputs, YearRecord};

pub use join::{ModelInputs, apply_horizon, join_tables};

const BARRELS_PER_MILLION: f64 = 1e6;
const MSCF_TO_SCF: f64 = 1e3;
const DAYS_PER_YEAR: f64 = 365.0;

/// Ledger and indicators produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub ledger: Ledger,
    pub indicators: Indicators,
}

/// Evaluates the economic model over the joined yearly inputs.
pub fn compute(inputs: &[YearInputs], assumptions: &Assumptions) -> Evaluation {
    let ledger = build_ledger(inputs, assumptions);
    let indicators = reduce_indicators(&ledger);
    Evaluation { ledger, indicators }
}

/// Derives the ledger rows. `inputs` must be ascending by year for the
/// cumulative columns to be meaningful.
pub fn build_ledger(inputs: &[YearInputs], assumptions: &Assumptions) -> Ledger {
    let mut totals = RunningTotals::default();
    let rows = inputs
        .iter()
        .map(|row| {
            let mut record = derive_row(row, assumptions);
            totals.accumulate(&mut record);
            record
        })
        .collect();
    Ledger { rows }
}

fn derive_row(row: &YearInputs, assumptions: &Assumptions) -> YearRecord {
    let offset = assumptions.offset(row.year);

    let total_capex = row.vertical_wells * assumptions.vertical_well_cost
        + row.horizontal_wells * assumptions.horizontal_well_cost
        + row.injection_wells * assumptions.injection_well_cost
        + row.source_wells * assumptions.source_well_cost
        + row.workover_perf_shutoff * assumptions.workover_perf_cost
        + row.workover_pump_replacement * assumptions.workover_pump_cost
        + row.facilities_fraction * assumptions.facilities_total_cost;
    let escalation_factor = compound(assumptions.cost_inflation, offset);
    let escalated_capex = total_capex * escalation_factor;

    let efficiency = assumptions.operating_efficiency;
    let oil = row.oil * efficiency;
    let condensate = row.condensate * efficiency;
    let gas = row.gas * efficiency;

    let boe_mmstb =
        (oil + condensate + gas * MSCF_TO_SCF / assumptions.conversion_factor) / BARRELS_PER_MILLION;
    let operating_opex = boe_mmstb * assumptions.cost_per_boe;
    let makeup_gas_opex = assumptions.makeup_gas_cost
        * assumptions.makeup_gas_daily_mmscf
        * DAYS_PER_YEAR
        * row.availability
        / 1e3;
    let total_opex = operating_opex + makeup_gas_opex;
    let escalated_opex = total_opex * escalation_factor;

    let price_factor = if assumptions.fixed_price {
        1.0
    } else {
        compound(assumptions.price_inflation, offset)
    };
    let oil_price = assumptions.oil_price * price_factor;
    let condensate_price = assumptions.condensate_price * price_factor;
    let gas_price = assumptions.gas_price * price_factor;

    let oil_revenue = oil * oil_price / BARRELS_PER_MILLION;
    let condensate_revenue = condensate * condensate_price / BARRELS_PER_MILLION;
    let gas_revenue = gas * MSCF_TO_SCF * gas_price / 1e9;
    let total_revenue = oil_revenue + condensate_revenue + gas_revenue;

    let escalated_cost = escalated_capex + escalated_opex;
    let ncf = total_revenue - escalated_cost;
    let discount_factor = compound(assumptions.discount_rate, -offset);

    YearRecord {
        inputs: *row,
        oil_volume: oil,
        condensate_volume: condensate,
        gas_volume: gas,
        total_capex,
        escalation_factor,
        escalated_capex,
        boe_mmstb,
        operating_opex,
        makeup_gas_opex,
        total_opex,
        escalated_opex,
        total_cost: total_capex + total_opex,
        escalated_cost,
        oil_price,
        condensate_price,
        gas_price,
        oil_revenue,
        condensate_revenue,
        gas_revenue,
        total_revenue,
        ncf,
        discount_factor,
        discounted_ncf: ncf * discount_factor,
        discounted_capex: escalated_capex * discount_factor,
        ..YearRecord::default()
    }
}

/// `(1 + rate)^exponent`; exactly 1 when the exponent is zero.
fn compound(rate: f64, exponent: i32) -> f64 {
    (1.0 + rate).powi(exponent)
}

#[derive(Default)]
struct RunningTotals {
    capex: f64,
    opex: f64,
    escalated_cost: f64,
    revenue: f64,
    ncf: f64,
}

impl RunningTotals {
    fn accumulate(&mut self, record: &mut YearRecord) {
        self.capex += record.escalated_capex;
        self.opex += record.escalated_opex;
        self.escalated_cost += record.escalated_cost;
        self.revenue += record.total_revenue;
        self.ncf += record.ncf;

        record.cumulative_capex = self.capex;
        record.cumulative_opex = self.opex;
        record.cumulative_escalated_cost = self.escalated_cost;
        record.cumulative_revenue = self.revenue;
        record.cumulative_ncf = self.ncf;
    }
}

/// Folds a ledger into the investment indicators.
pub fn reduce_indicators(ledger: &Ledger) -> Indicators {
    let rows = &ledger.rows;
    let npv: f64 = rows.iter().map(|row| row.discounted_ncf).sum();
    let discounted_capex: f64 = rows.iter().map(|row| row.discounted_capex).sum();
    let escalated_capex: f64 = rows.iter().map(|row| row.escalated_capex).sum();

    let cpi = if discounted_capex != 0.0 {
        Some(npv / discounted_capex)
    } else {
        None
    };
    let pir = if escalated_capex != 0.0 {
        npv / escalated_capex
    } else {
        0.0
    };

    Indicators {
        npv,
        cpi,
        pir,
        total_revenue: rows.iter().map(|row| row.total_revenue).sum(),
        total_cost: rows.iter().map(|row| row.escalated_cost).sum(),
        cumulative_ncf: rows.last().map(|row| row.cumulative_ncf).unwrap_or(0.0),
    }
}
