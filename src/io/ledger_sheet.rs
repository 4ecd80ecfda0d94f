//! Tabular layouts of evaluation results.

use crate::economics::Evaluation;
use crate::economics::sensitivity::ScenarioResult;
use crate::io::{CellValue, SheetTable, WorkbookData};
use crate::model::{Indicators, YearRecord};

pub const LEDGER_SHEET: &str = "Ledger";
pub const INDICATORS_SHEET: &str = "Indicators";

type Extractor = fn(&YearRecord) -> f64;

const LEDGER_COLUMNS: &[(&str, Extractor)] = &[
    ("Year", |r| f64::from(r.inputs.year)),
    ("Planned Vertical Wells", |r| r.inputs.vertical_wells),
    ("Planned Horizontal Wells", |r| r.inputs.horizontal_wells),
    ("Planned Water Injection Wells", |r| r.inputs.injection_wells),
    ("Planned Water Source Wells", |r| r.inputs.source_wells),
    ("Workover (Perf or Shut-off)", |r| r.inputs.workover_perf_shutoff),
    ("Workover (Pump Replacement)", |r| r.inputs.workover_pump_replacement),
    ("Facilities Payment Schedule (%)", |r| r.inputs.facilities_fraction),
    ("Oil Prod STB", |r| r.oil_volume),
    ("Cond Prod STB", |r| r.condensate_volume),
    ("Gas Prod MSCF", |r| r.gas_volume),
    ("Availability", |r| r.inputs.availability),
    ("Total CAPEX MM$", |r| r.total_capex),
    ("Inflation Factor", |r| r.escalation_factor),
    ("Escalated CAPEX MM$", |r| r.escalated_capex),
    ("Cumulative CAPEX", |r| r.cumulative_capex),
    ("BOE MMSTB", |r| r.boe_mmstb),
    ("OPEX1 MM$", |r| r.operating_opex),
    ("OPEX2 MM$", |r| r.makeup_gas_opex),
    ("Total OPEX MM$", |r| r.total_opex),
    ("Escalated OPEX MM$", |r| r.escalated_opex),
    ("Cumulative OPEX", |r| r.cumulative_opex),
    ("Total Cost MM$", |r| r.total_cost),
    ("Escalated Cost MM$", |r| r.escalated_cost),
    ("Cumulative Escalated Cost", |r| r.cumulative_escalated_cost),
    ("Oil Price $/STB", |r| r.oil_price),
    ("Cond Price $/STB", |r| r.condensate_price),
    ("Gas Price $/MMSCF", |r| r.gas_price),
    ("Oil Revenue MM$", |r| r.oil_revenue),
    ("Condensate Revenue MM$", |r| r.condensate_revenue),
    ("Gas Revenue MM$", |r| r.gas_revenue),
    ("Total Revenue MM$", |r| r.total_revenue),
    ("Cumulative Revenue", |r| r.cumulative_revenue),
    ("NCF MM$", |r| r.ncf),
    ("Cumulative NCF", |r| r.cumulative_ncf),
    ("Discount Factor", |r| r.discount_factor),
    ("Discounted NCF", |r| r.discounted_ncf),
    ("Discounted CAPEX", |r| r.discounted_capex),
];

const INDICATOR_COLUMNS: &[&str] = &[
    "NPV (MM$)",
    "Total Revenue (MM$)",
    "Total Cost (MM$)",
    "Cumulative NCF (MM$)",
    "CPI",
    "PIR",
];

/// Renders the CPI the way the summaries print it.
pub fn cpi_cell(cpi: Option<f64>) -> CellValue {
    match cpi {
        Some(value) => CellValue::Number(value),
        None => CellValue::Text("inf".to_string()),
    }
}

fn indicator_cells(indicators: &Indicators) -> Vec<CellValue> {
    vec![
        indicators.npv.into(),
        indicators.total_revenue.into(),
        indicators.total_cost.into(),
        indicators.cumulative_ncf.into(),
        cpi_cell(indicators.cpi),
        indicators.pir.into(),
    ]
}

/// Full ledger sheet followed by a one-row indicators sheet.
pub fn evaluation_workbook(evaluation: &Evaluation) -> WorkbookData {
    let columns: Vec<&str> = LEDGER_COLUMNS.iter().map(|(name, _)| *name).collect();
    let mut ledger = SheetTable::new(LEDGER_SHEET, &columns);
    for record in &evaluation.ledger.rows {
        ledger.push_row(
            LEDGER_COLUMNS
                .iter()
                .map(|(_, extract)| CellValue::Number(extract(record)))
                .collect(),
        );
    }

    let mut indicators = SheetTable::new(INDICATORS_SHEET, INDICATOR_COLUMNS);
    indicators.push_row(indicator_cells(&evaluation.indicators));

    WorkbookData {
        tables: vec![ledger, indicators],
    }
}

/// One sheet per make-up gas scenario with the low/mid/high indicators.
pub fn sensitivity_workbook(results: &[ScenarioResult]) -> WorkbookData {
    let mut columns = vec!["Case"];
    columns.extend_from_slice(INDICATOR_COLUMNS);

    let tables = results
        .iter()
        .map(|result| {
            let mut table = SheetTable::new(result.label(), &columns);
            for (case, evaluation) in result.cases() {
                let mut row = vec![CellValue::from(case)];
                row.extend(indicator_cells(&evaluation.indicators));
                table.push_row(row);
            }
            table
        })
        .collect();

    WorkbookData { tables }
}
