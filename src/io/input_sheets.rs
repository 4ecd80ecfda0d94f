//! Sheet layouts of the three model input workbooks, plus the diagnostic
//! sheets written next to a generated schedule.

use crate::io::excel_read::{
    AVAILABILITY_COLUMN, CONDENSATE_COLUMN, FACILITIES_COLUMN, GAS_COLUMN, HORIZONTAL_WELLS_COLUMN,
    INJECTION_WELLS_COLUMN, OIL_COLUMN, SOURCE_WELLS_COLUMN, VERTICAL_WELLS_COLUMN,
    WORKOVER_PERF_COLUMN, WORKOVER_PUMP_COLUMN, YEAR_COLUMN,
};
use crate::io::{CellValue, SheetTable};
use crate::model::{AvailabilityRow, ProductionRow, ScheduleRow};
use crate::report::prt::{ConnectionEvent, EventKind};
use crate::schedule::workover::{WellYearConnections, YearCount};

pub const SCHEDULE_SHEET: &str = "Final Structured Data";

fn year_cell(year: i32) -> CellValue {
    CellValue::Number(f64::from(year))
}

pub fn production_sheet(rows: &[ProductionRow]) -> SheetTable {
    let mut sheet = SheetTable::new(
        "Production",
        &[YEAR_COLUMN, OIL_COLUMN, CONDENSATE_COLUMN, GAS_COLUMN],
    );
    for row in rows {
        sheet.push_row(vec![
            year_cell(row.year),
            row.oil.into(),
            row.condensate.into(),
            row.gas.into(),
        ]);
    }
    sheet
}

/// Schedule sheet; the facilities fraction is written back as a percentage.
pub fn schedule_sheet(rows: &[ScheduleRow]) -> SheetTable {
    let mut sheet = SheetTable::new(
        SCHEDULE_SHEET,
        &[
            YEAR_COLUMN,
            VERTICAL_WELLS_COLUMN,
            HORIZONTAL_WELLS_COLUMN,
            INJECTION_WELLS_COLUMN,
            SOURCE_WELLS_COLUMN,
            WORKOVER_PERF_COLUMN,
            WORKOVER_PUMP_COLUMN,
            FACILITIES_COLUMN,
        ],
    );
    for row in rows {
        sheet.push_row(vec![
            year_cell(row.year),
            row.vertical_wells.into(),
            row.horizontal_wells.into(),
            row.injection_wells.into(),
            row.source_wells.into(),
            row.workover_perf_shutoff.into(),
            row.workover_pump_replacement.into(),
            (row.facilities_fraction * 100.0).into(),
        ]);
    }
    sheet
}

pub fn availability_sheet(rows: &[AvailabilityRow]) -> SheetTable {
    let mut sheet = SheetTable::new("Availability", &[YEAR_COLUMN, AVAILABILITY_COLUMN]);
    for row in rows {
        sheet.push_row(vec![year_cell(row.year), row.availability.into()]);
    }
    sheet
}

pub fn closing_events_sheet(events: &[ConnectionEvent]) -> SheetTable {
    let mut sheet = SheetTable::new(
        "Raw Closing Connections",
        &["Days", "Date", "Well", "Variable", "Value", "Limit"],
    );
    for event in events {
        if let EventKind::Closing {
            variable,
            value,
            limit,
            ..
        } = &event.kind
        {
            sheet.push_row(vec![
                event.days.into(),
                event.date.as_str().into(),
                event.well.as_str().into(),
                variable.as_str().into(),
                (*value).into(),
                (*limit).into(),
            ]);
        }
    }
    sheet
}

pub fn opening_events_sheet(events: &[ConnectionEvent]) -> SheetTable {
    let mut sheet = SheetTable::new(
        "Raw Opening Connections",
        &["Days", "Date", "Well", "Connection_ID"],
    );
    for event in events {
        if let EventKind::Opening { connection } = event.kind {
            sheet.push_row(vec![
                event.days.into(),
                event.date.as_str().into(),
                event.well.as_str().into(),
                f64::from(connection).into(),
            ]);
        }
    }
    sheet
}

pub fn connections_sheet(connections: &[WellYearConnections]) -> SheetTable {
    let mut sheet = SheetTable::new(
        "Connections per Well per Year",
        &["Year", "Well", "Closed_Connections", "Opened_Connections"],
    );
    for entry in connections {
        sheet.push_row(vec![
            year_cell(entry.year),
            entry.well.as_str().into(),
            f64::from(entry.closed).into(),
            f64::from(entry.opened).into(),
        ]);
    }
    sheet
}

pub fn workover_counts_sheet(name: &str, counts: &[YearCount]) -> SheetTable {
    let mut sheet = SheetTable::new(name, &[YEAR_COLUMN, WORKOVER_PERF_COLUMN]);
    for entry in counts {
        sheet.push_row(vec![year_cell(entry.year), f64::from(entry.count).into()]);
    }
    sheet
}
