use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::{debug, warn};

use crate::error::{EconError, Result};
use crate::io::CellValue;
use crate::model::{AvailabilityRow, ProductionRow, ScheduleRow, Year};

pub const YEAR_COLUMN: &str = "Year";
pub const OIL_COLUMN: &str = "Oil";
pub const CONDENSATE_COLUMN: &str = "Condensate";
pub const GAS_COLUMN: &str = "Gas";
pub const VERTICAL_WELLS_COLUMN: &str = "Drilling of Vertical Wells";
pub const HORIZONTAL_WELLS_COLUMN: &str = "Drilling of Horizontal Wells";
pub const INJECTION_WELLS_COLUMN: &str = "Drilling of Water Injection Wells";
pub const SOURCE_WELLS_COLUMN: &str = "Drilling of Water Source Wells";
pub const WORKOVER_PERF_COLUMN: &str = "Workover (Perf or Shut-off)";
pub const WORKOVER_PUMP_COLUMN: &str = "Workover (Pump Replacement)";
pub const FACILITIES_COLUMN: &str = "Facilities Payment Schedule (%)";
pub const AVAILABILITY_COLUMN: &str = "Availability";

/// Header row and body of the first worksheet of a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Reads the first worksheet of an `.xlsx` file. Header cells are trimmed.
pub fn read_first_sheet(path: &Path) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EconError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let body: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(to_cell_value).collect())
        .filter(|row: &Vec<CellValue>| row.iter().any(|cell| *cell != CellValue::Empty))
        .collect();

    debug!(path = %path.display(), columns = headers.len(), rows = body.len(), "worksheet read");
    Ok(RawTable {
        headers,
        rows: body,
    })
}

/// Reads the yearly production workbook.
pub fn read_production(path: &Path) -> Result<Vec<ProductionRow>> {
    let table = read_first_sheet(path)?;
    production_from_table(&table)
}

/// Reads the drilling, workover and facilities schedule workbook.
pub fn read_schedule(path: &Path) -> Result<Vec<ScheduleRow>> {
    let table = read_first_sheet(path)?;
    schedule_from_table(&table)
}

/// Reads the make-up gas availability workbook.
pub fn read_availability(path: &Path) -> Result<Vec<AvailabilityRow>> {
    let table = read_first_sheet(path)?;
    availability_from_table(&table)
}

pub fn production_from_table(table: &RawTable) -> Result<Vec<ProductionRow>> {
    let schema = TableSchema::exact("production", table);
    let year = schema.required(YEAR_COLUMN)?;
    let oil = schema.optional(OIL_COLUMN);
    let condensate = schema.optional(CONDENSATE_COLUMN);
    let gas = schema.optional(GAS_COLUMN);

    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(ProductionRow {
                year: year.year(row, index)?,
                oil: oil.number(row, index)?,
                condensate: condensate.number(row, index)?,
                gas: gas.number(row, index)?,
            })
        })
        .collect()
}

pub fn schedule_from_table(table: &RawTable) -> Result<Vec<ScheduleRow>> {
    let schema = TableSchema::exact("schedule", table);
    let year = schema.required(YEAR_COLUMN)?;
    let vertical = schema.optional(VERTICAL_WELLS_COLUMN);
    let horizontal = schema.optional(HORIZONTAL_WELLS_COLUMN);
    let injection = schema.optional_quiet(INJECTION_WELLS_COLUMN);
    let source = schema.optional_quiet(SOURCE_WELLS_COLUMN);
    let perf = schema.optional(WORKOVER_PERF_COLUMN);
    let pump = schema.optional(WORKOVER_PUMP_COLUMN);
    let facilities = schema.optional(FACILITIES_COLUMN);

    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(ScheduleRow {
                year: year.year(row, index)?,
                vertical_wells: vertical.number(row, index)?,
                horizontal_wells: horizontal.number(row, index)?,
                injection_wells: injection.number(row, index)?,
                source_wells: source.number(row, index)?,
                workover_perf_shutoff: perf.number(row, index)?,
                workover_pump_replacement: pump.number(row, index)?,
                facilities_fraction: facilities.number(row, index)? / 100.0,
            })
        })
        .collect()
}

/// Availability headers are matched case-insensitively and the Availability
/// column is mandatory.
pub fn availability_from_table(table: &RawTable) -> Result<Vec<AvailabilityRow>> {
    let schema = TableSchema::case_insensitive("availability", table);
    let year = schema.required(YEAR_COLUMN)?;
    let availability = schema.required(AVAILABILITY_COLUMN)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            Ok(AvailabilityRow {
                year: year.year(row, index)?,
                availability: availability.number(row, index)?,
            })
        })
        .collect()
}

struct TableSchema<'a> {
    table: &'static str,
    headers: Vec<String>,
    raw_headers: &'a [String],
    case_insensitive: bool,
}

impl<'a> TableSchema<'a> {
    fn exact(table: &'static str, raw: &'a RawTable) -> Self {
        Self {
            table,
            headers: raw.headers.clone(),
            raw_headers: &raw.headers,
            case_insensitive: false,
        }
    }

    fn case_insensitive(table: &'static str, raw: &'a RawTable) -> Self {
        Self {
            table,
            headers: raw.headers.iter().map(|h| h.to_lowercase()).collect(),
            raw_headers: &raw.headers,
            case_insensitive: true,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        if self.case_insensitive {
            let wanted = name.to_lowercase();
            self.headers.iter().position(|header| *header == wanted)
        } else {
            self.headers.iter().position(|header| header == name)
        }
    }

    fn required(&self, name: &'static str) -> Result<Column> {
        let index = self.position(name).ok_or_else(|| EconError::MissingColumn {
            table: self.table,
            column: name.to_string(),
        })?;
        Ok(Column {
            name,
            index: Some(index),
        })
    }

    fn optional(&self, name: &'static str) -> Column {
        let column = self.optional_quiet(name);
        if column.index.is_none() {
            warn!(
                table = self.table,
                column = name,
                headers = ?self.raw_headers,
                "column absent, treating values as zero"
            );
        }
        column
    }

    fn optional_quiet(&self, name: &'static str) -> Column {
        Column {
            name,
            index: self.position(name),
        }
    }
}

struct Column {
    name: &'static str,
    index: Option<usize>,
}

impl Column {
    fn cell<'r>(&self, row: &'r [CellValue]) -> Option<&'r CellValue> {
        self.index.and_then(|index| row.get(index))
    }

    fn number(&self, row: &[CellValue], index: usize) -> Result<f64> {
        match self.cell(row) {
            None | Some(CellValue::Empty) => Ok(0.0),
            Some(CellValue::Number(value)) => Ok(*value),
            Some(CellValue::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed.parse::<f64>().map_err(|_| self.invalid(index, text))
            }
        }
    }

    fn year(&self, row: &[CellValue], index: usize) -> Result<Year> {
        let value = match self.cell(row) {
            Some(CellValue::Number(value)) => *value,
            Some(CellValue::Text(text)) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(index, text))?,
            None | Some(CellValue::Empty) => return Err(self.invalid(index, "")),
        };
        if value.fract() != 0.0 || value.abs() > f64::from(i32::MAX) {
            return Err(self.invalid(index, &value.to_string()));
        }
        Ok(value as Year)
    }

    fn invalid(&self, index: usize, value: &str) -> EconError {
        EconError::InvalidCell {
            column: self.name.to_string(),
            // Header is row 1 in the sheet.
            row: index + 2,
            value: value.to_string(),
        }
    }
}

fn to_cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Number(if *value { 1.0 } else { 0.0 }),
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
