use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::Result;
use crate::io::{CellValue, WorkbookData};

/// Writes the provided workbook data to the given path. The header row of
/// every sheet is bold and frozen.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Number(value) if value.is_finite() => {
                        worksheet.write_number(excel_row, col_idx as u16, *value)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_string(excel_row, col_idx as u16, value.to_string())?;
                    }
                    CellValue::Text(value) => {
                        worksheet.write_string(excel_row, col_idx as u16, value)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        debug!(sheet = %table.sheet_name, rows = table.rows.len(), "sheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}
