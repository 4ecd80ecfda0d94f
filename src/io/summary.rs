//! Tab-delimited sensitivity summaries and their fixed-width combination.
//!
//! A summary file holds one block per make-up gas scenario:
//!
//! ```text
//! --- NO MAKEUP GAS COST ---
//! Run	Units	Low	Mid	High
//! CASE_A	MMUSD	-12.50	40.10	92.75
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::economics::sensitivity::{NO_MAKEUP_GAS_LABEL, ScenarioResult, WITH_MAKEUP_GAS_LABEL};
use crate::error::{EconError, Result};
use crate::io::{CellValue, SheetTable, WorkbookData};

pub const SUMMARY_COLUMNS: [&str; 5] = ["Run", "Units", "Low", "Mid", "High"];
pub const NPV_UNITS: &str = "MMUSD";

/// Header line wrapping a scenario label.
pub fn block_marker(label: &str) -> String {
    format!("--- {} ---", label.to_uppercase())
}

/// Formats the NPV summary text for a sweep.
pub fn format_summary(run_name: &str, results: &[ScenarioResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "\n{}\n{}\n{}\t{}\t{:.2}\t{:.2}\t{:.2}\n",
                block_marker(result.label()),
                SUMMARY_COLUMNS.join("\t"),
                run_name,
                NPV_UNITS,
                result.low.indicators.npv,
                result.mid.indicators.npv,
                result.high.indicators.npv,
            )
        })
        .collect()
}

/// Whitespace-delimited table parsed from a summary block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SummaryTable {
    fn parse(block: &str, path: &Path) -> Result<Option<Self>> {
        let mut lines = block.lines().map(str::trim).filter(|line| !line.is_empty());
        let Some(header) = lines.next() else {
            return Ok(None);
        };
        let columns: Vec<String> = header.split_whitespace().map(str::to_string).collect();

        let mut rows = Vec::new();
        for line in lines {
            let cells: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if cells.len() != columns.len() {
                return Err(EconError::MalformedSummary {
                    path: path.to_path_buf(),
                    reason: format!(
                        "row '{line}' has {} fields, header has {}",
                        cells.len(),
                        columns.len()
                    ),
                });
            }
            rows.push(cells);
        }
        Ok(Some(Self { columns, rows }))
    }

    /// True when `other` can be appended: either side is still empty or the
    /// headers are identical.
    fn accepts(&self, other: &SummaryTable) -> bool {
        self.columns.is_empty() || other.columns.is_empty() || self.columns == other.columns
    }

    fn extend(&mut self, other: SummaryTable) {
        if self.columns.is_empty() {
            self.columns = other.columns;
        }
        self.rows.extend(other.rows);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table with every column left aligned to its widest entry
    /// and separated by two spaces.
    pub fn to_fixed_width(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut lines = vec![render(self.columns.as_slice())];
        lines.extend(self.rows.iter().map(|row| render(row.as_slice())));
        lines.join("\n")
    }

    /// Worksheet form; numeric-looking cells are written as numbers.
    pub fn to_sheet(&self, sheet_name: &str) -> SheetTable {
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let mut sheet = SheetTable::new(sheet_name, &columns);
        for row in &self.rows {
            sheet.push_row(
                row.iter()
                    .map(|cell| match cell.parse::<f64>() {
                        Ok(value) => CellValue::Number(value),
                        Err(_) => CellValue::Text(cell.clone()),
                    })
                    .collect(),
            );
        }
        sheet
    }
}

/// Both scenario tables of one summary file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSummary {
    pub no_makeup: Option<SummaryTable>,
    pub with_makeup: Option<SummaryTable>,
}

/// Splits a summary on the with-cost marker and parses both halves.
pub fn parse_summary(content: &str, path: &Path) -> Result<ParsedSummary> {
    let with_marker = block_marker(WITH_MAKEUP_GAS_LABEL);
    let no_marker = block_marker(NO_MAKEUP_GAS_LABEL);

    let (first, second) = match content.split_once(&with_marker) {
        Some((first, second)) => (first, Some(second)),
        None => (content, None),
    };
    let first = first.replace(&no_marker, "");

    Ok(ParsedSummary {
        no_makeup: SummaryTable::parse(&first, path)?,
        with_makeup: match second {
            Some(block) => SummaryTable::parse(block, path)?,
            None => None,
        },
    })
}

/// Tables concatenated across every summary in a folder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedSummaries {
    pub no_makeup: SummaryTable,
    pub with_makeup: SummaryTable,
    pub sources: Vec<PathBuf>,
}

impl CombinedSummaries {
    /// Appends both tables of one file, or neither when a header disagrees
    /// with the tables combined so far.
    fn absorb(&mut self, parsed: ParsedSummary, path: &Path) -> Result<()> {
        let pairs = [
            (&self.no_makeup, parsed.no_makeup.as_ref()),
            (&self.with_makeup, parsed.with_makeup.as_ref()),
        ];
        for (combined, table) in pairs {
            if let Some(table) = table.filter(|table| !combined.accepts(table)) {
                return Err(EconError::MalformedSummary {
                    path: path.to_path_buf(),
                    reason: format!(
                        "columns {:?} differ from {:?}",
                        table.columns, combined.columns
                    ),
                });
            }
        }

        if let Some(table) = parsed.no_makeup {
            self.no_makeup.extend(table);
        }
        if let Some(table) = parsed.with_makeup {
            self.with_makeup.extend(table);
        }
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    pub fn workbook(&self) -> WorkbookData {
        WorkbookData {
            tables: vec![
                self.no_makeup.to_sheet(&NO_MAKEUP_GAS_LABEL.to_uppercase()),
                self.with_makeup.to_sheet(&WITH_MAKEUP_GAS_LABEL.to_uppercase()),
            ],
        }
    }
}

/// Reads every `.txt` summary in `folder`, in file-name order. Files that fail
/// to parse or whose headers differ from earlier files are logged and skipped.
pub fn combine_folder(folder: &Path, skip: &[&str]) -> Result<CombinedSummaries> {
    if !folder.is_dir() {
        return Err(EconError::MissingInput(folder.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_none_or(|name| !skip.contains(&name))
        })
        .collect();
    paths.sort();

    let mut combined = CombinedSummaries::default();
    for path in paths {
        let content = fs::read_to_string(&path)?;
        match parse_summary(&content, &path).and_then(|parsed| combined.absorb(parsed, &path)) {
            Ok(()) => debug!(path = %path.display(), "summary combined"),
            Err(error) => warn!(path = %path.display(), %error, "skipping summary"),
        }
    }
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\n--- NO MAKEUP GAS COST ---\nRun\tUnits\tLow\tMid\tHigh\nCASE_A\tMMUSD\t-1.50\t10.25\t22.00\n\n--- WITH MAKEUP GAS COST ---\nRun\tUnits\tLow\tMid\tHigh\nCASE_A\tMMUSD\t-60.00\t-40.10\t-20.75\n";

    #[test]
    fn parses_both_scenario_blocks() {
        let parsed = parse_summary(SAMPLE, Path::new("a.txt")).expect("summary parsed");
        let no_makeup = parsed.no_makeup.expect("no-cost table");
        let with_makeup = parsed.with_makeup.expect("with-cost table");

        assert_eq!(no_makeup.columns, SUMMARY_COLUMNS.to_vec());
        assert_eq!(no_makeup.rows[0][3], "10.25");
        assert_eq!(with_makeup.rows[0][2], "-60.00");
    }

    #[test]
    fn file_without_with_cost_block_yields_one_table() {
        let content = "--- NO MAKEUP GAS COST ---\nRun Units Low Mid High\nX MMUSD 1 2 3\n";
        let parsed = parse_summary(content, Path::new("b.txt")).expect("summary parsed");
        assert!(parsed.no_makeup.is_some());
        assert!(parsed.with_makeup.is_none());
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let content = "Run Units Low Mid High\nX MMUSD 1 2\n";
        let error = parse_summary(content, Path::new("c.txt")).unwrap_err();
        assert!(matches!(error, EconError::MalformedSummary { .. }));
    }

    #[test]
    fn files_with_different_headers_are_skipped() {
        let dir = tempfile::tempdir().expect("temporary directory");
        fs::write(dir.path().join("a.txt"), SAMPLE).expect("summary written");
        fs::write(
            dir.path().join("b.txt"),
            "--- NO MAKEUP GAS COST ---\nRun Units Low Mid High Extra\nB MMUSD 1 2 3 4\n",
        )
        .expect("summary written");

        let combined = combine_folder(dir.path(), &[]).expect("folder combined");
        assert_eq!(combined.sources, vec![dir.path().join("a.txt")]);
        assert_eq!(combined.no_makeup.rows.len(), 1);
        assert_eq!(combined.with_makeup.rows.len(), 1);

        let rendered = combined.no_makeup.to_fixed_width();
        let widths: Vec<usize> = rendered.lines().map(str::len).collect();
        assert!(widths.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn fixed_width_pads_to_widest_entry() {
        let table = SummaryTable {
            columns: vec!["Run".into(), "Low".into()],
            rows: vec![
                vec!["LONG_RUN_NAME".into(), "1.00".into()],
                vec!["B".into(), "-100.25".into()],
            ],
        };
        let rendered = table.to_fixed_width();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Run            Low    ");
        assert_eq!(lines[1], "LONG_RUN_NAME  1.00   ");
        assert_eq!(lines[2], "B              -100.25");
    }
}
