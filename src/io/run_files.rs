//! Per-run workbook naming and grouping of complete runs into folders.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{EconError, Result};

pub const AVAILABILITY_SUFFIX: &str = "_makeup_gas_availability";
pub const SCHEDULE_SUFFIX: &str = "_Drilling_Workover_Schedule";

static RUN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(.*?)(?:{AVAILABILITY_SUFFIX}|{SCHEDULE_SUFFIX}|_summary)?\.xlsx$"
    ))
    .expect("run name pattern")
});

pub fn production_file_name(run: &str) -> String {
    format!("{run}.xlsx")
}

pub fn availability_file_name(run: &str) -> String {
    format!("{run}{AVAILABILITY_SUFFIX}.xlsx")
}

pub fn schedule_file_name(run: &str) -> String {
    format!("{run}{SCHEDULE_SUFFIX}.xlsx")
}

/// The three workbooks a run needs, in production, schedule, availability order.
pub fn expected_files(run: &str) -> [String; 3] {
    [
        production_file_name(run),
        schedule_file_name(run),
        availability_file_name(run),
    ]
}

/// Outcome of grouping a folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizeReport {
    pub grouped: Vec<String>,
    pub incomplete: Vec<String>,
}

/// Copies the three workbooks of every complete run into `<dir>/<run>/`.
pub fn organize_runs(dir: &Path) -> Result<OrganizeReport> {
    if !dir.is_dir() {
        return Err(EconError::MissingInput(dir.to_path_buf()));
    }

    let workbooks: BTreeSet<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".xlsx"))
        .collect();

    let mut report = OrganizeReport::default();
    for run in run_names(&workbooks) {
        let files = expected_files(&run);
        if !files.iter().all(|file| workbooks.contains(file)) {
            warn!(run = %run, "missing files for run, skipping");
            report.incomplete.push(run);
            continue;
        }

        let run_dir = dir.join(&run);
        fs::create_dir_all(&run_dir)?;
        for file in &files {
            fs::copy(dir.join(file), run_dir.join(file))?;
        }
        info!(run = %run, folder = %run_dir.display(), "copied run files");
        report.grouped.push(run);
    }
    Ok(report)
}

/// Run names implied by a set of workbook file names.
pub fn run_names(workbooks: &BTreeSet<String>) -> BTreeSet<String> {
    workbooks
        .iter()
        .filter_map(|name| RUN_NAME.captures(name))
        .filter_map(|captures| captures.get(1).map(|run| run.as_str().to_string()))
        .filter(|run| !run.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_collapse_to_run_names() {
        let workbooks: BTreeSet<String> = [
            "CASE_A.xlsx",
            "CASE_A_makeup_gas_availability.xlsx",
            "CASE_A_Drilling_Workover_Schedule.xlsx",
            "CASE_B_summary.xlsx",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let runs: Vec<String> = run_names(&workbooks).into_iter().collect();
        assert_eq!(runs, vec!["CASE_A".to_string(), "CASE_B".to_string()]);
    }
}
