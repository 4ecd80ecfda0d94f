//! Cumulative production summaries.
//!
//! A summary file lists one or more runs. Each run starts with a
//! `SUMMARY OF RUN: <name> :` line and continues with dated rows whose last two
//! columns are cumulative gas and cumulative oil.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ProductionRow, Year};
use crate::schedule::YearSpan;

static RUN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SUMMARY OF RUN:\s+(.+?)\s+:").expect("run header pattern"));
static DATED_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\w{3}-\d{4}").expect("dated row pattern"));

const RUN_MARKER: &str = "SUMMARY OF RUN:";

/// One dated row of cumulative totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSample {
    pub date: String,
    pub year: Year,
    pub gas_total: f64,
    pub oil_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run name with spaces replaced by underscores.
    pub name: String,
    pub samples: Vec<CumulativeSample>,
}

/// Splits a summary report into runs. Rows before the first run header and
/// runs without any rows are dropped.
pub fn parse_summaries(text: &str) -> Vec<RunSummary> {
    let mut runs = Vec::new();
    let mut current: Option<RunSummary> = None;

    for line in text.lines().map(str::trim) {
        if line.starts_with(RUN_MARKER) {
            if let Some(captures) = RUN_HEADER.captures(line) {
                if let Some(run) = current.take().filter(|run| !run.samples.is_empty()) {
                    runs.push(run);
                }
                current = Some(RunSummary {
                    name: captures[1].replace(' ', "_"),
                    samples: Vec::new(),
                });
            }
        } else if DATED_ROW.is_match(line) {
            if let (Some(run), Some(sample)) = (current.as_mut(), parse_sample(line)) {
                run.samples.push(sample);
            }
        }
    }

    if let Some(run) = current.filter(|run| !run.samples.is_empty()) {
        runs.push(run);
    }
    debug!(runs = runs.len(), "production summaries parsed");
    runs
}

fn parse_sample(line: &str) -> Option<CumulativeSample> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let date = parts[0];
    let year = date.get(date.len().checked_sub(4)?..)?.parse().ok()?;
    Some(CumulativeSample {
        date: date.to_string(),
        year,
        gas_total: parts[parts.len() - 2].parse().ok()?,
        oil_total: parts[parts.len() - 1].parse().ok()?,
    })
}

/// How cumulative totals become yearly deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionPrep {
    /// Runs whose name contains this marker (any case) report gas.
    pub gas_run_marker: String,
    /// Years whose gas is reported as zero even for gas runs.
    pub gas_deferral: Option<YearSpan>,
}

impl Default for ProductionPrep {
    fn default() -> Self {
        Self {
            gas_run_marker: "BDPRODUCERS".to_string(),
            gas_deferral: Some(YearSpan::new(2024, 2028)),
        }
    }
}

impl ProductionPrep {
    pub fn reports_gas(&self, run: &str) -> bool {
        run.to_uppercase()
            .contains(&self.gas_run_marker.to_uppercase())
    }
}

/// Differences consecutive samples. Each delta is attributed to the year
/// before the sample that closes it; the first sample only anchors the series.
pub fn yearly_changes(run: &RunSummary, prep: &ProductionPrep) -> Vec<ProductionRow> {
    let with_gas = prep.reports_gas(&run.name);

    run.samples
        .windows(2)
        .map(|pair| {
            let (previous, sample) = (&pair[0], &pair[1]);
            let year = sample.year - 1;
            let deferred = prep.gas_deferral.is_some_and(|span| span.contains(year));
            let gas = if with_gas && !deferred {
                sample.gas_total - previous.gas_total
            } else {
                0.0
            };
            ProductionRow {
                year,
                oil: sample.oil_total - previous.oil_total,
                condensate: 0.0,
                gas,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
01-JAN-2023  ignored  1.0  2.0
SUMMARY OF RUN: BASE CASE :
DATE        TIME   GPT     OPT
01-JAN-2024  0.0   100.0   1000.0
01-JAN-2025  365.0 150.0   1800.0
01-JAN-2026  730.0 bad     2300.0
01-JAN-2030  2190.0 400.0  3000.0
SUMMARY OF RUN: EMPTY RUN :
SUMMARY OF RUN: bdproducers 2029 :
01-JAN-2028  0.0   0.0     0.0
01-JAN-2029  365.0 500.0   10.0
01-JAN-2030  730.0 1500.0  20.0
";

    #[test]
    fn runs_are_split_and_malformed_rows_skipped() {
        let runs = parse_summaries(REPORT);
        let names: Vec<&str> = runs.iter().map(|run| run.name.as_str()).collect();
        assert_eq!(names, vec!["BASE_CASE", "bdproducers_2029"]);
        assert_eq!(runs[0].samples.len(), 3);
        assert_eq!(runs[0].samples[2].year, 2030);
        assert_eq!(runs[0].samples[2].oil_total, 3000.0);
    }

    #[test]
    fn deltas_shift_back_one_year() {
        let runs = parse_summaries(REPORT);
        let prep = ProductionPrep::default();

        let base = yearly_changes(&runs[0], &prep);
        assert_eq!(base.len(), 2);
        assert_eq!(base[0].year, 2024);
        assert_eq!(base[0].oil, 800.0);
        assert_eq!(base[0].gas, 0.0);

        let gas_run = yearly_changes(&runs[1], &prep);
        assert_eq!(gas_run[0].year, 2028);
        assert_eq!(gas_run[0].gas, 0.0);
        assert_eq!(gas_run[1].year, 2029);
        assert_eq!(gas_run[1].gas, 1000.0);
        assert_eq!(gas_run[1].oil, 10.0);
    }
}
