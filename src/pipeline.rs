use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::config::ExtractionConfig;
use crate::economics::sensitivity::{ScenarioResult, SensitivityBands, run_sweep};
use crate::economics::{Evaluation, ModelInputs, compute};
use crate::error::{EconError, Result};
use crate::io::excel_read;
use crate::io::excel_write::write_workbook;
use crate::io::input_sheets;
use crate::io::ledger_sheet::{evaluation_workbook, sensitivity_workbook};
use crate::io::run_files;
use crate::io::summary::{self, CombinedSummaries};
use crate::io::WorkbookData;
use crate::model::{Assumptions, YearInputs};
use crate::report::{production, prt};
use crate::schedule::workover;

pub const COMBINED_WORKBOOK: &str = "combined_results.xlsx";
pub const COMBINED_NO_MAKEUP_TEXT: &str = "combined_no_makeup.txt";
pub const COMBINED_WITH_MAKEUP_TEXT: &str = "combined_with_makeup.txt";

/// Locations of the three workbooks of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub production: PathBuf,
    pub schedule: PathBuf,
    pub availability: PathBuf,
}

impl InputPaths {
    /// Conventional file names of `run` inside `dir`.
    pub fn for_run(dir: &Path, run: &str) -> Self {
        let [production, schedule, availability] = run_files::expected_files(run);
        Self {
            production: dir.join(production),
            schedule: dir.join(schedule),
            availability: dir.join(availability),
        }
    }

    fn ensure_exist(&self) -> Result<()> {
        for path in [&self.production, &self.schedule, &self.availability] {
            if !path.exists() {
                return Err(EconError::MissingInput(path.clone()));
            }
        }
        Ok(())
    }
}

/// Reads the three input workbooks and joins them into the yearly skeleton.
#[instrument(level = "info", skip_all, fields(production = %paths.production.display()))]
pub fn load_skeleton(paths: &InputPaths, assumptions: &Assumptions) -> Result<Vec<YearInputs>> {
    paths.ensure_exist()?;

    // Availability first so a missing column fails before any other parsing.
    let availability = excel_read::read_availability(&paths.availability)?;
    let inputs = ModelInputs::default()
        .with_availability(availability)
        .with_schedule(excel_read::read_schedule(&paths.schedule)?)
        .with_production(excel_read::read_production(&paths.production)?);

    let skeleton = inputs.prepare(assumptions)?;
    if skeleton.is_empty() {
        warn!("no year is shared by the schedule and production tables");
    }
    info!(years = skeleton.len(), "input skeleton prepared");
    Ok(skeleton)
}

/// Evaluates one run and writes the ledger workbook and optional JSON.
#[instrument(level = "info", skip_all)]
pub fn evaluate(
    paths: &InputPaths,
    assumptions: &Assumptions,
    workbook: Option<&Path>,
    json: Option<&Path>,
) -> Result<Evaluation> {
    let skeleton = load_skeleton(paths, assumptions)?;
    let evaluation = compute(&skeleton, assumptions);
    info!(
        npv = evaluation.indicators.npv,
        cpi = ?evaluation.indicators.cpi,
        pir = evaluation.indicators.pir,
        "evaluation complete"
    );

    if let Some(path) = workbook {
        write_workbook(path, &evaluation_workbook(&evaluation))?;
        debug!(path = %path.display(), "ledger workbook written");
    }
    if let Some(path) = json {
        fs::write(path, serde_json::to_string_pretty(&evaluation)?)?;
        debug!(path = %path.display(), "ledger JSON written");
    }
    Ok(evaluation)
}

/// Runs the sensitivity sweep and writes `<run>_sensitivity_results.txt` and
/// `<run>_sensitivity_results.xlsx` into `output_dir`.
#[instrument(level = "info", skip_all, fields(run = run_name))]
pub fn sensitivity(
    paths: &InputPaths,
    assumptions: &Assumptions,
    bands: &SensitivityBands,
    run_name: &str,
    output_dir: &Path,
) -> Result<Vec<ScenarioResult>> {
    bands.validate(assumptions)?;
    let skeleton = load_skeleton(paths, assumptions)?;
    let results = run_sweep(&skeleton, assumptions, bands);

    fs::create_dir_all(output_dir)?;
    let text_path = output_dir.join(format!("{run_name}_sensitivity_results.txt"));
    fs::write(&text_path, summary::format_summary(run_name, &results))?;
    let workbook_path = output_dir.join(format!("{run_name}_sensitivity_results.xlsx"));
    write_workbook(&workbook_path, &sensitivity_workbook(&results))?;
    info!(summary = %text_path.display(), "sensitivity results written");
    Ok(results)
}

/// Concatenates every summary in `folder` and writes the combined workbook and
/// fixed-width tables next to them.
#[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
pub fn combine(folder: &Path) -> Result<CombinedSummaries> {
    let combined = summary::combine_folder(
        folder,
        &[COMBINED_NO_MAKEUP_TEXT, COMBINED_WITH_MAKEUP_TEXT],
    )?;
    info!(files = combined.sources.len(), "summaries combined");

    write_workbook(&folder.join(COMBINED_WORKBOOK), &combined.workbook())?;
    fs::write(
        folder.join(COMBINED_NO_MAKEUP_TEXT),
        combined.no_makeup.to_fixed_width(),
    )?;
    fs::write(
        folder.join(COMBINED_WITH_MAKEUP_TEXT),
        combined.with_makeup.to_fixed_width(),
    )?;
    Ok(combined)
}

/// Writes `<run>.xlsx` yearly production for every run of a summary report.
#[instrument(level = "info", skip_all, fields(report = %report.display()))]
pub fn prepare_production(
    report: &Path,
    output_dir: &Path,
    prep: &production::ProductionPrep,
) -> Result<Vec<PathBuf>> {
    if !report.exists() {
        return Err(EconError::MissingInput(report.to_path_buf()));
    }
    let text = fs::read_to_string(report)?;
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for run in production::parse_summaries(&text) {
        let rows = production::yearly_changes(&run, prep);
        let path = output_dir.join(run_files::production_file_name(&run.name));
        let workbook = WorkbookData {
            tables: vec![input_sheets::production_sheet(&rows)],
        };
        write_workbook(&path, &workbook)?;
        info!(run = %run.name, years = rows.len(), "production written");
        written.push(path);
    }
    Ok(written)
}

/// Generates `<run>_Drilling_Workover_Schedule.xlsx` next to every PRT file
/// under `root`. A file that fails is logged and skipped.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn extract_schedules(root: &Path, config: &ExtractionConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for path in find_prt_files(root, true)? {
        match extract_schedule(&path, config) {
            Ok(Some(output)) => written.push(output),
            Ok(None) => info!(file = %path.display(), "no connection messages, skipping"),
            Err(err) => error!(file = %path.display(), error = %err, "schedule extraction failed"),
        }
    }
    Ok(written)
}

fn extract_schedule(path: &Path, config: &ExtractionConfig) -> Result<Option<PathBuf>> {
    let run = run_name(path);
    let text = fs::read_to_string(path)?;
    let events = prt::tokenize(&text);
    if events.is_empty() {
        return Ok(None);
    }

    let connections = workover::connections_per_well(&events);
    let raw_counts = workover::workovers_per_year(&connections, &config.workover);
    let capped = workover::enforce_cap(&raw_counts, config.workover.max_per_year);
    let schedule = config.schedule.generate(&run, &capped.years);

    let workbook = WorkbookData {
        tables: vec![
            input_sheets::schedule_sheet(&schedule),
            input_sheets::closing_events_sheet(&events),
            input_sheets::opening_events_sheet(&events),
            input_sheets::connections_sheet(&connections),
            input_sheets::workover_counts_sheet("Raw Workovers per Year", &raw_counts),
            input_sheets::workover_counts_sheet("Final Workovers per Year", &capped.years),
        ],
    };
    let output = sibling(path, &run_files::schedule_file_name(&run));
    write_workbook(&output, &workbook)?;
    info!(
        run = %run,
        events = events.len(),
        leftover_workovers = capped.leftover,
        "schedule written"
    );
    Ok(Some(output))
}

/// Generates `<run>_makeup_gas_availability.xlsx` for every PRT file directly
/// inside `dir`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub fn generate_availability(dir: &Path, config: &ExtractionConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for path in find_prt_files(dir, false)? {
        let run = run_name(&path);
        let rows = config.availability.profile(&run);
        let output = sibling(&path, &run_files::availability_file_name(&run));
        let workbook = WorkbookData {
            tables: vec![input_sheets::availability_sheet(&rows)],
        };
        match write_workbook(&output, &workbook) {
            Ok(()) => {
                info!(run = %run, "availability written");
                written.push(output);
            }
            Err(err) => error!(run = %run, error = %err, "availability generation failed"),
        }
    }
    Ok(written)
}

fn run_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    path.with_file_name(file_name)
}

/// PRT files (any extension case) under `dir`, sorted by path.
fn find_prt_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EconError::MissingInput(dir.to_path_buf()));
    }

    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            // Symlinked directories are not followed.
            if entry.file_type()?.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("prt"))
            {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
