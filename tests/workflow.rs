use std::fs;
use std::path::Path;

use field_econ::EconError;
use field_econ::config::AppConfig;
use field_econ::economics::sensitivity::{NO_MAKEUP_GAS_LABEL, SensitivityBands};
use field_econ::io::excel_read;
use field_econ::io::excel_write::write_workbook;
use field_econ::io::run_files;
use field_econ::io::{SheetTable, WorkbookData, input_sheets};
use field_econ::model::{Assumptions, AvailabilityRow, ProductionRow, ScheduleRow};
use field_econ::pipeline::{self, InputPaths};
use tempfile::tempdir;

const EPSILON: f64 = 1e-9;

fn write_run(dir: &Path, run: &str, availability: f64) -> InputPaths {
    let paths = InputPaths::for_run(dir, run);
    let production = [ProductionRow {
        year: 2023,
        oil: 1_000_000.0,
        condensate: 0.0,
        gas: 0.0,
    }];
    let schedule = [ScheduleRow {
        year: 2023,
        vertical_wells: 1.0,
        ..ScheduleRow::default()
    }];
    let availability = [AvailabilityRow {
        year: 2023,
        availability,
    }];

    write_workbook(
        &paths.production,
        &WorkbookData {
            tables: vec![input_sheets::production_sheet(&production)],
        },
    )
    .expect("production written");
    write_workbook(
        &paths.schedule,
        &WorkbookData {
            tables: vec![input_sheets::schedule_sheet(&schedule)],
        },
    )
    .expect("schedule written");
    write_workbook(
        &paths.availability,
        &WorkbookData {
            tables: vec![input_sheets::availability_sheet(&availability)],
        },
    )
    .expect("availability written");
    paths
}

fn base_assumptions() -> Assumptions {
    Assumptions {
        start_year: 2023,
        ..Assumptions::default()
    }
}

#[test]
fn input_workbooks_survive_write_and_read() {
    let dir = tempdir().expect("temporary directory");
    let paths = write_run(dir.path(), "CASE_A", 0.5);

    let schedule = excel_read::read_schedule(&paths.schedule).expect("schedule read");
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].vertical_wells, 1.0);
    assert_eq!(schedule[0].facilities_fraction, 0.0);

    let availability = excel_read::read_availability(&paths.availability).expect("availability read");
    assert_eq!(
        availability,
        vec![AvailabilityRow {
            year: 2023,
            availability: 0.5
        }]
    );
}

#[test]
fn evaluation_writes_ledger_and_json() {
    let dir = tempdir().expect("temporary directory");
    let paths = write_run(dir.path(), "CASE_A", 0.0);
    let ledger_path = dir.path().join("ledger.xlsx");
    let json_path = dir.path().join("ledger.json");

    let evaluation = pipeline::evaluate(
        &paths,
        &base_assumptions(),
        Some(&ledger_path),
        Some(&json_path),
    )
    .expect("evaluation succeeded");

    // 60 MM$ revenue, 5.48 MM$ vertical well, 9 MM$ operating cost.
    let indicators = &evaluation.indicators;
    assert!((indicators.total_revenue - 60.0).abs() < EPSILON);
    assert!((indicators.npv - 45.52).abs() < EPSILON);
    let cpi = indicators.cpi.expect("capital was spent");
    assert!((cpi - 45.52 / 5.48).abs() < EPSILON);

    assert!(ledger_path.exists());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("JSON read")).expect("JSON parsed");
    assert_eq!(json["ledger"]["rows"].as_array().map(Vec::len), Some(1));
}

#[test]
fn missing_availability_column_stops_evaluation() {
    let dir = tempdir().expect("temporary directory");
    let paths = write_run(dir.path(), "CASE_A", 0.0);

    let mut sheet = SheetTable::new("Availability", &["Year", "Uptime"]);
    sheet.push_row(vec![2023.0.into(), 1.0.into()]);
    write_workbook(
        &paths.availability,
        &WorkbookData {
            tables: vec![sheet],
        },
    )
    .expect("availability written");

    let error = pipeline::evaluate(&paths, &base_assumptions(), None, None).unwrap_err();
    assert!(matches!(error, EconError::MissingColumn { .. }));
}

#[test]
fn missing_input_file_is_reported() {
    let dir = tempdir().expect("temporary directory");
    let paths = InputPaths::for_run(dir.path(), "NOWHERE");

    let error = pipeline::evaluate(&paths, &base_assumptions(), None, None).unwrap_err();
    assert!(matches!(error, EconError::MissingInput(_)));
}

#[test]
fn sensitivity_summaries_combine_across_runs() {
    let dir = tempdir().expect("temporary directory");
    let output = dir.path().join("results");
    let assumptions = base_assumptions();
    let bands = SensitivityBands::around(&assumptions);

    for run in ["CASE_A", "CASE_B"] {
        let paths = write_run(dir.path(), run, 1.0);
        let results = pipeline::sensitivity(&paths, &assumptions, &bands, run, &output)
            .expect("sweep succeeded");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].label(), NO_MAKEUP_GAS_LABEL);
        assert!(output.join(format!("{run}_sensitivity_results.txt")).exists());
        assert!(output.join(format!("{run}_sensitivity_results.xlsx")).exists());
    }

    let combined = pipeline::combine(&output).expect("combine succeeded");
    assert_eq!(combined.sources.len(), 2);
    assert_eq!(combined.no_makeup.rows.len(), 2);
    assert_eq!(combined.with_makeup.rows.len(), 2);
    assert_eq!(combined.no_makeup.rows[0][0], "CASE_A");
    assert_eq!(combined.no_makeup.rows[0][2], "32.52");
    assert!(output.join(pipeline::COMBINED_WORKBOOK).exists());

    // Combining again ignores the combined text outputs of the first pass.
    let again = pipeline::combine(&output).expect("second combine succeeded");
    assert_eq!(again.sources.len(), 2);
}

const PRT: &str = "\
@--Message at 365.00 Days  1 Jan 2027
@ Closing connection (1, 1, 1) in well P-01
@ well water cut is above limit
@ Value is 0.951, limit is 0.950
@--Message at 366.00 Days  2 Jan 2027
@ Opening connection 2 in well P-01
@--Message at 367.00 Days  3 Jan 2027
@ Opening connection 3 in well P-01
@--Message at 368.00 Days  4 Jan 2027
@ Closing connection (1, 1, 2) in well P-01
@ well water cut is above limit
@ Value is 0.960, limit is 0.950
";

#[test]
fn prt_files_become_schedules_and_availability() {
    let dir = tempdir().expect("temporary directory");
    let nested = dir.path().join("runs");
    fs::create_dir_all(&nested).expect("nested directory");
    fs::write(nested.join("BDPRODUCERS_2027.PRT"), PRT).expect("PRT written");
    fs::write(dir.path().join("QUIET.prt"), "nothing to see\n").expect("PRT written");

    let config = AppConfig::default();
    let schedules = pipeline::extract_schedules(dir.path(), &config.extraction)
        .expect("schedule extraction succeeded");
    assert_eq!(schedules.len(), 1);
    assert_eq!(
        schedules[0],
        nested.join(run_files::schedule_file_name("BDPRODUCERS_2027"))
    );

    let rows = excel_read::read_schedule(&schedules[0]).expect("schedule read");
    let row = |year| {
        rows.iter()
            .find(|row| row.year == year)
            .copied()
            .expect("year present")
    };
    assert_eq!(row(2027).workover_perf_shutoff, 1.0);
    assert_eq!(row(2028).workover_perf_shutoff, 0.0);
    assert!((row(2025).facilities_fraction - 0.5).abs() < EPSILON);

    let availability = pipeline::generate_availability(&nested, &config.extraction)
        .expect("availability generated");
    assert_eq!(availability.len(), 1);
    let profile = excel_read::read_availability(&availability[0]).expect("availability read");
    assert!(profile.iter().any(|row| row.year == 2025 && row.availability == 1.0));
}

#[cfg(unix)]
#[test]
fn schedule_search_does_not_follow_directory_links() {
    let dir = tempdir().expect("temporary directory");
    let nested = dir.path().join("runs");
    fs::create_dir_all(&nested).expect("nested directory");
    fs::write(nested.join("BDPRODUCERS_2027.PRT"), PRT).expect("PRT written");
    std::os::unix::fs::symlink(dir.path(), nested.join("loop")).expect("link created");

    let config = AppConfig::default();
    let schedules = pipeline::extract_schedules(dir.path(), &config.extraction)
        .expect("schedule extraction succeeded");
    assert_eq!(schedules.len(), 1);
}

#[test]
fn out_of_range_sensitivity_band_is_rejected_before_writing() {
    let dir = tempdir().expect("temporary directory");
    let output = dir.path().join("results");
    let assumptions = base_assumptions();
    let mut bands = SensitivityBands::around(&assumptions);
    bands.high.discount_rate = -1.0;

    let paths = write_run(dir.path(), "CASE_A", 0.0);
    let error = pipeline::sensitivity(&paths, &assumptions, &bands, "CASE_A", &output).unwrap_err();
    assert!(matches!(error, EconError::InvalidAssumption { .. }));
    assert!(!output.exists());
}

#[test]
fn production_summary_becomes_yearly_workbooks() {
    let dir = tempdir().expect("temporary directory");
    let report = dir.path().join("summary.txt");
    fs::write(
        &report,
        "\
SUMMARY OF RUN: BASE CASE :
01-JAN-2024  0.0   100.0   1000.0
01-JAN-2025  365.0 150.0   1800.0
",
    )
    .expect("report written");

    let config = AppConfig::default();
    let written = pipeline::prepare_production(&report, dir.path(), &config.extraction.production)
        .expect("production prepared");
    assert_eq!(written, vec![dir.path().join("BASE_CASE.xlsx")]);

    let rows = excel_read::read_production(&written[0]).expect("production read");
    assert_eq!(
        rows,
        vec![ProductionRow {
            year: 2024,
            oil: 800.0,
            condensate: 0.0,
            gas: 0.0,
        }]
    );
}

#[test]
fn complete_runs_are_grouped_into_folders() {
    let dir = tempdir().expect("temporary directory");
    write_run(dir.path(), "CASE_A", 0.0);
    let partial = InputPaths::for_run(dir.path(), "CASE_B");
    fs::copy(dir.path().join("CASE_A.xlsx"), &partial.production).expect("partial run");

    let report = run_files::organize_runs(dir.path()).expect("organize succeeded");
    assert_eq!(report.grouped, vec!["CASE_A".to_string()]);
    assert_eq!(report.incomplete, vec!["CASE_B".to_string()]);
    for file in run_files::expected_files("CASE_A") {
        assert!(dir.path().join("CASE_A").join(file).exists());
    }
}
