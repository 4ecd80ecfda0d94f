use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use field_econ::config::AppConfig;
use field_econ::economics::sensitivity::ScenarioResult;
use field_econ::io::run_files;
use field_econ::model::Indicators;
use field_econ::pipeline::{self, InputPaths};
use field_econ::{EconError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| EconError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Evaluate(args) => {
            args.model.apply(&mut config)?;
            let paths = args.inputs.resolve()?;
            let evaluation = pipeline::evaluate(
                &paths,
                &config.assumptions,
                args.output.as_deref(),
                args.json.as_deref(),
            )?;
            print_indicators(&evaluation.indicators);
            Ok(())
        }
        Command::Sensitivity(args) => {
            args.model.apply(&mut config)?;
            let paths = args.inputs.resolve()?;
            let run_name = args.inputs.run_name(&paths);
            let bands = config.sensitivity_bands();
            let results = pipeline::sensitivity(
                &paths,
                &config.assumptions,
                &bands,
                &run_name,
                &args.output_dir,
            )?;
            print_sweep(&results);
            Ok(())
        }
        Command::Combine { folder } => {
            let combined = pipeline::combine(&folder)?;
            println!("{}", combined.no_makeup.to_fixed_width());
            println!();
            println!("{}", combined.with_makeup.to_fixed_width());
            Ok(())
        }
        Command::PrepProduction { report, output_dir } => {
            let written =
                pipeline::prepare_production(&report, &output_dir, &config.extraction.production)?;
            print_written(&written);
            Ok(())
        }
        Command::Workovers { root } => {
            let written = pipeline::extract_schedules(&root, &config.extraction)?;
            print_written(&written);
            Ok(())
        }
        Command::MakeupGas { dir } => {
            let written = pipeline::generate_availability(&dir, &config.extraction)?;
            print_written(&written);
            Ok(())
        }
        Command::Organize { dir } => {
            let report = run_files::organize_runs(&dir)?;
            for run in &report.grouped {
                println!("grouped {run}");
            }
            for run in &report.incomplete {
                println!("incomplete {run}");
            }
            Ok(())
        }
    }
}

fn cpi_text(cpi: Option<f64>) -> String {
    match cpi {
        Some(value) => format!("{value:.2}"),
        None => "inf".to_string(),
    }
}

fn print_indicators(indicators: &Indicators) {
    println!("NPV (MM$)              {:>12.2}", indicators.npv);
    println!("Total Revenue (MM$)    {:>12.2}", indicators.total_revenue);
    println!("Total Cost (MM$)       {:>12.2}", indicators.total_cost);
    println!("Cumulative NCF (MM$)   {:>12.2}", indicators.cumulative_ncf);
    println!("CPI                    {:>12}", cpi_text(indicators.cpi));
    println!("PIR                    {:>12.2}", indicators.pir);
}

fn print_sweep(results: &[ScenarioResult]) {
    for result in results {
        println!("Sensitivity Summary: {}", result.label());
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>8} {:>8}",
            "Case", "NPV", "Revenue", "Cost", "CPI", "PIR"
        );
        for (case, evaluation) in result.cases() {
            let indicators = &evaluation.indicators;
            println!(
                "{:<10} {:>12.2} {:>12.2} {:>12.2} {:>8} {:>8.2}",
                case,
                indicators.npv,
                indicators.total_revenue,
                indicators.total_cost,
                cpi_text(indicators.cpi),
                indicators.pir
            );
        }
        println!();
    }
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Derive field development schedules from simulation reports and evaluate their economics."
)]
struct Cli {
    /// Optional TOML configuration with assumptions and extraction rules.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the annual cash-flow ledger of one run.
    Evaluate(EvaluateArgs),
    /// Run the low/mid/high sweep with and without make-up gas cost.
    Sensitivity(SensitivityArgs),
    /// Combine the sensitivity summaries of a folder.
    Combine {
        /// Folder holding `*_sensitivity_results.txt` files.
        folder: PathBuf,
    },
    /// Convert a cumulative production summary into yearly production workbooks.
    PrepProduction {
        /// Summary report text file.
        report: PathBuf,
        /// Folder receiving one workbook per run.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Build drilling and workover schedules from PRT files.
    Workovers {
        /// Folder searched recursively for PRT files.
        root: PathBuf,
    },
    /// Build make-up gas availability workbooks for the PRT files of a folder.
    MakeupGas { dir: PathBuf },
    /// Group complete per-run workbook sets into per-run folders.
    Organize { dir: PathBuf },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Folder holding the conventional workbooks of `--run`.
    #[arg(long)]
    run_dir: Option<PathBuf>,

    /// Run name; also names the sensitivity output files.
    #[arg(long)]
    run: Option<String>,

    /// Yearly production workbook.
    #[arg(long)]
    production: Option<PathBuf>,

    /// Drilling, workover and facilities schedule workbook.
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Make-up gas availability workbook.
    #[arg(long)]
    availability: Option<PathBuf>,
}

impl InputArgs {
    /// Explicit paths win over the conventional names inside `--run-dir`.
    fn resolve(&self) -> Result<InputPaths> {
        let conventional = match (&self.run_dir, &self.run) {
            (Some(dir), Some(run)) => Some(InputPaths::for_run(dir, run)),
            _ => None,
        };
        let pick = |explicit: &Option<PathBuf>,
                    fallback: Option<&PathBuf>,
                    table: &'static str|
         -> Result<PathBuf> {
            explicit
                .clone()
                .or_else(|| fallback.cloned())
                .ok_or(EconError::MissingTable(table))
        };

        Ok(InputPaths {
            production: pick(
                &self.production,
                conventional.as_ref().map(|paths| &paths.production),
                "production",
            )?,
            schedule: pick(
                &self.schedule,
                conventional.as_ref().map(|paths| &paths.schedule),
                "schedule",
            )?,
            availability: pick(
                &self.availability,
                conventional.as_ref().map(|paths| &paths.availability),
                "availability",
            )?,
        })
    }

    fn run_name(&self, paths: &InputPaths) -> String {
        self.run.clone().unwrap_or_else(|| stem(&paths.production))
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Run_Name".to_string())
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Start year of the economic analysis.
    #[arg(long)]
    start_year: Option<i32>,

    /// Oil price in $/bbl.
    #[arg(long)]
    oil_price: Option<f64>,

    /// Discount rate as a fraction.
    #[arg(long)]
    discount_rate: Option<f64>,

    /// Escalate prices with the price inflation rate.
    #[arg(long)]
    escalate_prices: bool,
}

impl ModelArgs {
    fn apply(&self, config: &mut AppConfig) -> Result<()> {
        let assumptions = &mut config.assumptions;
        if let Some(year) = self.start_year {
            assumptions.start_year = year;
        }
        if let Some(price) = self.oil_price {
            assumptions.oil_price = price;
        }
        if let Some(rate) = self.discount_rate {
            assumptions.discount_rate = rate;
        }
        if self.escalate_prices {
            assumptions.fixed_price = false;
        }
        assumptions.validate()
    }
}

#[derive(clap::Args)]
struct EvaluateArgs {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(flatten)]
    model: ModelArgs,

    /// Ledger workbook to write.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Ledger and indicators as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(clap::Args)]
struct SensitivityArgs {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(flatten)]
    model: ModelArgs,

    /// Folder receiving the summary text and workbook.
    #[arg(long, default_value = "sensitivity_analysis_results")]
    output_dir: PathBuf,
}
