//! roi-engine CLI
//!
//! Run ROI projections from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Project a realistic return on a marketing investment
//! roi-engine calculate --investment 50000 --category marketing-hub --scenario realistic
//!
//! # Same, in euros, as JSON
//! roi-engine calculate --investment 50000 --category sales-hub --scenario optimistic \
//!     --currency EUR --format json
//!
//! # Compare all three scenario types
//! roi-engine compare --investment 50000 --category service-hub
//!
//! # Record every calculation to a JSON-lines file
//! ROI_RECORD_PATH=events.jsonl roi-engine calculate --investment 25000 \
//!     --category operations-hub --scenario conservative
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use roi_engine::calculation::calculator::{CalculationInput, RoiCalculator};
use roi_engine::config::{EngineConfig, CATALOG_PATH_ENV, RECORD_PATH_ENV};
use roi_engine::core::currency::{CurrencyCode, FxRateTable};
use roi_engine::recording::{LeadRecord, LeadSubmission, RecordedEvent};
use roi_engine::validation::{validate_calculation, validate_investment, ValidationReport};
use rust_decimal::Decimal;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "roi-engine")]
#[command(about = "Scenario-based marketing ROI projections", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true, env = CATALOG_PATH_ENV)]
    catalog: Option<PathBuf>,

    /// Append calculations and leads to this JSON-lines file
    #[arg(long, global = true, env = RECORD_PATH_ENV)]
    record: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project the return of one investment
    Calculate {
        /// Amount invested, in the chosen currency
        #[arg(long)]
        investment: Decimal,

        /// Category id, e.g. marketing-hub
        #[arg(long)]
        category: String,

        /// conservative, realistic or optimistic
        #[arg(long)]
        scenario: String,

        /// Scenario id within the category (defaults to the first one)
        #[arg(long)]
        specific: Option<String>,

        #[arg(long, default_value = "USD")]
        currency: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare the three scenario types on a category's default scenario
    Compare {
        #[arg(long)]
        investment: Decimal,

        #[arg(long)]
        category: String,

        #[arg(long, default_value = "USD")]
        currency: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List catalog categories
    Categories {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the scenarios of one category
    Scenarios {
        #[arg(long)]
        category: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List supported currencies and their USD rates
    Currencies {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a lead submission JSON file and record it
    Lead {
        #[arg(long)]
        input: PathBuf,
    },
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let non_empty = |path: &Option<PathBuf>| path.clone().filter(|p| !p.as_os_str().is_empty());
        EngineConfig {
            catalog_path: non_empty(&self.catalog),
            record_path: non_empty(&self.record),
        }
    }
}

/// Print a failed report and bail out.
fn reject(report: &ValidationReport) -> Box<dyn Error> {
    eprint!("{report}");
    format!("validation failed with {} error(s)", report.errors.len()).into()
}

fn print_warnings(report: &ValidationReport) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}

fn cmd_calculate(
    calculator: &RoiCalculator,
    input: CalculationInput,
    format: OutputFormat,
) -> CliResult {
    let report = validate_calculation(&input, calculator.catalog(), calculator.rates());
    if !report.is_valid() {
        return Err(reject(&report));
    }
    print_warnings(&report);

    let result = calculator.calculate(&input)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => println!("{result}"),
    }
    Ok(())
}

fn cmd_compare(
    calculator: &RoiCalculator,
    investment: Decimal,
    category: &str,
    currency: &CurrencyCode,
    format: OutputFormat,
) -> CliResult {
    let mut report = validate_investment(investment);
    if calculator.catalog().category(category).is_none() {
        report.error("Selected category is not available");
    }
    if !calculator.rates().is_supported(currency) {
        report.error("Selected currency is not supported");
    }
    if !report.is_valid() {
        return Err(reject(&report));
    }
    print_warnings(&report);

    let comparison = calculator.compare(investment, category, currency);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        OutputFormat::Text => println!("{comparison}"),
    }
    Ok(())
}

fn cmd_categories(calculator: &RoiCalculator, format: OutputFormat) -> CliResult {
    let summaries = calculator.catalog().category_summaries();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Text => {
            println!("{:<22} {:<36} {:>9}", "ID", "Name", "Scenarios");
            for summary in &summaries {
                println!(
                    "{:<22} {:<36} {:>9}",
                    summary.id, summary.name, summary.scenario_count
                );
            }
        }
    }
    Ok(())
}

fn cmd_scenarios(calculator: &RoiCalculator, category: &str, format: OutputFormat) -> CliResult {
    let summaries = calculator
        .catalog()
        .scenario_summaries(category)
        .ok_or_else(|| format!("unknown category '{category}'"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Text => {
            println!("{:<34} {:>6} {:>8}  Source", "ID", "ROI", "Months");
            for s in &summaries {
                println!(
                    "{:<34} {:>5}x {:>8}  {}",
                    s.id, s.average_roi, s.timeframe, s.research_source
                );
                println!("    {}: {}", s.name, s.description);
                if !s.features.is_empty() {
                    println!("    Features:   {}", s.features.join(", "));
                }
                if !s.advantages.is_empty() {
                    println!("    Advantages: {}", s.advantages.join(", "));
                }
                for (competitor, benchmark) in &s.competitor_comparison {
                    println!("    vs {competitor}: {benchmark}");
                }
                for (metric, value) in &s.industry_benchmarks {
                    println!("    {metric}: {value}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_currencies(rates: &FxRateTable, format: OutputFormat) -> CliResult {
    let currencies: Vec<_> = rates.currencies().collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&currencies)?),
        OutputFormat::Text => {
            println!("{:<6} {:<6} {:>10}", "Code", "Symbol", "Per USD");
            for info in currencies {
                println!("{:<6} {:<6} {:>10}", info.code, info.symbol, info.rate);
            }
        }
    }
    Ok(())
}

fn cmd_lead(config: &EngineConfig, path: &Path) -> CliResult {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("error reading file '{}': {e}", path.display()))?;
    let submission: LeadSubmission = serde_json::from_str(&content)?;

    let record = LeadRecord::accept(submission, None).map_err(|report| reject(&report))?;
    for warning in &record.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&record)?);

    match config.open_recorder()? {
        Some(recorder) => {
            recorder.record(RecordedEvent::Lead(record));
            let stats = recorder.shutdown()?;
            log::debug!("lead recorder finished: {stats:?}");
        }
        None => eprintln!("note: no --record file configured; lead was not stored"),
    }
    Ok(())
}

fn run(cli: Cli) -> CliResult {
    let config = cli.engine_config();
    let calculator = || config.build_calculator();

    match cli.command {
        Commands::Calculate {
            investment,
            category,
            scenario,
            specific,
            currency,
            format,
        } => {
            let mut input = CalculationInput::new(investment, category, scenario)
                .with_currency(CurrencyCode::new(currency.to_uppercase()));
            input.specific_scenario = specific;
            cmd_calculate(&calculator()?, input, format)
        }
        Commands::Compare {
            investment,
            category,
            currency,
            format,
        } => cmd_compare(
            &calculator()?,
            investment,
            &category,
            &CurrencyCode::new(currency.to_uppercase()),
            format,
        ),
        Commands::Categories { format } => cmd_categories(&calculator()?, format),
        Commands::Scenarios { category, format } => {
            cmd_scenarios(&calculator()?, &category, format)
        }
        Commands::Currencies { format } => cmd_currencies(&FxRateTable::standard(), format),
        Commands::Lead { input } => cmd_lead(&config, &input),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
