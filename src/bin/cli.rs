//! Checkpoint CLI
//!
//! Command-line interface over the record store:
//! - Create the store
//! - List and run reports, export them as CSV
//! - Search stops and show the dashboard overview
//! - Register stops and seed from CSV

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use checkpoint::api::dto::StopQuery;
use checkpoint::config::Config;
use checkpoint::dashboard::{CategoryCount, Overview};
use checkpoint::ingest::{Ingestor, StopCsvImporter};
use checkpoint::records::StopRecord;
use checkpoint::reports::{write_export, ReportCatalog, ReportTier};
use checkpoint::search::{format_rate, Summary};
use checkpoint::store::{Store, Table};

#[derive(Parser)]
#[command(name = "checkpoint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Traffic-stop analytics over a SQLite record store")]
#[command(long_about = "Checkpoint runs canned analytical reports over police traffic-stop records.\nSearch stops, register new ones and export any report as CSV.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Show informational log output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and schema if missing
    Init,

    /// List the reports of a tier (standard/medium, advanced/complex)
    Reports {
        tier: ReportTier,
    },

    /// Run a report
    Run {
        tier: ReportTier,
        /// Report name, exactly as listed
        name: String,
        /// Also write the result to the export directory
        #[arg(short, long)]
        export: bool,
    },

    /// Show headline numbers and distributions
    Overview,

    /// Search stops
    Search {
        /// Only stops where a search was conducted
        #[arg(long)]
        searched_only: bool,
        #[arg(long)]
        search_type: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        violation: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Vehicle number fragment (case-insensitive)
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        age_min: Option<f64>,
        #[arg(long)]
        age_max: Option<f64>,
    },

    /// Register a new stop
    Register {
        /// Stop date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Stop time, HH:MM[:SS] (default: now)
        #[arg(long)]
        time: Option<NaiveTime>,
        #[arg(long)]
        country: String,
        /// M, F or Other
        #[arg(long)]
        gender: String,
        #[arg(long)]
        age: Option<i64>,
        /// Age as captured at the source (default: --age)
        #[arg(long)]
        age_raw: Option<i64>,
        #[arg(long)]
        race: Option<String>,
        #[arg(long)]
        violation: String,
        /// Violation as captured at the source (default: --violation)
        #[arg(long)]
        violation_raw: Option<String>,
        #[arg(long)]
        searched: bool,
        /// Ignored unless --searched
        #[arg(long)]
        search_type: Option<String>,
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        arrested: bool,
        /// Free text such as "16-30 Min"
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        drugs: bool,
        #[arg(long)]
        vehicle: Option<String>,
    },

    /// Seed stops from a CSV file
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if !cli.verbose {
        config.logging.level = "warn".to_string();
    }
    checkpoint::logging::init(&config.logging);

    match cli.command {
        Commands::Init => {
            let store = Store::from_config(&config.store).with_context(|| {
                format!(
                    "Failed to create record store at {:?}",
                    config.store.database_path
                )
            })?;
            println!("Record store ready at {:?}", store.path());
            println!("  Stops: {}", store.count()?);
        }

        Commands::Reports { tier } => match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tier.definitions())?);
            }
            _ => {
                println!("{}", tier.title());
                println!("{}", "-".repeat(60));
                for (idx, report) in tier.definitions().iter().enumerate() {
                    println!("{:>2}. {}", idx + 1, report.name);
                    println!("    {}", report.description);
                }
            }
        },

        Commands::Run { tier, name, export } => {
            let catalog = ReportCatalog::new(open_store(&config)?);
            let table = catalog.run(tier, &name)?;

            print_output(&table, cli.format)?;

            if export {
                let path = write_export(&table, &config.export.output_dir, &name)?;
                eprintln!("Exported to {:?}", path);
            }
        }

        Commands::Overview => {
            let store = open_store(&config)?;
            let overview = Overview::from_table(&store.fetch_all()?);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
                _ => print_overview(&overview),
            }
        }

        Commands::Search {
            searched_only,
            search_type,
            country,
            violation,
            gender,
            vehicle,
            age_min,
            age_max,
        } => {
            let query = StopQuery {
                searched_only,
                search_type,
                country,
                violation,
                gender,
                vehicle,
                age_min,
                age_max,
            };

            let store = open_store(&config)?;
            let table = query.filter().apply(&store.fetch_all()?)?;
            let summary = Summary::from_table(&table);

            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({ "table": table, "summary": summary });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Csv => print_output(&table, OutputFormat::Csv)?,
                OutputFormat::Table => {
                    print_table(&table);
                    println!();
                    print_summary(&summary);
                }
            }
        }

        Commands::Register {
            date,
            time,
            country,
            gender,
            age,
            age_raw,
            race,
            violation,
            violation_raw,
            searched,
            search_type,
            outcome,
            arrested,
            duration,
            drugs,
            vehicle,
        } => {
            let now = Local::now().naive_local();
            let record = StopRecord {
                stop_date: date.unwrap_or_else(|| now.date()),
                stop_time: time.unwrap_or_else(|| now.time()),
                country_name: country,
                driver_gender: gender,
                driver_age_raw: age_raw,
                driver_age: age,
                driver_race: race,
                violation_raw: violation_raw.unwrap_or_else(|| violation.clone()),
                violation,
                search_conducted: searched,
                search_type,
                stop_outcome: outcome,
                is_arrested: arrested,
                stop_duration: duration,
                drugs_related_stop: drugs,
                vehicle_number: vehicle,
            };

            let store = open_store(&config)?;
            Ingestor::new(Arc::clone(&store)).insert(&record)?;
            println!("Stop registered ({} total)", store.count()?);
        }

        Commands::Import { path, dry_run } => {
            if !path.exists() {
                anyhow::bail!("File not found: {:?}", path);
            }

            let result = StopCsvImporter::new().parse_path(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);
            println!("  Valid records: {}", result.records.len());

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no data was imported)");
            } else if !result.records.is_empty() {
                let inserted = result.commit(&Ingestor::new(open_store(&config)?))?;
                println!();
                println!("  Imported: {}", inserted);
            }
        }

        Commands::Config { output } => {
            let content = checkpoint::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

/// Open the configured store, which `checkpoint init` must have created
fn open_store(config: &Config) -> anyhow::Result<Arc<Store>> {
    let path = &config.store.database_path;
    let store = Store::open_existing(path).with_context(|| {
        format!(
            "Failed to open record store at {:?} (run `checkpoint init` to create it)",
            path
        )
    })?;
    Ok(Arc::new(store))
}

fn print_output(table: &Table, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(table),
        OutputFormat::Csv => table.write_csv(std::io::stdout().lock())?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(table)?),
    }
    Ok(())
}

fn print_table(table: &Table) {
    if table.is_empty() {
        println!("No rows");
        return;
    }

    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .column_names()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(table.column_names()));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &cells {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }

    println!();
    println!("{} rows", table.len());
}

fn print_summary(summary: &Summary) {
    println!("Total stops:     {}", summary.total);
    println!("Arrest rate:     {}", format_rate(summary.arrest_rate));
    println!("Search rate:     {}", format_rate(summary.search_rate));
    println!("Drug stop rate:  {}", format_rate(summary.drug_stop_rate));
    match summary.average_age {
        Some(age) => println!("Average age:     {:.1}", age),
        None => println!("Average age:     N/A"),
    }
}

fn print_overview(overview: &Overview) {
    println!("Total stops:         {}", overview.total_stops);
    println!("Total arrests:       {}", overview.total_arrests);
    println!("Searches conducted:  {}", overview.searches_conducted);
    println!("Drug-related stops:  {}", overview.drug_related_stops);

    print_counts("Stops by country", &overview.stops_by_country);
    print_counts("Driver gender", &overview.gender_distribution);
    print_counts("Stop outcomes", &overview.stop_outcomes);
    print_counts("Age distribution", &overview.age_distribution);
    print_counts("Time of day", &overview.time_of_day);
}

fn print_counts(title: &str, counts: &[CategoryCount]) {
    println!();
    println!("{}", title);
    println!("{}", "-".repeat(40));
    for entry in counts {
        println!(
            "{:<20} {:>8} {:>8.2}%",
            entry.label, entry.count, entry.percentage
        );
    }
}
