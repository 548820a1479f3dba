use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use accommodation_registry::app::explore_use_case::DashboardSummary;
use accommodation_registry::app::{ExploreUseCase, NormalizeUseCase, RunReport};
use accommodation_registry::config::Config;
use accommodation_registry::domain::Grade;
use accommodation_registry::explore::Filters;
use accommodation_registry::infra::{CsvFileSource, CsvFileStore};
use accommodation_registry::logging;

#[derive(Parser)]
#[command(name = "accommodation_registry")]
#[command(about = "Sri Lanka accommodation registry normalizer")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file (defaults to registry.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these districts (repeatable)
    #[arg(long = "district")]
    districts: Vec<String>,
    /// Keep only these accommodation types (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,
    /// Keep only these grades: THREE, FOUR, FIVE, UNRATED (repeatable)
    #[arg(long = "grade")]
    grades: Vec<Grade>,
}

impl FilterArgs {
    fn into_filters(self) -> Filters {
        Filters::new()
            .with_districts(self.districts)
            .with_types(self.types)
            .with_grades(self.grades)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw registry into the canonical store
    Normalize {
        /// Raw registry CSV (overrides config)
        #[arg(long)]
        source: Option<PathBuf>,
        /// Canonical store CSV (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print key stats and aggregates for a filter selection
    Summary {
        /// Canonical store CSV (defaults to the configured output)
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Export the filtered view as CSV
    Export {
        /// Destination CSV
        #[arg(long)]
        output: PathBuf,
        /// Canonical store CSV (defaults to the configured output)
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

fn print_report(report: &RunReport) {
    println!("\n📊 Normalization results:");
    println!("   Source: {}", report.source);
    println!("   Rows read: {}", report.stats.total_rows);
    println!("   Emitted: {}", report.stats.emitted_rows);
    println!("   Dropped: {}", report.stats.dropped_rows);
    println!("   Distinct hotels: {}", report.stats.distinct_hotels);
    println!("   Output file: {}", report.output);

    if !report.stats.drop_reasons.is_empty() {
        println!("\n⚠️  Missing required fields among dropped rows:");
        for (field, count) in &report.stats.drop_reasons {
            println!("   - {}: {}", field, count);
        }
    }
}

fn print_summary(summary: &DashboardSummary) {
    let grades: Vec<&str> = summary.options.grades.iter().map(|g| g.as_str()).collect();
    println!("🔎 Available filters");
    println!("   Districts: {}", summary.options.districts.join(", "));
    println!("   Types: {}", summary.options.types.join(", "));
    println!("   Grades: {}", grades.join(", "));

    println!("\n📊 Key stats");
    println!("   Total accommodations: {}", summary.key_stats.total_accommodations);
    println!("   Total rooms: {}", summary.key_stats.total_rooms);
    println!("   Districts covered: {}", summary.key_stats.districts_covered);

    println!("\n🏙️  Rooms by district");
    for row in &summary.rooms_by_district {
        println!("   {:<24} {:>8}", row.label, row.value);
    }

    println!("\n🛏️  Accommodation types");
    for row in &summary.type_distribution {
        println!("   {:<24} {:>8}", row.label, row.value);
    }

    println!("\n⭐ Grades");
    for row in &summary.grade_distribution {
        println!("   {:<24} {:>8}", row.label, row.value);
    }

    println!("\n📐 Mean rooms by grade");
    for mean in &summary.mean_rooms_by_grade {
        println!("   {:<24} {:>8.1}", mean.grade, mean.mean_rooms);
    }

    println!("\n📍 Map points: {}", summary.map_points);
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _guard = logging::init_logging(&config.paths.log_dir);

    match cli.command {
        Commands::Normalize {
            source,
            output,
            json,
        } => {
            let source = source.unwrap_or_else(|| config.paths.source.clone());
            let output = output.unwrap_or_else(|| config.paths.output.clone());

            let use_case = NormalizeUseCase::new(
                Box::new(CsvFileSource::new(source)),
                Box::new(CsvFileStore::new(output)),
                config.normalize.clone(),
            );

            match use_case.run() {
                Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
                Ok(report) => print_report(&report),
                Err(e) => {
                    error!("Normalization failed: {:#}", e);
                    return Err(e);
                }
            }
        }
        Commands::Summary {
            input,
            filters,
            json,
        } => {
            let input = input.unwrap_or_else(|| config.paths.output.clone());
            let mut explore = ExploreUseCase::new(input);
            let summary = explore.summarize(&filters.into_filters())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Export {
            output,
            input,
            filters,
        } => {
            let input = input.unwrap_or_else(|| config.paths.output.clone());
            let mut explore = ExploreUseCase::new(input);
            let rows = explore.export(&filters.into_filters(), &output)?;
            println!("✅ Exported {} rows to {}", rows, output.display());
        }
    }

    Ok(())
}
