//! Daily COVID-19 Numbers CLI
//!
//! Loads the feeds directly, without the API server:
//! - List the available dates
//! - Print totals, changes and the cumulative curve for a date
//! - Walk the cursor a number of days
//! - Generate a default config file

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use covid_dashboard::aggregate::{format_count, format_delta, Aggregator};
use covid_dashboard::config::{generate_default_config, Config};
use covid_dashboard::cursor::{DateCursor, Direction};
use covid_dashboard::dataset::{parse_date, Category, Dataset};
use covid_dashboard::view::DashboardView;

#[derive(Parser)]
#[command(name = "covid-dashboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Daily COVID-19 totals, changes and curves from the time-series feeds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Read the feeds from this directory instead of the remote source
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the dates present in the feeds
    Dates,

    /// Show totals, changes and the cumulative curve for a date
    View {
        /// Date as YYYY-MM-DD (default: most recent)
        #[arg(short, long)]
        date: Option<String>,
        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Step the cursor day by day, printing each position
    Walk {
        /// Starting date (default: most recent)
        #[arg(short, long)]
        from: Option<String>,
        /// Number of steps
        #[arg(short, long, default_value = "7")]
        steps: usize,
        /// previous or next
        #[arg(short, long, default_value = "previous")]
        direction: Direction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covid_dashboard=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {:?}", parent))?;
                }
                std::fs::write(path, &config).with_context(|| format!("writing {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data.local_dir = Some(dir);
    }

    let dataset = config
        .data
        .loader()?
        .load()
        .await
        .context("loading the time-series feeds")?;

    match cli.command {
        Commands::Dates => {
            for date in dataset.dates() {
                println!("{}", date);
            }
            println!();
            println!(
                "{} dates, {} to {}",
                dataset.dates().len(),
                dataset.first_date(),
                dataset.last_date()
            );
        }

        Commands::View { date, json } => {
            let date = resolve_date(&dataset, date.as_deref())?;
            let view = DashboardView::compute(&dataset, &config.chart, date)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&dataset, &view)?;
            }
        }

        Commands::Walk {
            from,
            steps,
            direction,
        } => {
            let start = resolve_date(&dataset, from.as_deref())?;
            let mut cursor = DateCursor::at(dataset.shared_dates(), start)?;
            let aggregator = Aggregator::new(&dataset);

            print_walk_header();
            print_walk_row(&aggregator, cursor.current())?;
            for _ in 0..steps {
                if !cursor.step(direction) {
                    println!("(reached {})", cursor.current());
                    break;
                }
                print_walk_row(&aggregator, cursor.current())?;
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn resolve_date(dataset: &Dataset, input: Option<&str>) -> anyhow::Result<NaiveDate> {
    let Some(input) = input else {
        return Ok(dataset.last_date());
    };
    let date = parse_date(input).with_context(|| format!("invalid date {:?}", input))?;
    if !dataset.contains(date) {
        bail!(
            "{} is not in the feeds ({} to {})",
            date,
            dataset.first_date(),
            dataset.last_date()
        );
    }
    Ok(date)
}

fn print_view(dataset: &Dataset, view: &DashboardView) -> anyhow::Result<()> {
    println!("Daily COVID-19 Numbers for {}", view.date);
    println!();
    for card in &view.cards {
        println!("  {:<10} {:>14} {:>10}", card.category, card.total, card.change);
    }
    println!();
    println!(
        "Map: {} regions with confirmed cases",
        view.map.markers.len()
    );
    println!();

    let series = Aggregator::new(dataset).cumulative_series(view.date)?;
    println!("{:<12} {:>14} {:>14} {:>14}", "Date", "Confirmed", "Deaths", "Recovered");
    println!("{}", "-".repeat(57));
    for (i, point) in series.confirmed.iter().enumerate() {
        println!(
            "{:<12} {:>14} {:>14} {:>14}",
            point.date.to_string(),
            format_count(point.total),
            format_count(series.deaths[i].total),
            format_count(series.recovered[i].total)
        );
    }
    Ok(())
}

fn print_walk_header() {
    println!("{:<12} {:>24} {:>24}", "Date", "Confirmed", "Deaths");
    println!("{}", "-".repeat(62));
}

fn print_walk_row(aggregator: &Aggregator<'_>, date: NaiveDate) -> anyhow::Result<()> {
    let totals = aggregator.totals(date)?;
    let deltas = aggregator.deltas(date)?;
    let cell = |category: Category| {
        format!(
            "{} ({})",
            format_count(*totals.get(category)),
            format_delta(*deltas.get(category))
        )
    };
    println!(
        "{:<12} {:>24} {:>24}",
        date.to_string(),
        cell(Category::Confirmed),
        cell(Category::Deaths)
    );
    Ok(())
}
