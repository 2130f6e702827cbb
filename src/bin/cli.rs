//! Flight search CLI
//!
//! Airport lookup, flight search and offline reconciliation from a terminal.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use flight_search::{
    error::{AppError, Result},
    models::{AirportSuggestion, Config, DATE_FORMAT, ReconciledResult, Tag},
    services::{FlightsClient, Reconciler},
    session::{AirportField, SearchController},
    utils::http::ReqwestTransport,
};

/// Flight search from the command line
#[derive(Parser, Debug)]
#[command(name = "flight-search", version, about = "Flight search client")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up airports matching a query
    Airports { query: String },

    /// List airports near a coordinate
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Search one-way flights between the best matches of two queries
    Search {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Travel date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Reconcile a saved searchFlights response
    Reconcile { file: PathBuf },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    init_logging(cli.verbose, &config.logging.level);

    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Airports { query } => {
            let client = FlightsClient::new(config)?;
            let airports = client.search_airport(&query).await;
            print_airports(&airports);
        }

        Command::Nearby { lat, lng } => {
            let client = FlightsClient::new(config)?;
            let airports = client.nearby_airports(lat, lng).await;
            print_airports(&airports);
        }

        Command::Search { from, to, date } => {
            let today = Local::now().date_naive();
            let date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                    .map_err(|_| AppError::validation("Date must be in YYYY-MM-DD format"))?,
                None => today,
            };

            let controller = SearchController::new(FlightsClient::new(config)?, today);
            for (field, query) in [(AirportField::Origin, &from), (AirportField::Destination, &to)] {
                let airport = first_airport(&controller, query).await?;
                log::info!("{:?}: {}", field, airport.display_title());
                controller.select_airport(field, &airport);
            }
            controller
                .set_travel_date_on(date, today)
                .map_err(|e| AppError::validation(e.to_string()))?;

            let Some(result) = controller.search().await else {
                return Ok(());
            };
            let state = controller.snapshot();
            let origin = state.field(AirportField::Origin).selected.as_ref();
            let destination = state.field(AirportField::Destination).selected.as_ref();
            print_result(
                &result,
                origin.map(|a| a.sky_id.as_str()),
                destination.map(|a| a.sky_id.as_str()),
            );
        }

        Command::Reconcile { file } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let raw: serde_json::Value = serde_json::from_str(&content)?;
            let result = Reconciler::new(config.display.clock).reconcile(Some(&raw));
            print_result(&result, None, None);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            if config.api.is_complete() {
                log::info!("✓ API credentials present");
            } else {
                log::warn!("API key or host missing; requests will be skipped");
            }
        }
    }

    Ok(())
}

async fn first_airport(
    controller: &SearchController<ReqwestTransport>,
    query: &str,
) -> Result<AirportSuggestion> {
    controller
        .client()
        .search_airport(query)
        .await
        .into_iter()
        .next()
        .ok_or_else(|| AppError::validation(format!("No airport found for \"{query}\"")))
}

fn print_airports(airports: &[AirportSuggestion]) {
    if airports.is_empty() {
        println!("No airports found");
        return;
    }
    for airport in airports {
        println!(
            "{:<6} {:<10} {}  {}",
            airport.sky_id,
            airport.entity_id,
            airport.display_title(),
            airport.presentation.subtitle
        );
    }
}

fn print_result(result: &ReconciledResult, origin: Option<&str>, destination: Option<&str>) {
    match result {
        ReconciledResult::Success { itineraries } if itineraries.is_empty() => {
            println!("No flights found");
        }
        ReconciledResult::Success { itineraries } => {
            println!("{} flights found", itineraries.len());
            for itinerary in itineraries {
                let leg = &itinerary.leg;
                println!();
                println!("{}  {}", itinerary.route_label(origin, destination), itinerary.price);
                println!(
                    "  {} - {}  {}",
                    leg.departure_time, leg.arrival_time, leg.duration
                );
                if let Some(stops) = leg.stops_label() {
                    println!("  {stops}");
                }
                if !leg.carrier_name.is_empty() {
                    println!("  {}", leg.carrier_name);
                }
                if !itinerary.tags.is_empty() {
                    println!("  [{}]", tag_list(&itinerary.tags));
                }
            }
        }
        ReconciledResult::Empty => println!("No search performed"),
        ReconciledResult::ApiError { message } | ReconciledResult::Malformed { message } => {
            eprintln!("{message}");
        }
    }
}

fn tag_list(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| format!("{} {}", tag.display_label(), tag.color().hex()))
        .collect::<Vec<_>>()
        .join(", ")
}
