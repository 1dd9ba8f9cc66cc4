//! Restaurant listing CLI
//!
//! Loads the listing page data from the restaurant API, applies filters, and
//! prints the visible restaurants.
//!
//! # Usage
//!
//! ```bash
//! # Everything, against the configured API_BASE_URL
//! restaurant_listing
//!
//! # Pizza places delivering in 10-30 minutes, as JSON
//! restaurant_listing --category 59c5e8f0-8255-45e4-9674-1602e4f32998 --delivery 10-30 -o json
//!
//! # Offline, from a fixture file
//! restaurant_listing --fixture demos/listing.json --options
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use restaurant_discovery::{
    config::{AppConfig, ValidationMode},
    filters::{FilterKey, FilterStore},
    listing::{
        category_options, delivery_time_options, open_label, price_label, price_range_options,
        readable_delivery_time, FilterOption, ListingLoader, ListingView,
    },
    logging::{init_tracing, DEFAULT_LOG_FILTER},
    pipeline::ListingData,
    InMemoryTransport, RestaurantClient,
};

#[derive(Parser)]
#[command(name = "restaurant_listing")]
#[command(version)]
#[command(about = "List restaurants from the restaurant API with category, delivery time and price filters")]
struct Cli {
    /// Category id to include (repeatable)
    #[arg(long = "category", short = 'c')]
    categories: Vec<String>,

    /// Delivery time bucket: 0-10, 10-30, 30-60 or 60 (repeatable)
    #[arg(long = "delivery", short = 'd')]
    delivery_times: Vec<String>,

    /// Price range id to include (repeatable)
    #[arg(long = "price", short = 'p')]
    price_ranges: Vec<String>,

    /// Serve responses from a fixture file instead of the API
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Also print the available filter options
    #[arg(long)]
    options: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(DEFAULT_LOG_FILTER);
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = build_client(&cli)?;
    let loader = ListingLoader::new(client);
    loader.reload().await.context("Listing data failed validation")?;

    let store = FilterStore::global();
    for (key, values) in [
        (FilterKey::Categories, &cli.categories),
        (FilterKey::DeliveryTimes, &cli.delivery_times),
        (FilterKey::PriceRanges, &cli.price_ranges),
    ] {
        for value in values {
            store.toggle(key, value);
        }
    }

    let snapshot = loader.current();
    let view = loader.view(&store.snapshot());

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "filters": store.snapshot(),
                "restaurants": view.restaurants,
                "empty_state": view.empty_state,
                "loaded_at": snapshot.loaded_at,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if cli.options {
                print_options(&snapshot.data);
            }
            print_view(&snapshot.data, &view);
        }
    }

    Ok(())
}

fn build_client(cli: &Cli) -> Result<RestaurantClient> {
    match &cli.fixture {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read fixture {}", path.display()))?;
            let fixture = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse fixture {}", path.display()))?;
            let transport = InMemoryTransport::from_fixture(fixture)
                .with_context(|| format!("Invalid fixture {}", path.display()))?;
            Ok(RestaurantClient::new(
                Arc::new(transport),
                ValidationMode::Strict,
            ))
        }
        None => {
            let config = AppConfig::from_env()?;
            tracing::info!(
                base_url = %config.api_base_url,
                timeout_secs = config.request_timeout.as_secs(),
                mode = ?config.validation_mode,
                "Configuration loaded"
            );
            RestaurantClient::from_config(&config).context("Failed to create HTTP client")
        }
    }
}

fn print_options(data: &ListingData) {
    let groups: [(&str, Vec<FilterOption>); 3] = [
        ("Food Category", category_options(&data.categories)),
        ("Delivery Time", delivery_time_options()),
        ("Price Range", price_range_options(&data.price_ranges)),
    ];

    println!("{}", "Filter".bold());
    for (title, options) in groups {
        println!("  {}", title.to_uppercase().dimmed());
        for option in options {
            println!("    {:<12} {}", option.label, option.value.dimmed());
        }
    }
    println!();
}

fn print_view(data: &ListingData, view: &ListingView) {
    println!("{}", "Restaurants".bold());

    if let Some(message) = view.empty_state.message() {
        println!("  {}", message.yellow());
        return;
    }

    for restaurant in &view.restaurants {
        let status = open_label(restaurant.is_open);
        let status = if restaurant.is_open {
            status.green()
        } else {
            status.normal()
        };
        let price = price_label(&data.price_ranges, restaurant.price_range_id()).unwrap_or("-");

        println!(
            "  {:<32} {:>4.1}  {:<6}  {:<8}  {}",
            restaurant.name(),
            restaurant.details.rating,
            status,
            readable_delivery_time(restaurant.delivery_time_minutes()),
            price
        );
    }
}
