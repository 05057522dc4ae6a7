use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tidyflow::config::AppConfig;
use tidyflow::error::AppError;
use tidyflow::telemetry;
use tidyflow::workflows::booking::{
    booking_router, seed, BookingApi, DispatchService, Frequency, InMemoryRoster, LogAlerts,
    QuoteEngine, QuoteRequest, RosterCsvImporter, ServiceType, TimeOfDay,
};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Tidyflow Booking Core",
    about = "Run the cleaning-service booking core or price a quote from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a booking and print the breakdown
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Seed the crew roster from a CSV export instead of the demo roster
    #[arg(long)]
    roster_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    #[arg(long, default_value_t = 3)]
    bedrooms: u8,
    #[arg(long, default_value_t = 2)]
    bathrooms: u8,
    #[arg(long, default_value_t = 1500)]
    square_feet: u32,
    /// standard | deep | moveInOut | airbnb | postConstruction
    #[arg(long, default_value = "standard", value_parser = parse_service_type)]
    service_type: ServiceType,
    /// onetime | weekly | biweekly | monthly
    #[arg(long, default_value = "onetime", value_parser = parse_frequency)]
    frequency: Frequency,
    /// Add-on identifier; repeat the flag for multiple add-ons
    #[arg(long = "add-on")]
    add_ons: Vec<String>,
    #[arg(long)]
    location: Option<String>,
    /// morning | afternoon | evening
    #[arg(long, value_parser = parse_time_of_day)]
    time_of_day: Option<TimeOfDay>,
    /// 0 = Sunday .. 6 = Saturday
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
    day_of_week: Option<u8>,
    #[arg(long)]
    rush: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quote(args) => run_quote(args),
    }
}

fn parse_service_type(raw: &str) -> Result<ServiceType, String> {
    ServiceType::from_str(raw)
}

fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    Frequency::from_str(raw)
}

fn parse_time_of_day(raw: &str) -> Result<TimeOfDay, String> {
    TimeOfDay::from_str(raw)
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.roster_csv.take() {
        config.roster.csv_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let crews = match &config.roster.csv_path {
        Some(path) => {
            let crews = RosterCsvImporter::from_path(path)?;
            info!(count = crews.len(), path = %path.display(), "roster loaded from CSV export");
            crews
        }
        None => seed::demo_roster(),
    };

    let roster = Arc::new(InMemoryRoster::new(crews));
    let alerts = Arc::new(LogAlerts);
    let api = BookingApi {
        quotes: Arc::new(QuoteEngine::default()),
        dispatch: Arc::new(DispatchService::new(roster, alerts)),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(booking_router(api))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "booking core ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        bedrooms,
        bathrooms,
        square_feet,
        service_type,
        frequency,
        add_ons,
        location,
        time_of_day,
        day_of_week,
        rush,
    } = args;

    let engine = QuoteEngine::default();
    let request = QuoteRequest {
        bedrooms,
        bathrooms,
        square_feet,
        service_type,
        frequency,
        add_ons,
        location,
        time_of_day,
        day_of_week,
        rush_service: rush,
    };

    let quote = engine.quote(&request);
    let comparison = engine.competitor_comparison(quote.total);

    println!("Quote for a {}", request.service_type.label());
    println!(
        "{} bed / {} bath, {} sqft",
        request.bedrooms, request.bathrooms, request.square_feet
    );

    println!("\nBreakdown");
    println!("- base:     ${:.2}", quote.breakdown.base);
    println!("- rooms:    ${:.2}", quote.breakdown.rooms);
    println!("- sqft:     ${:.2}", quote.breakdown.sqft);
    println!("- location: ${:.2}", quote.breakdown.location);
    println!("- timing:   ${:.2}", quote.breakdown.timing);

    println!("\nSubtotal:  ${:.2}", quote.subtotal);
    println!("Add-ons:   ${:.2}", quote.add_ons_total);
    println!("Surcharge: ${:.2}", quote.surcharge);
    println!("Discount:  -${:.2}", quote.discount);
    println!("Total:     ${:.0}", quote.total);
    if quote.savings > 0.0 {
        println!("You save:  ${:.0}", quote.savings);
    }

    println!("\nHow we compare");
    for competitor in &comparison.competitors {
        println!("- {}: ${:.0}", competitor.tier, competitor.price);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
