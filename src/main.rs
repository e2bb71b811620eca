use aggregator::{AggregateView, Availability, DashboardService, SourceOutcome};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{MetricWindow, Settings};
use std::path::PathBuf;
use web_server::Service;

/// The main entry point for the Vendas sales-management services.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the defaults cover a local setup.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = configuration::load_config_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Dashboard(args) => handle_dashboard(args, settings).await,
        Commands::Health => handle_health(settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Products, customers and sales services plus the dashboard that aggregates them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to `vendas.toml` if present).
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one of the HTTP servers, or all four in this process.
    Serve(ServeArgs),
    /// Fetch every source once and print the aggregated view.
    Dashboard(DashboardArgs),
    /// Health-check every source.
    Health,
}

#[derive(Parser)]
struct ServeArgs {
    #[arg(value_enum)]
    service: ServiceArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceArg {
    Products,
    Customers,
    Sales,
    Dashboard,
    All,
}

#[derive(Parser)]
struct DashboardArgs {
    /// Which sales the revenue figures cover; overrides `dashboard.window`.
    #[arg(long, value_enum)]
    window: Option<MetricWindow>,

    /// Print the view as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, settings: Settings) -> anyhow::Result<()> {
    let service = match args.service {
        ServiceArg::Products => Service::Products,
        ServiceArg::Customers => Service::Customers,
        ServiceArg::Sales => Service::Sales,
        ServiceArg::Dashboard => Service::Dashboard,
        ServiceArg::All => {
            tokio::try_join!(
                web_server::run_service(Service::Products, &settings),
                web_server::run_service(Service::Customers, &settings),
                web_server::run_service(Service::Sales, &settings),
                web_server::run_service(Service::Dashboard, &settings),
            )?;
            return Ok(());
        }
    };
    web_server::run_service(service, &settings).await
}

async fn handle_dashboard(args: DashboardArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(window) = args.window {
        settings.dashboard.window = window;
    }
    let dashboard = DashboardService::from_settings(&settings)?;
    let view = dashboard.load().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

async fn handle_health(settings: Settings) -> anyhow::Result<()> {
    let dashboard = DashboardService::from_settings(&settings)?;
    let health = dashboard.health().await;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Source", "Status", "Service", "Checked at / Reason"]);
    for (source, outcome) in &health {
        let row = match outcome {
            SourceOutcome::Success(status) => vec![
                source.to_string(),
                status.status.clone(),
                status.service.clone(),
                status.timestamp.to_rfc3339(),
            ],
            SourceOutcome::Failure(reason) => vec![
                source.to_string(),
                "DOWN".to_string(),
                source.service_name().to_string(),
                reason.to_string(),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

fn print_view(view: &AggregateView) {
    let mut sources = Table::new();
    sources
        .load_preset(UTF8_FULL)
        .set_header(vec!["Source", "Status", "Records", "Reason"]);
    for (source, availability) in &view.sources {
        let status = match availability.status {
            Availability::Online => "online",
            Availability::Offline => "OFFLINE",
        };
        let reason = availability
            .reason
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_default();
        sources.add_row(vec![
            source.to_string(),
            status.to_string(),
            availability.total.to_string(),
            reason,
        ]);
    }
    println!("{sources}");

    let summary = &view.summary;
    let mut totals = Table::new();
    totals.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    totals.add_row(vec!["Window".to_string(), format!("{:?}", view.window)]);
    totals.add_row(vec!["Records".to_string(), summary.total_records.to_string()]);
    totals.add_row(vec!["Revenue".to_string(), summary.revenue.to_string()]);
    totals.add_row(vec!["Average ticket".to_string(), summary.average_ticket.to_string()]);
    totals.add_row(vec!["Largest sale".to_string(), summary.largest_sale.to_string()]);
    totals.add_row(vec!["Catalog value".to_string(), summary.catalog_value.to_string()]);
    println!("{totals}");

    if summary.partial {
        println!(
            "Partial view: {} source(s) offline; totals cover online sources only.",
            summary.offline_sources
        );
    }
}
