use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};

use adintel::config::{Cli, Command, ServeOptions, Settings};
use adintel::dashboard::DashboardService;
use adintel::http::{self, AppState};
use adintel::ingest;
use adintel::insight_actor::seed::sample_insights;
use adintel::metrics::{self, DerivedMetrics};
use adintel::predictor::{PredictionService, Predictor};
use adintel::runtime::{setup_tracing, DashboardSystem};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    setup_tracing(&cli.log_level);

    if let Command::Roi { gain, cost } = cli.command {
        if cost == 0.0 {
            bail!("cost of investment cannot be zero");
        }
        println!("ROI: {:.2}%", metrics::roi(gain, cost));
        return Ok(());
    }

    let settings = cli.settings()?;
    let system = DashboardSystem::start(&settings).context("cannot open the database")?;

    let outcome = match cli.command {
        Command::Serve(opts) => serve(&system, &opts).await,
        Command::InitDb => {
            println!("Tables ready in {}", settings.database);
            Ok(())
        }
        Command::SeedInsights => seed_insights(&system).await,
        Command::LoadCsv { path, chunk_size } => load_csv(&system, &path, chunk_size).await,
        Command::Report => report(&system, &settings).await,
        Command::Roi { .. } => Ok(()),
    };

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    outcome
}

async fn serve(system: &DashboardSystem, opts: &ServeOptions) -> anyhow::Result<()> {
    let predictor = match Predictor::load(&opts.model_path) {
        Ok(predictor) => Some(predictor),
        Err(e) => {
            warn!(error = %e, "Prediction model unavailable; /predict will answer 503");
            None
        }
    };

    let campaigns = system.campaign_client.clone();
    let dashboard = DashboardService::new(campaigns.clone(), system.insight_client.clone(), opts.dashboard_settings()?);
    let simulator = opts
        .simulator_interval()
        .and_then(|every| dashboard.start_simulator(every));

    let state = AppState {
        predictions: PredictionService::new(campaigns.clone(), predictor),
        campaigns,
        dashboard,
    };
    http::serve_with_simulator(opts.listen_addr, state, simulator, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn seed_insights(system: &DashboardSystem) -> anyhow::Result<()> {
    let written = system.insight_client.replace_all(sample_insights()).await?;
    println!("Inserted {written} rows into predictive_insights");
    Ok(())
}

async fn load_csv(system: &DashboardSystem, path: &Path, chunk_size: usize) -> anyhow::Result<()> {
    let summary = ingest::load_csv_file(path, &system.campaign_client, chunk_size).await?;
    println!(
        "Read {} rows: {} inserted, {} duplicates skipped, {} invalid",
        summary.rows_read, summary.inserted, summary.duplicates, summary.invalid
    );
    Ok(())
}

async fn report(system: &DashboardSystem, settings: &Settings) -> anyhow::Result<()> {
    let totals = system.campaign_client.totals().await?;
    if totals.rows == 0 {
        println!("No rows in the campaigns table ({})", settings.database);
        return Ok(());
    }
    let derived = DerivedMetrics::compute(
        totals.cost,
        totals.sale_amount,
        totals.impressions,
        totals.clicks,
        totals.conversions,
    );

    println!("Rows:         {}", totals.rows);
    println!("Campaigns:    {}", totals.campaigns);
    println!("Impressions:  {}", totals.impressions);
    println!("Clicks:       {}", totals.clicks);
    println!("Conversions:  {}", totals.conversions);
    println!("Cost:         {:.2}", totals.cost);
    println!("Revenue:      {:.2}", totals.sale_amount);
    if totals.impressions == 0 {
        println!("CTR:          n/a (no impressions)");
    } else {
        println!("CTR:          {:.2}%", derived.ctr);
    }
    if totals.cost == 0.0 {
        println!("ROI:          n/a (no cost)");
    } else {
        println!("ROI:          {:.2}%", derived.roi);
    }
    Ok(())
}
