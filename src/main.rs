use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

mod chart;
mod config;
mod dashboard;
mod espn;
mod excitement;
mod output;
mod pipeline;

use config::{Command, Config};
use dashboard::AppState;
use espn::EspnClient;
use excitement::ExcitementModel;
use pipeline::GatherOptions;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    match config.command.clone() {
        Command::Analyze { input_file } => run_analyze(&input_file),
        Command::Plot { input_file, output } => run_plot(&input_file, &output),
        Command::Daily { date } => run_daily(&config, date).await,
        Command::Weekly {
            days,
            output_dir,
            charts,
            serve,
        } => run_weekly(&config, days, output_dir, charts, serve).await,
    }
}

fn build_client(config: &Config) -> Result<EspnClient> {
    EspnClient::new(
        &config.scoreboard_url,
        &config.summary_url,
        Duration::from_secs(config.http_timeout_secs),
        config.max_retries,
    )
}

/// Read the `winprobability` list out of a saved summary payload.
fn load_plays(path: &Path) -> Result<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut payload: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    match payload.get_mut("winprobability") {
        Some(serde_json::Value::Array(plays)) => Ok(std::mem::take(plays)),
        Some(_) => anyhow::bail!("'winprobability' must be a list"),
        None => anyhow::bail!("JSON is missing the top-level 'winprobability' field"),
    }
}

/// Score a single saved summary payload.
fn run_analyze(path: &Path) -> Result<()> {
    let plays = load_plays(path)?;
    let series = excitement::validate(&plays)?;
    let analysis = excitement::score(&series)?;
    println!("{}", output::format_analysis(&analysis));
    Ok(())
}

/// Chart a single saved summary payload.
fn run_plot(path: &Path, output: &Path) -> Result<()> {
    let plays = load_plays(path)?;
    let series = excitement::validate(&plays)?;
    let analysis = excitement::score(&series)?;
    let title = format!(
        "Win probability trend: {} ({:.2}/10)",
        analysis.verdict, analysis.score
    );
    chart::render_chart(output, &title, &series, &chart::play_labels(&plays))?;
    println!("Saved win probability chart to {}", output.display());
    Ok(())
}

async fn run_daily(config: &Config, date: Option<NaiveDate>) -> Result<()> {
    let date = config.daily_date(date, Utc::now());
    let client = build_client(config)?;
    let model = ExcitementModel::default();

    let options = GatherOptions {
        max_concurrent: config.max_concurrent_fetches,
        chart_dir: None,
    };

    let harvest = pipeline::gather_day(&client, &model, date, &options).await?;
    if harvest.games_found == 0 {
        println!("No games found for {}.", date);
        return Ok(());
    }

    let ranked = harvest.report.day(Some(date));
    if ranked.is_empty() {
        println!("No excitement data available for {}.", date);
        return Ok(());
    }
    println!("{}", output::format_rankings(date, ranked));
    Ok(())
}

async fn run_weekly(
    config: &Config,
    days: u32,
    output_dir: PathBuf,
    charts: bool,
    serve: Option<SocketAddr>,
) -> Result<()> {
    let dates = config.weekly_dates(days, Utc::now());
    let client = build_client(config)?;
    let model = ExcitementModel::default();
    info!("Gathering {} day(s) of games", dates.len());

    let options = GatherOptions {
        max_concurrent: config.max_concurrent_fetches,
        chart_dir: charts.then(|| output_dir.clone()),
    };

    let harvest = pipeline::gather_days(&client, &model, &dates, &options).await?;

    println!("{}", output::format_notes(&harvest.notes));
    if harvest.report.is_empty() {
        println!("No results to summarize.");
        return Ok(());
    }

    let summary = dashboard::build_summary(&harvest.report, charts);
    let html = dashboard::render_dashboard(&harvest.report, charts);
    let (summary_path, dashboard_path) = dashboard::write_outputs(&output_dir, &summary, &html)?;
    println!("\nSaved summary JSON to {}", summary_path.display());
    println!("Saved dashboard to {}", dashboard_path.display());
    if charts {
        println!("Charts saved next to the dashboard; open them manually if you want spoilers.");
    }

    if let Some(addr) = serve {
        let app = dashboard::router(AppState {
            html,
            summary,
            notes: harvest.notes,
        });
        info!("Dashboard listening on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;
    }
    Ok(())
}
