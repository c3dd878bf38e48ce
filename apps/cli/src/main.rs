#![deny(warnings)]

//! Headless CLI that runs an automated farm session and reports KPIs.

use anyhow::{bail, Context, Result};
use farm_core::{FarmConfig, PlotStatus};
use farm_runtime::{Session, SessionView};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: cli [--config PATH] [--days N] [--realtime SECS] [--buy ID:QTY]... [--json] [--version]";

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    days: Option<u32>,
    realtime_secs: Option<u64>,
    buys: Vec<(String, u32)>,
    json: bool,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--days" => {
                let v = it.next().context("--days needs a value")?;
                args.days = Some(v.parse().with_context(|| format!("bad --days: {v}"))?);
            }
            "--realtime" => {
                let v = it.next().context("--realtime needs a value")?;
                args.realtime_secs =
                    Some(v.parse().with_context(|| format!("bad --realtime: {v}"))?);
            }
            "--buy" => {
                let v = it.next().context("--buy needs ID:QTY")?;
                args.buys.push(parse_buy(&v)?);
            }
            "--json" => args.json = true,
            "--version" => args.version = true,
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(args)
}

fn parse_buy(arg: &str) -> Result<(String, u32)> {
    let Some((id, qty)) = arg.split_once(':') else {
        bail!("bad --buy {arg}, expected ID:QTY");
    };
    let qty = qty
        .parse()
        .with_context(|| format!("bad quantity in --buy {arg}"))?;
    Ok((id.to_string(), qty))
}

fn run_fast(config: FarmConfig, args: &Args) -> Result<SessionView> {
    let now = Instant::now();
    let mut session = Session::new(config, now)?;
    for (id, qty) in &args.buys {
        if let Err(e) = session.buy_seed(id, *qty, now) {
            warn!(produce = %id, quantity = qty, error = %e, "purchase failed");
        }
    }
    let days = args.days.unwrap_or(7);
    let reports = session.run_days(days, now);
    info!(days, automated = reports.len(), "fast-forward complete");
    Ok(session.view(now))
}

async fn run_realtime(config: FarmConfig, args: &Args, secs: u64) -> Result<SessionView> {
    let session = Session::new(config, Instant::now())?;
    let (handle, task) = farm_runtime::spawn(session);
    for (id, qty) in &args.buys {
        if let Err(e) = handle.buy_seed(id, *qty).await {
            warn!(produce = %id, quantity = qty, error = %e, "purchase failed");
        }
    }
    tokio::time::sleep(Duration::from_secs(secs)).await;
    let view = handle.view().await?;
    handle.shutdown().await?;
    let session = task.await.context("session task panicked")?;
    info!(day = session.day(), "real-time run complete");
    Ok(view)
}

fn print_summary(view: &SessionView) {
    let count = |status: PlotStatus| view.plots.iter().filter(|p| p.status == status).count();
    println!(
        "Farm OK | day: {} {:02}:00 | week: {} (day {}) | cash: ${} | growing: {} | ready: {} | empty: {}",
        view.day,
        view.hour,
        view.week,
        view.day_of_week,
        view.cash,
        count(PlotStatus::Growing),
        count(PlotStatus::ReadyForHarvest),
        count(PlotStatus::Empty),
    );
    let s = &view.stats;
    println!(
        "KPI | days automated: {} | harvested: {} | planted: {} | seeds bought: {} (${}) | weeks settled: {} | earnings: ${}",
        s.days_automated,
        s.plots_harvested,
        s.seeds_planted,
        s.seeds_bought,
        s.seed_spend,
        s.weeks_settled,
        s.sales_earnings,
    );
    if let Some(text) = &view.notification {
        println!("---\n{text}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    if args.version {
        println!("farm cli {} ({})", env!("CARGO_PKG_VERSION"), env!("FARM_GIT_SHA"));
        return Ok(());
    }
    info!(config = ?args.config, days = ?args.days, realtime = ?args.realtime_secs, "starting CLI");

    let config = match &args.config {
        Some(path) => {
            FarmConfig::load(path).with_context(|| format!("loading config {path}"))?
        }
        None => FarmConfig::default(),
    };

    let view = match args.realtime_secs {
        Some(secs) => run_realtime(config, &args, secs).await?,
        None => run_fast(config, &args)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_summary(&view);
    }
    Ok(())
}
