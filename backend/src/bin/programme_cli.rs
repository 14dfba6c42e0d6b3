//! Programme CLI
//!
//! Loads a JSON seed into the in-memory repository and prints predictions as JSON.
//!
//! # Usage
//!
//! ```bash
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- view alice
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- view alice 2024-01-15T00:00:00Z next
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- global 5
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- heatmap shroud
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- stats shroud
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- predict shroud 3
//! PROGRAMME_SEED=seed.json cargo run --bin programme-cli -- rank 20
//! ```
//!
//! # Environment Variables
//!
//! - `PROGRAMME_CONFIG`: path to a `programme.toml` (default: search standard locations)
//! - `PROGRAMME_SEED`: path to a JSON seed file for the in-memory repository
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stream_programme::db::{LocalRepository, LocalSeed, ProgrammeConfig, RepositoryType};
use stream_programme::models::{navigate_week_str, StreamerId, UserId};
use stream_programme::services::{
    CalendarGridBuilder, Clock, ProgrammePredictor, RequestContext, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let repo_type: RepositoryType = config.repository_type().map_err(anyhow::Error::msg)?;
    info!("Using {:?} repository", repo_type);

    let repo = Arc::new(load_repository()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let predictor = ProgrammePredictor::from_config(repo.clone(), clock.clone(), &config)?;
    let calendar = CalendarGridBuilder::new(repo);
    let ctx = RequestContext::new().with_optional_timeout(config.request_timeout());

    let args: Vec<String> = env::args().skip(1).collect();
    let arg = |i: usize| args.get(i).map(String::as_str);

    match arg(0) {
        Some("view") => {
            let user = UserId::new(arg(1).unwrap_or_default());
            let week = parse_week(arg(2), arg(3), clock.as_ref())?;
            let programme = predictor.programme_view(&ctx, &user, &week).await?;
            print_json(&calendar.build_calendar(&ctx, &programme).await?)?;
        }
        Some("global") => {
            let limit = parse_or(arg(1), 0)?;
            let week = parse_week(None, None, clock.as_ref())?;
            let programme = predictor
                .generate_global_programme(&ctx, &week, limit)
                .await?;
            print_json(&calendar.build_calendar(&ctx, &programme).await?)?;
        }
        Some("heatmap") => {
            let streamer = required_streamer(arg(1))?;
            print_json(&predictor.heatmaps().generate_heatmap(&ctx, &streamer).await?)?;
        }
        Some("stats") => {
            let streamer = required_streamer(arg(1))?;
            print_json(&predictor.heatmaps().activity_stats(&ctx, &streamer).await?)?;
        }
        Some("predict") => {
            let streamer = required_streamer(arg(1))?;
            let day = parse_or(arg(2), 0)?;
            print_json(&predictor.predicted_live_time(&ctx, &streamer, day).await?)?;
        }
        Some("rank") => {
            let limit = parse_or(arg(1), 0)?;
            print_json(&predictor.ranker().ranked_streamers(&ctx, limit).await?)?;
        }
        Some(other) => bail!("unknown command '{}'", other),
        None => bail!("usage: programme-cli <view|global|heatmap|stats|predict|rank> [args]"),
    }

    Ok(())
}

fn load_config() -> anyhow::Result<ProgrammeConfig> {
    if let Ok(path) = env::var("PROGRAMME_CONFIG") {
        return ProgrammeConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path));
    }
    Ok(ProgrammeConfig::from_default_location().unwrap_or_else(|e| {
        info!("Using default configuration ({})", e);
        ProgrammeConfig::default()
    }))
}

fn load_repository() -> anyhow::Result<LocalRepository> {
    let Ok(path) = env::var("PROGRAMME_SEED") else {
        info!("No PROGRAMME_SEED set, starting with an empty repository");
        return Ok(LocalRepository::new());
    };
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("reading seed file {}", path))?;
    let seed: LocalSeed =
        serde_json::from_str(&content).with_context(|| format!("parsing seed file {}", path))?;
    info!(
        "Seeded repository from {}: {} streamers, {} activity samples",
        path,
        seed.streamers.len(),
        seed.activities.len()
    );
    Ok(LocalRepository::from_seed(seed))
}

fn parse_week(
    week: Option<&str>,
    direction: Option<&str>,
    clock: &dyn Clock,
) -> anyhow::Result<DateTime<FixedOffset>> {
    let week = match week {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid week '{}', expected RFC 3339", raw))?,
        None => clock.now().fixed_offset(),
    };
    Ok(navigate_week_str(&week, direction.unwrap_or("")))
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid number '{}'", raw)),
        None => Ok(default),
    }
}

fn required_streamer(value: Option<&str>) -> anyhow::Result<StreamerId> {
    match value {
        Some(id) => Ok(StreamerId::new(id)),
        None => bail!("missing streamer ID"),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
