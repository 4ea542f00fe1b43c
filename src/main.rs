//! TOURSCORE — golf competition scoring engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! loads the data snapshot and either serves the HTTP API or prints a
//! standings report for every tour in the snapshot.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use tourscore::api;
use tourscore::config;
use tourscore::scoring::handicap::HandicapCalculator;
use tourscore::scoring::ScoringEngine;
use tourscore::storage::SnapshotStore;
use tourscore::types::TourStandings;

const BANNER: &str = r#"
 _____ ___  _   _ ____  ____   ____ ___  ____  _____
|_   _/ _ \| | | |  _ \/ ___| / ___/ _ \|  _ \| ____|
  | || | | | | | | |_) \___ \| |  | | | | |_) |  _|
  | || |_| | |_| |  _ < ___) | |__| |_| |  _ <| |___
  |_| \___/ \___/|_| \_\____/ \____\___/|_| \_\_____|

  Handicaps, leaderboards and tour standings
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        snapshot = %cfg.data.snapshot_path,
        slope_reference = cfg.engine.slope_reference,
        default_course_rating = %cfg.engine.default_course_rating,
        server_enabled = cfg.server.enabled,
        "TOURSCORE starting up"
    );

    let store = SnapshotStore::open(&cfg.data.snapshot_path)?;
    let engine = ScoringEngine::new(store, HandicapCalculator::new(cfg.handicap_config()));

    if cfg.server.enabled {
        api::serve(Arc::new(engine), cfg.server.port).await?;
        info!("TOURSCORE shut down cleanly.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let tour_ids: Vec<i64> = engine.source().snapshot().tours.iter().map(|t| t.id).collect();
    for tour_id in tour_ids {
        match engine.tour_standings(tour_id, None, None, today) {
            Ok(standings) => print_standings(&standings),
            Err(e) => error!(tour_id, error = %e, "Standings failed"),
        }
    }

    Ok(())
}

/// Print a plain-text standings table.
fn print_standings(standings: &TourStandings) {
    println!(
        "\n{} ({} scoring, {} competitions)",
        standings.tour.name, standings.scoring_mode, standings.total_competitions
    );
    println!("{:>4}  {:<28} {:>8} {:>6}", "Pos", "Player", "Points", "Played");
    for player in &standings.player_standings {
        println!(
            "{:>4}  {:<28} {:>8} {:>6}",
            player.position,
            player.player_name,
            player.total_points.normalize(),
            player.competitions_played
        );
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tourscore=info"));

    let json_logging = std::env::var("TOURSCORE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
