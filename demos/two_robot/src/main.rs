//! two_robot — one red and one blue robot playing random rollouts.
//!
//! Episodes run in parallel on a rayon pool, each on a `GameServer` borrowed
//! from a shared `ServerPool`.  Episode 0 is then replayed with CSV output,
//! and every episode summary is written to `summary.json`.
//!
//! ```text
//! cargo run -p two_robot --release -- [episodes]
//! ```

mod field;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ms_core::EngineContext;
use ms_motion::GridPlanner;
use ms_output::{CsvWriter, MatchOutputObserver};
use ms_sched::{
    AllianceDifferential, EpisodeSummary, MatchObserver, NoopObserver, RandomPolicy, SchedulerBuilder,
    SchedulerConfig,
};
use ms_server::{
    load_roster, Game, GameServer, RosterEntry, ServerConfig, ServerPool, ServerTemplate,
};

use field::build_game;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:             u64   = 42;
const DEFAULT_EPISODES: u64   = 16;
const OUTPUT_DIR:       &str  = "output/two_robot";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn scheduler_config(episode: u64) -> SchedulerConfig {
    SchedulerConfig { seed: SEED.wrapping_add(episode), ..SchedulerConfig::default() }
}

fn template(game: Arc<Game>, roster: Vec<RosterEntry>) -> ServerTemplate<GridPlanner> {
    ServerTemplate {
        game,
        planner: GridPlanner::default(),
        config:  ServerConfig::default(),
        ctx:     EngineContext::new(SEED),
        roster,
    }
}

/// Play one episode on a pooled server.  The server goes back to the pool
/// whether or not the episode succeeds.
fn run_episode<O: MatchObserver>(
    pool:     &ServerPool<GridPlanner>,
    config:   SchedulerConfig,
    observer: &mut O,
) -> Result<EpisodeSummary> {
    let mut server = pool.acquire()?;
    let result = play(&mut server, config, observer);
    pool.release(server);
    result
}

fn play<O: MatchObserver>(
    server:   &mut GameServer<GridPlanner>,
    config:   SchedulerConfig,
    observer: &mut O,
) -> Result<EpisodeSummary> {
    let mut sched = SchedulerBuilder::new(config).reward(AllianceDifferential).build(server)?;
    Ok(sched.run_episode(server, &mut RandomPolicy::new(), observer)?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let episodes = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("bad episode count {arg:?}"))?,
        None => DEFAULT_EPISODES,
    };

    // 1. Field and roster.
    let roster_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/roster.csv");
    let roster = load_roster(&roster_path).with_context(|| format!("loading {}", roster_path.display()))?;
    let game = Arc::new(build_game()?);
    info!(robots = roster.len(), interactables = game.registry().len(), "field ready");

    // 2. Server pool, one idle server per worker thread.
    let pool = ServerPool::new(template(game, roster), rayon::current_num_threads());

    // 3. Parallel rollouts.
    let t0 = Instant::now();
    let summaries: Vec<EpisodeSummary> = (0..episodes)
        .into_par_iter()
        .map(|ep| run_episode(&pool, scheduler_config(ep), &mut NoopObserver))
        .collect::<Result<_>>()?;
    let stats = pool.get_stats();
    info!(
        episodes,
        elapsed_s = t0.elapsed().as_secs_f64(),
        servers_built = stats.created,
        acquired = stats.acquired,
        "rollouts complete"
    );

    // 4. Replay episode 0 with CSV output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = MatchOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);
    let replay = run_episode(&pool, scheduler_config(0), &mut obs)?;
    obs.finish()?;
    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output error");
    }
    if let Some(first) = summaries.first() {
        if first != &replay {
            warn!("replay of episode 0 diverged from the parallel run");
        }
    }

    // 5. Summary.
    let out = BufWriter::new(File::create(Path::new(OUTPUT_DIR).join("summary.json"))?);
    serde_json::to_writer_pretty(out, &summaries)?;

    println!("{:<8} {:>6} {:>9} {:>5} {:>5}", "Episode", "Steps", "End (s)", "Red", "Blue");
    println!("{}", "-".repeat(37));
    for (ep, s) in summaries.iter().enumerate() {
        println!(
            "{:<8} {:>6} {:>9.1} {:>5} {:>5}",
            ep,
            s.steps,
            s.end_time.as_secs_f64(),
            s.score.red,
            s.score.blue,
        );
    }
    let red_wins = summaries.iter().filter(|s| s.score.red > s.score.blue).count();
    let blue_wins = summaries.iter().filter(|s| s.score.blue > s.score.red).count();
    println!();
    println!("red wins {red_wins}, blue wins {blue_wins}, ties {}", summaries.len() - red_wins - blue_wins);

    Ok(())
}
