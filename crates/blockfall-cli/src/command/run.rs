use std::path::PathBuf;

use anyhow::Context;
use blockfall_engine::{GameSession, ShapeSeed, StepOutcome};
use chrono::Utc;
use rand::Rng as _;

use crate::{
    agent::RandomAgent,
    schema::summary::RunSummary,
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Stage number (1-based; past the last stage uses the last one)
    #[arg(long, default_value_t = 1)]
    stage: usize,
    /// Shape seed as 32 hex digits; random when omitted
    #[arg(long)]
    seed: Option<ShapeSeed>,
    /// Stage table JSON file to use instead of the built-in one
    #[arg(long)]
    stages: Option<PathBuf>,
    /// Stop after this many frames even if the game is not over
    #[arg(long, default_value_t = 100_000)]
    max_frames: u64,
    /// Frames per second used to convert tick intervals to frames
    #[arg(long, default_value_t = 65)]
    fps: u64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the final field to stderr
    #[arg(long)]
    show_board: bool,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        stage,
        seed,
        stages,
        max_frames,
        fps,
        output,
        show_board,
    } = arg;

    let table = util::load_stage_table(stages.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut session = GameSession::with_seed(*fps, table, seed);
    session.select_stage(*stage);
    session.start();

    let stage_config = session.stage_config().clone();
    let mut agent = RandomAgent::new(stage_config.action_limit, stage_config.hold_enabled);
    let mut rng = rand::rng();

    while session.total_frames() < *max_frames && !session.state().is_game_over() {
        agent.act(&mut session, &mut rng);
        if let StepOutcome::Locked(report) = session.increment_frame() {
            for write in &report.skipped_writes {
                eprintln!("Skipped block outside the field: {write}");
            }
            agent.piece_locked();
        }
    }

    let sim = session
        .simulation()
        .context("game session did not start")?;
    if *show_board {
        eprintln!("{}", sim.field());
    }
    let stats = sim.stats();
    eprintln!(
        "Stage {}: score {}, level {}, {} lines in {} pieces ({:.1}s)",
        session.stage(),
        stats.score(),
        stats.level(),
        stats.total_cleared_lines(),
        stats.completed_pieces(),
        session.duration().as_secs_f64(),
    );

    let summary = RunSummary {
        recorded_at: Utc::now(),
        seed,
        stage: session.stage(),
        stage_config,
        final_stats: stats.clone(),
        frames: session.total_frames(),
        game_over: session.state().is_game_over(),
    };
    util::write_json(&summary, output.as_deref())
}
