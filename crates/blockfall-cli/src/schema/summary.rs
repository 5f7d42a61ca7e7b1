use blockfall_engine::{GameStats, ShapeSeed, StageConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a headless run, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp when the run finished (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed used for shape generation; replays the same shapes
    pub seed: ShapeSeed,
    /// Stage number the run was played on
    pub stage: usize,
    pub stage_config: StageConfig,
    /// Final game statistics
    pub final_stats: GameStats,
    /// Number of frames played
    pub frames: u64,
    /// Whether the run ended by game over rather than the frame limit
    pub game_over: bool,
}
