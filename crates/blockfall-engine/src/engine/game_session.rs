use std::time::Duration;

use rand::Rng as _;

use crate::{Direction, FieldConfig, ShapeGenerator, ShapeSeed};

use super::{
    simulation::{Simulation, StepOutcome, Tick},
    stage::{StageConfig, StageTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDropOn,
    SoftDropOff,
    Hold,
}

/// Gravity intervals.
///
/// The normal interval shrinks by `level_decrement` per level down to
/// `min_interval`; the fast interval is used while soft drop is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTiming {
    pub base_interval: Duration,
    pub level_decrement: Duration,
    pub min_interval: Duration,
    pub fast_interval: Duration,
}

impl Default for TickTiming {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(300),
            level_decrement: Duration::from_millis(20),
            min_interval: Duration::from_millis(50),
            fast_interval: Duration::from_millis(30),
        }
    }
}

impl TickTiming {
    #[must_use]
    pub fn normal_interval(&self, level: usize) -> Duration {
        let level = u32::try_from(level).unwrap_or(u32::MAX);
        self.base_interval
            .saturating_sub(self.level_decrement.saturating_mul(level))
            .max(self.min_interval)
    }
}

fn interval_frames(interval: Duration, fps: u64) -> u64 {
    let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    (millis.saturating_mul(fps) / 1000).max(1)
}

/// Frame-driven game session.
///
/// Owns the stage selection, the menu/playing/paused/game-over state and the
/// two gravity countdowns, and forwards player intents to the [`Simulation`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameSession, Intent, SessionState, StageTable};
///
/// let mut session = GameSession::new(60, StageTable::default());
/// assert_eq!(session.state(), SessionState::Menu);
///
/// session.select_stage(3);
/// session.start();
/// session.handle_intent(Intent::MoveLeft);
/// for _ in 0..60 {
///     session.increment_frame();
/// }
/// assert_eq!(session.state(), SessionState::Playing);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    stages: StageTable,
    stage: usize,
    stage_config: StageConfig,
    field_config: FieldConfig,
    timing: TickTiming,
    fixed_seed: Option<ShapeSeed>,
    seed: Option<ShapeSeed>,
    simulation: Option<Simulation>,
    state: SessionState,
    fps: u64,
    total_frames: u64,
    normal_frames: u64,
    fast_frames: u64,
}

impl GameSession {
    /// Creates a session in the menu, on stage 1.
    ///
    /// Every game started from it draws a fresh random seed.
    #[must_use]
    pub fn new(fps: u64, stages: StageTable) -> Self {
        let stage_config = stages.get(1).clone();
        let field_config = Self::board_of(&stage_config);
        Self {
            stages,
            stage: 1,
            stage_config,
            field_config,
            timing: TickTiming::default(),
            fixed_seed: None,
            seed: None,
            simulation: None,
            state: SessionState::Menu,
            fps: fps.max(1),
            total_frames: 0,
            normal_frames: 0,
            fast_frames: 0,
        }
    }

    /// Like [`Self::new`], but every game replays the shape sequence of `seed`.
    #[must_use]
    pub fn with_seed(fps: u64, stages: StageTable, seed: ShapeSeed) -> Self {
        Self {
            fixed_seed: Some(seed),
            ..Self::new(fps, stages)
        }
    }

    #[must_use]
    pub fn with_timing(self, timing: TickTiming) -> Self {
        Self { timing, ..self }
    }

    fn board_of(stage: &StageConfig) -> FieldConfig {
        stage
            .field_config()
            .expect("stage tables only hold valid boards")
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn stage(&self) -> usize {
        self.stage
    }

    #[must_use]
    pub fn stage_config(&self) -> &StageConfig {
        &self.stage_config
    }

    #[must_use]
    pub fn field_config(&self) -> FieldConfig {
        self.field_config
    }

    #[must_use]
    pub fn timing(&self) -> &TickTiming {
        &self.timing
    }

    /// Seed of the current game, if one has been started.
    #[must_use]
    pub fn seed(&self) -> Option<ShapeSeed> {
        self.seed
    }

    #[must_use]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Play time of the current game.
    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let secs = self.total_frames / self.fps;
        let nanos = (self.total_frames % self.fps) * NANOS_PER_SEC / self.fps;
        Duration::new(secs, u32::try_from(nanos).expect("sub-second nanos fit in u32"))
    }

    /// Starts a new game on the selected stage, discarding any current one.
    pub fn start(&mut self) {
        let seed = self.fixed_seed.unwrap_or_else(|| rand::rng().random());
        let generator = ShapeGenerator::with_seed(seed, &self.stage_config.allowed_shapes);
        self.simulation = Some(Simulation::new(self.field_config, generator));
        self.seed = Some(seed);
        self.state = SessionState::Playing;
        self.total_frames = 0;
        self.normal_frames = interval_frames(self.timing.normal_interval(0), self.fps);
        self.fast_frames = interval_frames(self.timing.fast_interval, self.fps);
    }

    /// Switches to another stage; a running game restarts on the new board.
    pub fn select_stage(&mut self, stage: usize) {
        self.stage = stage.clamp(1, self.stages.len());
        self.stage_config = self.stages.get(self.stage).clone();
        self.field_config = Self::board_of(&self.stage_config);
        if self.state.is_playing() || self.state.is_paused() {
            self.start();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state @ (SessionState::Menu | SessionState::GameOver) => state,
        };
    }

    /// Applies a player intent. Returns whether it changed anything.
    pub fn handle_intent(&mut self, intent: Intent) -> bool {
        let Some(sim) = self.simulation.as_mut().filter(|_| self.state.is_playing()) else {
            return false;
        };
        match intent {
            Intent::MoveLeft => sim.move_piece(Direction::Left),
            Intent::MoveRight => sim.move_piece(Direction::Right),
            Intent::Rotate => sim.rotate(),
            Intent::SoftDropOn => {
                sim.set_soft_drop(true);
                true
            }
            Intent::SoftDropOff => {
                sim.set_soft_drop(false);
                true
            }
            Intent::Hold => self.stage_config.hold_enabled && sim.hold().is_ok(),
        }
    }

    /// Advances one frame, delivering any gravity ticks that are due.
    ///
    /// Returns the outcome of the tick that acted, or [`StepOutcome::Idle`].
    pub fn increment_frame(&mut self) -> StepOutcome {
        let Some(sim) = self.simulation.as_mut().filter(|_| self.state.is_playing()) else {
            return StepOutcome::Idle;
        };
        self.total_frames += 1;

        let mut outcome = StepOutcome::Idle;
        self.normal_frames = self.normal_frames.saturating_sub(1);
        let normal_due = self.normal_frames == 0;
        if normal_due {
            outcome = sim.step(Tick::Normal);
        }
        self.fast_frames = self.fast_frames.saturating_sub(1);
        if self.fast_frames == 0 {
            self.fast_frames = interval_frames(self.timing.fast_interval, self.fps);
            let fast = sim.step(Tick::Fast);
            if !fast.is_idle() {
                outcome = fast;
            }
        }

        // A level-up restarts the normal countdown at the new level's interval
        let leveled_up = matches!(&outcome, StepOutcome::Locked(report) if report.award.leveled_up);
        if normal_due || leveled_up {
            let interval = self.timing.normal_interval(sim.stats().level());
            self.normal_frames = interval_frames(interval, self.fps);
        }
        if sim.is_game_over() {
            self.state = SessionState::GameOver;
        }
        outcome
    }
}
