use blockfall_engine::{GameSession, Intent};
use rand::{Rng, seq::IndexedRandom as _};

const MOVES: [Intent; 3] = [Intent::MoveLeft, Intent::MoveRight, Intent::Rotate];
const MOVES_WITH_HOLD: [Intent; 4] = [
    Intent::MoveLeft,
    Intent::MoveRight,
    Intent::Rotate,
    Intent::Hold,
];

/// Plays by issuing random intents, at most `action_limit` per piece, and
/// then soft-dropping the piece.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    action_limit: u32,
    hold_enabled: bool,
    actions: u32,
}

impl RandomAgent {
    pub fn new(action_limit: u32, hold_enabled: bool) -> Self {
        Self {
            action_limit,
            hold_enabled,
            actions: 0,
        }
    }

    /// Chooses the intent for the current frame.
    pub fn choose<R>(&mut self, rng: &mut R) -> Intent
    where
        R: Rng + ?Sized,
    {
        if self.actions >= self.action_limit {
            return Intent::SoftDropOn;
        }
        self.actions += 1;
        let choices: &[Intent] = if self.hold_enabled {
            &MOVES_WITH_HOLD
        } else {
            &MOVES
        };
        *choices
            .choose(rng)
            .expect("intent choices are never empty")
    }

    /// Issues one intent to `session`.
    pub fn act<R>(&mut self, session: &mut GameSession, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let intent = self.choose(rng);
        session.handle_intent(intent);
    }

    /// Resets the per-piece action budget.
    pub fn piece_locked(&mut self) {
        self.actions = 0;
    }
}
