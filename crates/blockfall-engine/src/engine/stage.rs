use serde::{Deserialize, Serialize};

use crate::{FieldConfig, FieldTooSmall, ShapeKind};

/// One curriculum stage: board size, shape pool and hold availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub board_width: u16,
    pub board_height: u16,
    pub allowed_shapes: Vec<ShapeKind>,
    /// Maximum number of player actions per piece.
    ///
    /// The engine does not enforce this; drivers use it to pace input.
    pub action_limit: u32,
    pub hold_enabled: bool,
}

impl StageConfig {
    pub fn field_config(&self) -> Result<FieldConfig, FieldTooSmall> {
        FieldConfig::new(self.board_width, self.board_height)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StageTableError {
    #[display("invalid stage table JSON")]
    Json(serde_json::Error),
    #[display("stage table is empty")]
    Empty,
    #[display("stage {stage}: {source}")]
    InvalidBoard { stage: usize, source: FieldTooSmall },
}

/// Read-only table of stages, numbered from 1.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ShapeKind, StageTable};
///
/// let table = StageTable::default();
/// let first = table.get(1);
/// assert_eq!((first.board_width, first.board_height), (4, 8));
/// assert_eq!(first.allowed_shapes, [ShapeKind::O]);
///
/// // Stages past the end reuse the last entry
/// assert_eq!(table.get(99), table.get(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StageConfig>", into = "Vec<StageConfig>")]
pub struct StageTable {
    stages: Vec<StageConfig>,
}

impl Default for StageTable {
    fn default() -> Self {
        use ShapeKind::{I, J, L, O, S, T, Z};
        let stage = |board_width, board_height, shapes: &[ShapeKind], action_limit, hold_enabled| {
            StageConfig {
                board_width,
                board_height,
                allowed_shapes: shapes.to_vec(),
                action_limit,
                hold_enabled,
            }
        };
        Self {
            stages: vec![
                stage(4, 8, &[O], 3, false),
                stage(6, 12, &[O, I], 4, false),
                stage(8, 16, &[O, I, T], 5, true),
                stage(10, 18, &[O, I, T, L], 5, true),
                stage(10, 20, &[O, I, T, L, J, S, Z], 5, true),
            ],
        }
    }
}

impl TryFrom<Vec<StageConfig>> for StageTable {
    type Error = StageTableError;

    fn try_from(stages: Vec<StageConfig>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageTable> for Vec<StageConfig> {
    fn from(table: StageTable) -> Self {
        table.stages
    }
}

impl StageTable {
    /// Builds a table, checking that it is non-empty and every board is valid.
    pub fn new(stages: Vec<StageConfig>) -> Result<Self, StageTableError> {
        if stages.is_empty() {
            return Err(StageTableError::Empty);
        }
        for (i, stage) in stages.iter().enumerate() {
            stage
                .field_config()
                .map_err(|source| StageTableError::InvalidBoard {
                    stage: i + 1,
                    source,
                })?;
        }
        Ok(Self { stages })
    }

    /// Parses a JSON array of stages.
    pub fn from_json(json: &str) -> Result<Self, StageTableError> {
        let stages: Vec<StageConfig> = serde_json::from_str(json).map_err(StageTableError::Json)?;
        Self::new(stages)
    }

    /// Returns the configuration of a 1-based stage number.
    ///
    /// Stage 0 is treated as stage 1 and stages past the end use the last
    /// entry.
    #[must_use]
    pub fn get(&self, stage: usize) -> &StageConfig {
        let index = stage.saturating_sub(1).min(self.stages.len() - 1);
        &self.stages[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageConfig> {
        self.stages.iter()
    }
}
