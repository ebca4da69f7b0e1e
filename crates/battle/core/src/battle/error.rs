use crate::error::{BattleError, ErrorSeverity};
use crate::ids::{ObstacleId, UnitId};

/// Errors raised when a change record does not fit the authoritative state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleStateError {
    #[error("unit {0} is not part of this battle")]
    UnknownUnit(UnitId),

    #[error("obstacle {0:?} is not part of this battle")]
    UnknownObstacle(ObstacleId),

    #[error("obstacle {0:?} already exists")]
    DuplicateObstacle(ObstacleId),
}

impl BattleError for BattleStateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "BATTLE_UNKNOWN_UNIT",
            Self::UnknownObstacle(_) => "BATTLE_UNKNOWN_OBSTACLE",
            Self::DuplicateObstacle(_) => "BATTLE_DUPLICATE_OBSTACLE",
        }
    }
}
