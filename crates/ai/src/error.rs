use battle_core::{BattleError, ErrorSeverity, ObstacleId, UnitId};

/// Errors raised while writing to a hypothetical battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HypotheticError {
    /// Only units of the real battle can be overlaid.
    #[error("unit {0} is not part of the real battle")]
    UnknownUnit(UnitId),

    #[error("obstacle {0:?} is not part of the hypothetical battle")]
    UnknownObstacle(ObstacleId),

    #[error("obstacle {0:?} already exists")]
    DuplicateObstacle(ObstacleId),
}

impl BattleError for HypotheticError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_) => ErrorSeverity::Fatal,
            Self::UnknownObstacle(_) | Self::DuplicateObstacle(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "HYPOTHETIC_UNKNOWN_UNIT",
            Self::UnknownObstacle(_) => "HYPOTHETIC_UNKNOWN_OBSTACLE",
            Self::DuplicateObstacle(_) => "HYPOTHETIC_DUPLICATE_OBSTACLE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// Callers check `possible_attacks()` before asking for the best one.
    #[error("no attack is possible for unit {0}")]
    NoActions(UnitId),
}

impl BattleError for TargetError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActions(_) => "TARGET_NO_ACTIONS",
        }
    }
}
