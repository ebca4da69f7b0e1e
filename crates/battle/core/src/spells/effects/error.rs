use crate::error::{BattleError, ErrorSeverity};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectsError {
    #[error("effect level {level} is out of range")]
    LevelOutOfRange { level: usize },

    #[error("unknown effect type '{0}'")]
    UnknownEffectType(String),

    #[error("effect '{effect}': invalid parameter '{param}': {reason}")]
    InvalidParam {
        effect: &'static str,
        param: String,
        reason: String,
    },
}

impl BattleError for EffectsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LevelOutOfRange { .. } => ErrorSeverity::Fatal,
            Self::UnknownEffectType(_) | Self::InvalidParam { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LevelOutOfRange { .. } => "EFFECTS_LEVEL_OUT_OF_RANGE",
            Self::UnknownEffectType(_) => "EFFECTS_UNKNOWN_TYPE",
            Self::InvalidParam { .. } => "EFFECTS_INVALID_PARAM",
        }
    }
}
