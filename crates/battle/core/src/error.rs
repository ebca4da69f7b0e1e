//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. [`crate::battle::BattleStateError`],
//! [`crate::spells::EffectsError`]) live next to the code that produces them.
//! This module provides the shared classification trait.
//!
//! Expected rejections are not errors: receptivity checks and effect
//! applicability return `bool` with an optional [`crate::spells::Problem`],
//! and cast-legality failures go through
//! [`crate::battle::ServerCallback::complain`]. Error values are reserved for
//! broken invariants and state inconsistencies.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - a programming invariant was violated; the current
    /// decision computation must be abandoned.
    ///
    /// Examples: unknown unit id handed to a hypothetical state, asking for the
    /// best attack of an empty option set.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Sinks that cannot fail (e.g. a recording buffer) use `Infallible`.
impl BattleError for core::convert::Infallible {
    fn severity(&self) -> ErrorSeverity {
        match *self {}
    }
}
