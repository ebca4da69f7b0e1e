use std::fmt;

/// Why a spell or effect cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// The request itself is malformed or not allowed in this context.
    Invalid,
    NoAppropriateTarget,
    WrongObstaclePlacement,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid cast",
            Self::NoAppropriateTarget => "no appropriate target",
            Self::WrongObstaclePlacement => "obstacle cannot be placed there",
        })
    }
}

/// Human-readable explanation attached to a failed applicability check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Problem {
    kind: Option<ProblemKind>,
    messages: Vec<String>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem. The first kind recorded is kept.
    pub fn add(&mut self, kind: ProblemKind, message: impl Into<String>) {
        self.kind.get_or_insert(kind);
        self.messages.push(message.into());
    }

    pub fn kind(&self) -> Option<ProblemKind> {
        self.kind
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}
