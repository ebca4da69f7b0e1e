use std::convert::Infallible;

use tracing::{debug, warn};

use super::changes::{BattleChange, BattleMutator};

/// Outgoing command sink of a cast.
///
/// `send` is fire-and-forget. `complain` reports an illegal request to the
/// player; it is not an error for the caller.
pub trait ServerCallback {
    fn send(&mut self, change: BattleChange);

    fn complain(&mut self, message: &str);
}

/// Sink recording everything it receives, in order.
///
/// Used for display and as the staging buffer of the send-then-apply path:
/// record a cast, then [`CommandLog::replay`] it onto a [`BattleMutator`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandLog {
    changes: Vec<BattleChange>,
    complaints: Vec<String>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &[BattleChange] {
        &self.changes
    }

    pub fn complaints(&self) -> &[String] {
        &self.complaints
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.complaints.is_empty()
    }

    /// Sends every recorded change, then every complaint, on to `server`.
    pub fn forward_to(self, server: &mut dyn ServerCallback) {
        for change in self.changes {
            server.send(change);
        }
        for message in &self.complaints {
            server.complain(message);
        }
    }

    /// Applies every recorded change to `battle`, stopping at the first failure.
    pub fn replay<M: BattleMutator + ?Sized>(&self, battle: &mut M) -> Result<(), M::Error> {
        debug!(
            target: "battle_core::battle",
            changes = self.changes.len(),
            "replaying command log"
        );
        battle.apply_all(&self.changes)
    }
}

/// Recording changes never fails; this lets effects stage their in-memory
/// changes in a log before anything is mutated.
impl BattleMutator for CommandLog {
    type Error = Infallible;

    fn apply_change(&mut self, change: &BattleChange) -> Result<(), Infallible> {
        self.changes.push(change.clone());
        Ok(())
    }
}

impl ServerCallback for CommandLog {
    fn send(&mut self, change: BattleChange) {
        self.changes.push(change);
    }

    fn complain(&mut self, message: &str) {
        warn!(target: "battle_core::battle", %message, "complaint");
        self.complaints.push(message.to_owned());
    }
}
