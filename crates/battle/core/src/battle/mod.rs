//! Battlefield capabilities and the in-memory authoritative state.
//!
//! Everything that reads a battle goes through [`BattleView`]; everything that
//! changes one goes through [`BattleMutator`] as typed [`BattleChange`]
//! records. The transport side of a cast sees only a [`ServerCallback`].
mod callback;
mod changes;
mod error;
mod obstacle;
mod reach;
mod staged;
mod state;
mod view;

pub use callback::{CommandLog, ServerCallback};
pub use changes::{BattleChange, BattleMutator};
pub use error::BattleStateError;
pub use obstacle::{Obstacle, ObstacleKind};
pub use reach::Distances;
pub use staged::StagedBattle;
pub use state::{BattleState, BattleStateBuilder};
pub use view::{BattleView, NearestEnemy};
