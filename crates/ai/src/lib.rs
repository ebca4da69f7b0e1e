//! Battle look-ahead and attack selection.
//!
//! - [`BonusOverlay`] / [`HypotheticState`]: copy-on-write views over a real
//!   battle, so simulated actions never touch it.
//! - [`TargetEvaluator`]: every legal attack of one unit, scored by an
//!   [`AttackEvaluator`] ([`DamageEstimator`] by default), plus the enemies it
//!   cannot reach this turn.
//!
//! A hypothetical state is owned by the decision that built it; parallel
//! search branches each construct their own.
mod attack;
mod error;
mod hypothetic;
mod overlay;
mod targets;

pub use attack::{AttackContext, AttackEvaluator, AttackOption, DamageEstimator};
pub use error::{HypotheticError, TargetError};
pub use hypothetic::{HypotheticState, UnitOverlay};
pub use overlay::BonusOverlay;
pub use targets::TargetEvaluator;
