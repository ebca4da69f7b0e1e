//! Modifier (bonus) data model and the "bearer of queryable bonuses" capability.
//!
//! A [`Bonus`] is a typed, sourced, possibly time-limited effect attached to a
//! unit. Bonuses are shared as `Arc<Bonus>` handles: a [`BonusList`] returned by
//! a query points at the same allocations the bearer owns, so callers (notably
//! the AI overlay) can identify "this exact bonus" by handle without copying.
//!
//! ```text
//! BonusBearer::all_bonuses(selector, limit)
//!     selector: which bonuses to include
//!     limit:    bonuses matching it are excluded
//! ```

mod bearer;
#[allow(clippy::module_inception)]
mod bonus;
mod kinds;
mod list;
mod selector;

pub use bearer::{BonusBearer, BonusSet};
pub use bonus::{Bonus, BonusLimiter, BonusPropagator};
pub use kinds::{BonusDuration, BonusSource, BonusType, EffectRange, ValueType};
pub use list::{BonusHandle, BonusList};
pub use selector::Selector;
