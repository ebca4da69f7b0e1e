//! Combatants.
//!
//! A unit is a stack of identical creatures acting as one entity. Its mutable
//! snapshot ([`UnitState`]) is separated from its bonus storage so that
//! look-ahead code can copy the former cheaply while layering changes over the
//! latter.
mod combatant;
mod health;
mod state;

pub use combatant::Combatant;
pub use health::{DamageOutcome, HealLevel, HealPower, UnitHealth};
pub use state::UnitState;

use crate::bonus::{BonusBearer, BonusType, Selector};
use crate::hex::BattleHex;
use crate::ids::{CreatureId, Side, UnitId};

/// Read access to a combatant: its state snapshot plus its bonuses.
///
/// Derived quantities (max health, speed, shooting capability) are computed
/// from bonuses so that overlays changing bonuses change them too.
pub trait Unit: BonusBearer {
    fn state(&self) -> &UnitState;

    fn unit_id(&self) -> UnitId {
        self.state().id
    }

    fn creature_id(&self) -> CreatureId {
        self.state().creature
    }

    fn side(&self) -> Side {
        self.state().side
    }

    fn position(&self) -> BattleHex {
        self.state().position
    }

    fn count(&self) -> u32 {
        self.state().health.count
    }

    fn alive(&self) -> bool {
        self.count() > 0 && !self.is_ghost()
    }

    fn is_ghost(&self) -> bool {
        self.state().ghost
    }

    fn is_dead(&self) -> bool {
        !self.alive() && !self.is_ghost()
    }

    /// Health of a single creature in the stack.
    fn max_health(&self) -> u32 {
        self.value_of_type(BonusType::StackHealth).max(1) as u32
    }

    /// Health of the stack at its initial size.
    fn total_health(&self) -> u64 {
        u64::from(self.state().base_count) * u64::from(self.max_health())
    }

    fn available_health(&self) -> u64 {
        self.state().health.available(self.max_health())
    }

    fn speed(&self) -> u32 {
        self.value_of_type(BonusType::Speed).max(0) as u32
    }

    fn attack(&self) -> i32 {
        self.value_of(&Selector::TypeSubtype(BonusType::PrimarySkill, 0))
    }

    fn defense(&self) -> i32 {
        self.value_of(&Selector::TypeSubtype(BonusType::PrimarySkill, 1))
    }

    fn can_shoot_at_all(&self) -> bool {
        self.has_bonus_of_type(BonusType::Shooter) && self.state().shots > 0
    }

    fn is_flying(&self) -> bool {
        self.has_bonus_of_type(BonusType::Flying)
    }

    /// Whether the unit may be targeted by anything at all. Dead units qualify
    /// only when `allow_dead` is set; ghosts and siege machinery never do.
    fn is_valid_target(&self, allow_dead: bool) -> bool {
        (self.alive() || (allow_dead && self.is_dead()))
            && self.position().is_valid()
            && !self.has_bonus_of_type(BonusType::SiegeWeapon)
    }

    fn occupies(&self, hex: BattleHex) -> bool {
        self.position() == hex
    }
}
