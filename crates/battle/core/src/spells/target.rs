use crate::hex::BattleHex;
use crate::ids::UnitId;
use crate::unit::Unit;

/// One entry of a target list: a hex, optionally with the unit on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Destination {
    pub unit: Option<UnitId>,
    pub hex: BattleHex,
}

impl Destination {
    pub fn hex(hex: BattleHex) -> Self {
        Self { unit: None, hex }
    }

    pub fn unit(unit: &dyn Unit) -> Self {
        Self {
            unit: Some(unit.unit_id()),
            hex: unit.position(),
        }
    }
}

/// Nominal target of a cast: the aim point or the spell's wider target set.
pub type Target = Vec<Destination>;

/// Concrete parameter list one effect consumes.
pub type EffectTarget = Vec<Destination>;
