use crate::bonus::{BonusBearer, BonusType};
use crate::hex::BattleHex;
use crate::ids::{Side, UnitId};
use crate::unit::Unit;

use super::obstacle::Obstacle;
use super::reach::Distances;

/// The closest unit a compelled attacker would go for.
#[derive(Clone, Copy)]
pub struct NearestEnemy<'a> {
    pub unit: &'a dyn Unit,
    /// Hex the attacker strikes from.
    pub hex: BattleHex,
    pub distance: u32,
}

impl std::fmt::Debug for NearestEnemy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearestEnemy")
            .field("unit", &self.unit.unit_id())
            .field("hex", &self.hex)
            .field("distance", &self.distance)
            .finish()
    }
}

/// Read-only battle queries.
///
/// Implementors supply the unit and obstacle listings; geometry (distances,
/// reachability, shooting, teleport legality) is derived from those so that a
/// look-ahead view with moved or changed units answers consistently.
pub trait BattleView {
    /// Every non-ghost unit, dead or alive, matching `pred`, in battle order.
    fn units_if(&self, pred: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit>;

    fn obstacles(&self) -> Vec<&Obstacle>;

    fn unit(&self, id: UnitId) -> Option<&dyn Unit> {
        self.units_if(&|u| u.unit_id() == id).into_iter().next()
    }

    fn alive_units(&self) -> Vec<&dyn Unit> {
        self.units_if(&|u| u.alive())
    }

    fn unit_at(&self, hex: BattleHex) -> Option<&dyn Unit> {
        self.units_if(&|u| u.alive() && u.occupies(hex))
            .into_iter()
            .next()
    }

    /// Ownership test against `side`. `Some(true)` asks for allies,
    /// `Some(false)` for enemies, `None` matches everything. Hypnotized units
    /// fight for the other side.
    fn match_owner(&self, side: Side, unit: &dyn Unit, positive: Option<bool>) -> bool {
        let effective = if unit.has_bonus_of_type(BonusType::Hypnotized) {
            unit.side().other()
        } else {
            unit.side()
        };
        match positive {
            None => true,
            Some(allied) => (effective == side) == allied,
        }
    }

    /// Whether `unit` may walk through `hex`.
    fn is_passable_for(&self, unit: &dyn Unit, hex: BattleHex) -> bool {
        if !hex.is_available() {
            return false;
        }
        if unit.is_flying() {
            return true;
        }
        let blocked_by_unit = self
            .units_if(&|u| u.alive() && u.unit_id() != unit.unit_id() && u.occupies(hex))
            .into_iter()
            .next()
            .is_some();
        !blocked_by_unit
            && !self
                .obstacles()
                .iter()
                .any(|o| o.blocks_movement() && o.covers(hex))
    }

    /// Whether `unit` may end its movement on `hex`.
    fn is_free_for(&self, unit: &dyn Unit, hex: BattleHex) -> bool {
        hex.is_available()
            && self
                .units_if(&|u| u.alive() && u.unit_id() != unit.unit_id() && u.occupies(hex))
                .is_empty()
            && !self
                .obstacles()
                .iter()
                .any(|o| o.blocks_movement() && o.covers(hex))
    }

    fn distances(&self, unit: &dyn Unit, from: BattleHex) -> Distances {
        Distances::compute(from, |hex| self.is_passable_for(unit, hex))
    }

    /// Hexes `unit` can end its move on this turn when starting from `from`,
    /// the starting hex included.
    fn available_hexes(&self, unit: &dyn Unit, from: BattleHex) -> Vec<BattleHex> {
        let distances = self.distances(unit, from);
        let speed = unit.speed();
        BattleHex::all()
            .filter(|&hex| {
                distances.get(hex).is_some_and(|d| d <= speed)
                    && (hex == from || self.is_free_for(unit, hex))
            })
            .collect()
    }

    /// A unit is blocked when an enemy stands next to it.
    fn is_unit_blocked(&self, unit: &dyn Unit) -> bool {
        let position = unit.position();
        self.units_if(&|u| u.alive() && u.position().is_adjacent(position))
            .into_iter()
            .any(|u| self.match_owner(unit.side(), u, Some(false)))
    }

    /// Whether `attacker` can shoot at the unit standing on `dest` without moving.
    fn can_shoot(&self, attacker: &dyn Unit, dest: BattleHex) -> bool {
        let Some(defender) = self.unit_at(dest) else {
            return false;
        };
        if defender.unit_id() == attacker.unit_id() || !attacker.can_shoot_at_all() {
            return false;
        }
        if !attacker.has_bonus_of_type(BonusType::FreeShooting) && self.is_unit_blocked(attacker) {
            return false;
        }
        self.match_owner(attacker.side(), defender, Some(false))
    }

    /// Teleport legality: a free, available hex. Below advanced level no
    /// obstacle of any kind may cover the destination.
    fn can_teleport_to(&self, unit: &dyn Unit, hex: BattleHex, level: usize) -> bool {
        if !hex.is_available() || unit.occupies(hex) || self.unit_at(hex).is_some() {
            return false;
        }
        self.obstacles()
            .iter()
            .filter(|o| o.covers(hex))
            .all(|o| level >= 2 && !o.blocks_movement())
    }

    fn is_melee_attack_possible(
        &self,
        attacker: &dyn Unit,
        defender: &dyn Unit,
        from: BattleHex,
    ) -> bool {
        attacker.unit_id() != defender.unit_id()
            && defender.alive()
            && from.is_adjacent(defender.position())
    }

    /// The unit `unit` can reach soonest, with the hex it would attack from.
    ///
    /// Enemies are units of the other side; a unit compelled to attack the
    /// nearest creature treats every other unit as one. Ties go to the unit
    /// listed first.
    fn nearest_enemy(&self, unit: &dyn Unit) -> Option<NearestEnemy<'_>> {
        let compelled = unit.has_bonus_of_type(BonusType::AttacksNearestCreature);
        let distances = self.distances(unit, unit.position());
        let mut best: Option<NearestEnemy<'_>> = None;

        for candidate in self.alive_units() {
            if candidate.unit_id() == unit.unit_id()
                || (!compelled && !self.match_owner(unit.side(), candidate, Some(false)))
            {
                continue;
            }
            for hex in candidate.position().neighbours() {
                if hex != unit.position() && !self.is_free_for(unit, hex) {
                    continue;
                }
                let Some(distance) = distances.get(hex) else {
                    continue;
                };
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(NearestEnemy {
                        unit: candidate,
                        hex,
                        distance,
                    });
                }
            }
        }
        best
    }
}
