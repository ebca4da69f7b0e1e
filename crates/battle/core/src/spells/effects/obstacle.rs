use crate::battle::{BattleChange, BattleMutator, Obstacle, ObstacleKind, ServerCallback};
use crate::hex::{BattleHex, HexDirection};
use crate::ids::ObstacleId;
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::{Problem, ProblemKind};
use super::super::target::{EffectTarget, Target};
use super::EffectOutcome;
use super::error::EffectsError;
use super::params::{EffectParams, Params};

/// Places a spell obstacle (fire wall, force field, land mine, quicksand)
/// anchored at the aimed hex.
///
/// Walls wider than one hex grow downwards from the anchor, alternating
/// bottom-right and bottom-left steps so they form a straight column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleEffect {
    pub kind: ObstacleKind,
    /// `None` keeps the obstacle until the end of battle.
    pub turns: Option<u32>,
    /// Damage dealt on contact; 0 uses the cast's effect power.
    pub damage: i32,
    pub hidden: bool,
    pub passable: bool,
    pub trap: bool,
    pub width: u32,
}

impl Default for ObstacleEffect {
    fn default() -> Self {
        Self {
            kind: ObstacleKind::FireWall,
            turns: None,
            damage: 0,
            hidden: false,
            passable: false,
            trap: false,
            width: 1,
        }
    }
}

impl ObstacleEffect {
    pub const NAME: &'static str = "core:obstacle";

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectsError> {
        let p = Params::new(Self::NAME, params);
        let width = p.uint("width", 1)?;
        if width == 0 {
            return Err(EffectsError::InvalidParam {
                effect: Self::NAME,
                param: "width".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        let damage = p.uint("damage", 0)?;
        Ok(Self {
            kind: p.choice(
                "kind",
                ObstacleKind::FireWall,
                &[
                    ("fireWall", ObstacleKind::FireWall),
                    ("forceField", ObstacleKind::ForceField),
                    ("landMine", ObstacleKind::LandMine),
                    ("quicksand", ObstacleKind::Quicksand),
                ],
            )?,
            turns: p.opt_uint("turns")?,
            damage: i32::try_from(damage).unwrap_or(i32::MAX),
            hidden: p.bool("hidden", false)?,
            passable: p.bool("passable", false)?,
            trap: p.bool("trap", false)?,
            width,
        })
    }

    /// Obstacles target hexes, never units.
    pub fn is_valid_target(&self, _m: &Mechanics<'_>, _unit: &dyn Unit) -> bool {
        false
    }

    pub fn applicable(&self, _problem: &mut Problem, _m: &Mechanics<'_>) -> bool {
        true
    }

    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        _aim: &Target,
        target: &EffectTarget,
    ) -> bool {
        match self.placement(m, target) {
            Some(_) => true,
            None => m.adapt_problem(ProblemKind::WrongObstaclePlacement, problem),
        }
    }

    pub fn transform_target(
        &self,
        _m: &Mechanics<'_>,
        aim: &Target,
        _spell_target: &Target,
    ) -> EffectTarget {
        aim.iter().take(1).copied().collect()
    }

    /// Hexes covered when anchored at `anchor`, clipped to the field.
    pub fn footprint(&self, anchor: BattleHex) -> Vec<BattleHex> {
        let mut hexes = Vec::with_capacity(self.width as usize);
        let mut hex = anchor;
        for i in 0..self.width {
            if !hex.is_valid() {
                break;
            }
            hexes.push(hex);
            let direction = if i % 2 == 0 {
                HexDirection::BottomRight
            } else {
                HexDirection::BottomLeft
            };
            hex = hex.step(direction);
        }
        hexes
    }

    fn can_place_at(&self, m: &Mechanics<'_>, hex: BattleHex) -> bool {
        if !hex.is_available() {
            return false;
        }
        if m.view.obstacles().iter().any(|o| o.covers(hex)) {
            return false;
        }
        self.passable || m.view.unit_at(hex).is_none()
    }

    fn placement(&self, m: &Mechanics<'_>, target: &EffectTarget) -> Option<Vec<BattleHex>> {
        let anchor = target.first()?.hex;
        let hexes = self.footprint(anchor);
        if hexes.is_empty() || !hexes.iter().all(|&h| self.can_place_at(m, h)) {
            return None;
        }
        Some(hexes)
    }

    fn obstacle(&self, m: &Mechanics<'_>, hexes: Vec<BattleHex>) -> Obstacle {
        let id = m
            .view
            .obstacles()
            .iter()
            .map(|o| o.id.0 + 1)
            .max()
            .unwrap_or(0);
        let damage = if self.damage == 0 {
            i32::try_from(m.effect_power().max(0)).unwrap_or(i32::MAX)
        } else {
            self.damage
        };
        Obstacle {
            id: ObstacleId(id),
            kind: self.kind,
            hexes,
            caster_side: Some(m.caster_side()),
            turns_remaining: self.turns,
            damage,
            hidden: self.hidden,
            passable: self.passable,
            trap: self.trap,
        }
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        _rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        let Some(hexes) = self.placement(m, target) else {
            server.complain("Invalid obstacle placement");
            return EffectOutcome::default();
        };
        let obstacle = self.obstacle(m, hexes);
        let mut outcome = EffectOutcome::default();
        outcome.log.push(format!(
            "{} creates {:?} on {} hexes",
            m.caster.caster_name(),
            obstacle.kind,
            obstacle.hexes.len()
        ));
        server.send(BattleChange::ObstacleAdded(obstacle));
        outcome
    }

    pub fn apply_to_battle<B: BattleMutator + ?Sized>(
        &self,
        battle: &mut B,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> Result<(), B::Error> {
        match self.placement(m, target) {
            Some(hexes) => battle.apply_change(&BattleChange::ObstacleAdded(self.obstacle(m, hexes))),
            None => Ok(()),
        }
    }
}
