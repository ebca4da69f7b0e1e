use tracing::warn;

use crate::battle::{BattleChange, BattleMutator, ServerCallback};
use crate::hex::BattleHex;
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::{Problem, ProblemKind};
use super::super::target::{EffectTarget, Target};
use super::error::EffectsError;
use super::params::EffectParams;
use super::{EffectOutcome, unit_effect};

/// Moves one unit to a destination hex.
///
/// The target is exactly two destinations: the hex to move to, then the unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeleportEffect;

/// Why a teleport request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    InvalidDestination,
    NoUnit,
    Forbidden,
    WrongTargetCount,
}

impl Rejection {
    fn message(self) -> &'static str {
        match self {
            Self::InvalidDestination => "Invalid teleport destination",
            Self::NoUnit => "No unit to teleport",
            Self::Forbidden => "Forbidden teleport.",
            Self::WrongTargetCount => "Teleport requires 2 destinations.",
        }
    }
}

impl TeleportEffect {
    pub const NAME: &'static str = "core:teleport";

    pub fn from_params(_params: &EffectParams) -> Result<Self, EffectsError> {
        Ok(Self)
    }

    pub fn is_valid_target(&self, _m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        unit.is_valid_target(false)
    }

    fn accepts(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        self.is_valid_target(m, unit) && m.is_receptive(unit)
    }

    /// Reactive casts (magic mirror, attack triggers) never teleport.
    fn mode_allowed(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        if m.mode.is_reactive() {
            warn!(
                target: "battle_core::spells",
                spell = %m.spell_name(),
                mode = ?m.mode,
                "Invalid spell cast attempt"
            );
            return m.adapt_problem(ProblemKind::Invalid, problem);
        }
        true
    }

    pub fn applicable(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        self.mode_allowed(problem, m) && unit_effect::applicable(problem, m, |u| self.accepts(m, u))
    }

    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        _aim: &Target,
        target: &EffectTarget,
    ) -> bool {
        self.mode_allowed(problem, m)
            && unit_effect::applicable_to(problem, m, target, |u| self.accepts(m, u))
    }

    pub fn transform_target(
        &self,
        _m: &Mechanics<'_>,
        aim: &Target,
        _spell_target: &Target,
    ) -> EffectTarget {
        aim.clone()
    }

    fn movement(&self, m: &Mechanics<'_>, target: &EffectTarget) -> Result<BattleChange, Rejection> {
        let [destination, subject] = target.as_slice() else {
            return Err(Rejection::WrongTargetCount);
        };
        let hex: BattleHex = destination.hex;
        if !hex.is_valid() {
            return Err(Rejection::InvalidDestination);
        }
        let unit = subject
            .unit
            .and_then(|id| m.view.unit(id))
            .ok_or(Rejection::NoUnit)?;
        if !m.view.can_teleport_to(unit, hex, m.effect_level()) {
            return Err(Rejection::Forbidden);
        }
        Ok(BattleChange::StackMoved {
            unit: unit.unit_id(),
            tiles: vec![hex],
            distance: None,
            teleporting: true,
        })
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        _rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        match self.movement(m, target) {
            Ok(change) => {
                let mut outcome = EffectOutcome::default();
                outcome.affected.extend(change.unit());
                server.send(change);
                outcome
            }
            Err(rejection) => {
                server.complain(rejection.message());
                EffectOutcome::default()
            }
        }
    }

    /// Same checks as the server path; illegal requests are dropped silently.
    pub fn apply_to_battle<B: BattleMutator + ?Sized>(
        &self,
        battle: &mut B,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> Result<(), B::Error> {
        match self.movement(m, target) {
            Ok(change) => battle.apply_change(&change),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleState, BattleView, CommandLog};
    use crate::ids::{CreatureId, Side, SpellId, UnitId};
    use crate::rng::PcgRng;
    use crate::spells::{CastMode, CasterProfile, Destination, Positivity, Spell};

    fn battle() -> BattleState {
        BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 5, 10, 5)
            .unit(CreatureId(2), Side::Defender, BattleHex::from_xy(12, 5), 5, 10, 5)
            .build()
    }

    fn teleport() -> Spell {
        let mut spell = Spell::new(SpellId(63), "teleport");
        spell.level = 3;
        spell.positivity = Positivity::Positive;
        spell
    }

    fn run(target: EffectTarget) -> CommandLog {
        let state = battle();
        let spell = teleport();
        let caster = CasterProfile::new("Solmyr", Side::Attacker, 1);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&state, &caster, &spell, &catalog, CastMode::Hero);
        let mut log = CommandLog::new();
        TeleportEffect.apply_to_server(&mut log, &mut PcgRng::new(0), &m, &target);
        log
    }

    fn unit_dest(id: u32) -> Destination {
        Destination {
            unit: Some(UnitId(id)),
            hex: BattleHex::INVALID,
        }
    }

    #[test]
    fn moves_the_unit() {
        let log = run(vec![Destination::hex(BattleHex::from_xy(8, 3)), unit_dest(0)]);
        assert!(log.complaints().is_empty());
        assert_eq!(
            log.changes(),
            &[BattleChange::StackMoved {
                unit: UnitId(0),
                tiles: vec![BattleHex::from_xy(8, 3)],
                distance: None,
                teleporting: true,
            }]
        );
    }

    #[test]
    fn complains_about_malformed_requests() {
        let cases = [
            (vec![unit_dest(0)], "Teleport requires 2 destinations."),
            (vec![Destination::hex(BattleHex::INVALID), unit_dest(0)], "Invalid teleport destination"),
            (
                vec![Destination::hex(BattleHex::from_xy(8, 3)), Destination::hex(BattleHex::from_xy(8, 4))],
                "No unit to teleport",
            ),
            (vec![Destination::hex(BattleHex::from_xy(12, 5)), unit_dest(0)], "Forbidden teleport."),
        ];
        for (target, message) in cases {
            let log = run(target);
            assert!(log.changes().is_empty());
            assert_eq!(log.complaints(), &[message.to_owned()]);
        }
    }

    #[test]
    fn reactive_modes_are_refused() {
        let state = battle();
        let spell = teleport();
        let caster = CasterProfile::new("Solmyr", Side::Attacker, 1);
        let catalog: Vec<Spell> = Vec::new();
        for mode in [
            CastMode::AfterAttack,
            CastMode::BeforeAttack,
            CastMode::SpellLikeAttack,
            CastMode::MagicMirror,
        ] {
            let m = Mechanics::new(&state, &caster, &spell, &catalog, mode);
            let mut problem = Problem::new();
            assert!(!TeleportEffect.applicable(&mut problem, &m));
            assert_eq!(problem.kind(), Some(ProblemKind::Invalid));
        }
        let m = Mechanics::new(&state, &caster, &spell, &catalog, CastMode::Hero);
        assert!(TeleportEffect.applicable(&mut Problem::new(), &m));
    }

    #[test]
    fn in_memory_teleport_moves_silently() {
        let mut state = battle();
        let snapshot = state.clone();
        let spell = teleport();
        let caster = CasterProfile::new("Solmyr", Side::Attacker, 1);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&snapshot, &caster, &spell, &catalog, CastMode::Hero);
        let target = vec![Destination::hex(BattleHex::from_xy(8, 3)), unit_dest(0)];
        TeleportEffect.apply_to_battle(&mut state, &m, &target).unwrap();
        assert_eq!(state.unit(UnitId(0)).unwrap().position(), BattleHex::from_xy(8, 3));

        TeleportEffect.apply_to_battle(&mut state, &m, &vec![unit_dest(0)]).unwrap();
        assert_eq!(state.unit(UnitId(0)).unwrap().position(), BattleHex::from_xy(8, 3));
    }
}
