//! Spell-cast orchestration.
//!
//! A cast is validated against the active effect level, then every automatic
//! effect is applied to its own transformed target, in declaration order.
//! Targets are fixed up front. Each effect reads a [`StagedBattle`] holding
//! the changes of the effects before it; the view the cast was built on is
//! never mutated while a cast borrows it.

use tracing::{debug, warn};

use crate::battle::{BattleMutator, CommandLog, ServerCallback, StagedBattle};
use crate::ids::UnitId;
use crate::rng::RngOracle;

use super::effects::{EffectOutcome, PreparedEffect};
use super::mechanics::Mechanics;
use super::problem::Problem;
use super::target::Target;

/// What a finished cast reports back for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastReport {
    pub damage_to_display: u64,
    pub affected: Vec<UnitId>,
    pub log: Vec<String>,
}

impl From<EffectOutcome> for CastReport {
    fn from(outcome: EffectOutcome) -> Self {
        Self {
            damage_to_display: outcome.damage_to_display,
            affected: outcome.affected,
            log: outcome.log,
        }
    }
}

/// One spell aimed at a point, with an optional wider target set.
#[derive(Debug)]
pub struct SpellCast<'a> {
    mechanics: Mechanics<'a>,
    aim: Target,
    spell_target: Target,
}

impl<'a> SpellCast<'a> {
    pub fn new(mechanics: Mechanics<'a>, aim: Target) -> Self {
        Self {
            mechanics,
            aim,
            spell_target: Target::new(),
        }
    }

    pub fn with_spell_target(mut self, spell_target: Target) -> Self {
        self.spell_target = spell_target;
        self
    }

    pub fn mechanics(&self) -> &Mechanics<'a> {
        &self.mechanics
    }

    pub fn can_cast(&self, problem: &mut Problem) -> bool {
        let m = &self.mechanics;
        let effects = &m.spell.effects;
        effects.applicable(problem, m)
            && effects.applicable_to(problem, m, &self.aim, &self.spell_target)
    }

    /// Validates and applies the cast through `server`. On failure the
    /// problem is complained about and nothing is sent.
    pub fn cast(&self, server: &mut dyn ServerCallback, rng: &mut dyn RngOracle) -> Option<CastReport> {
        let m = &self.mechanics;
        let mut problem = Problem::new();
        if !self.can_cast(&mut problem) {
            warn!(
                target: "battle_core::spells",
                spell = %m.spell_name(),
                caster = %m.caster.caster_name(),
                kind = ?problem.kind(),
                "cast rejected"
            );
            let message = problem
                .messages()
                .first()
                .cloned()
                .unwrap_or_else(|| format!("{}: cannot be cast", m.spell_name()));
            server.complain(&message);
            return None;
        }

        let outcome = self.run_effects(server, |prepared, m, step| {
            prepared.effect.apply_to_server(step, rng, m, &prepared.target)
        });
        debug!(
            target: "battle_core::spells",
            spell = %m.spell_name(),
            level = m.effect_level(),
            damage = outcome.damage_to_display,
            affected = outcome.affected.len(),
            "spell cast"
        );
        Some(outcome.into())
    }

    /// Deterministic in-memory changes of the cast, or `None` if it cannot
    /// be cast. Replay the log onto the battle afterwards; this is how a
    /// view that is also the mutator (a look-ahead state) casts on itself.
    pub fn plan(&self) -> Option<CommandLog> {
        if !self.can_cast(&mut Problem::new()) {
            return None;
        }
        let mut log = CommandLog::new();
        self.run_effects(&mut log, |prepared, m, step| {
            let Ok(()) = prepared.effect.apply_to_battle(step, m, &prepared.target);
            EffectOutcome::default()
        });
        Some(log)
    }

    /// Applies the prepared effects one at a time. Each step is recorded,
    /// staged so later effects build on it, then forwarded to `sink`. A step
    /// that does not fit the staged battle stops the cast.
    fn run_effects(
        &self,
        sink: &mut dyn ServerCallback,
        mut apply: impl FnMut(&PreparedEffect<'_>, &Mechanics<'_>, &mut CommandLog) -> EffectOutcome,
    ) -> EffectOutcome {
        let m = &self.mechanics;
        let mut staged = StagedBattle::new(m.view);
        let mut outcome = EffectOutcome::default();
        for prepared in m.spell.effects.prepare(m, &self.aim, &self.spell_target) {
            let mut step = CommandLog::new();
            let applied = apply(&prepared, &m.on(&staged), &mut step);
            if let Err(err) = staged.apply_all(step.changes()) {
                warn!(
                    target: "battle_core::spells",
                    spell = %m.spell_name(),
                    error = %err,
                    "effect changes do not fit the battle"
                );
                break;
            }
            step.forward_to(sink);
            outcome.merge(applied);
        }
        outcome
    }

    /// Runs the cast against `battle` directly. Returns whether anything was cast.
    pub fn cast_in_memory<M: BattleMutator + ?Sized>(&self, battle: &mut M) -> Result<bool, M::Error> {
        match self.plan() {
            Some(log) => {
                log.replay(battle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleChange, BattleState, BattleView};
    use crate::bonus::{Bonus, BonusSource, BonusType};
    use crate::hex::BattleHex;
    use crate::ids::{CreatureId, Side, SpellId};
    use crate::rng::PcgRng;
    use crate::ids::ObstacleId;
    use crate::spells::{
        CastMode, CasterProfile, DamageEffect, Destination, Effect, EffectKind, ObstacleEffect,
        Positivity, Spell, SpellSchools,
    };

    fn battle() -> BattleState {
        BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 5)
            .unit(CreatureId(2), Side::Defender, BattleHex::from_xy(12, 5), 10, 10, 5)
            .unit(CreatureId(3), Side::Defender, BattleHex::from_xy(12, 7), 10, 10, 5)
            .bonus(Bonus::new(BonusType::FireImmunity, BonusSource::Creature, 0, 0))
            .build()
    }

    fn fireball() -> Spell {
        let mut spell = Spell::new(SpellId(21), "fireball");
        spell.level = 3;
        spell.positivity = Positivity::Negative;
        spell.damage = true;
        spell.schools = SpellSchools::FIRE;
        spell.level_power = [15, 15, 30, 45];
        for level in 0..4 {
            spell
                .effects
                .add(Effect::new(EffectKind::Damage(DamageEffect::default())), level)
                .unwrap();
        }
        spell
    }

    fn aim(x: i16, y: i16) -> Target {
        vec![Destination::hex(BattleHex::from_xy(x, y))]
    }

    #[test]
    fn cast_reports_damage_and_sends_changes() {
        let state = battle();
        let spell = fireball();
        let caster = CasterProfile::new("Luna", Side::Attacker, 2);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&state, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(12, 5));

        let mut log = CommandLog::new();
        let report = cast.cast(&mut log, &mut PcgRng::new(3)).unwrap();
        assert_eq!(report.damage_to_display, 30);
        assert_eq!(report.affected, vec![UnitId(1)]);
        assert!(matches!(
            log.changes(),
            [BattleChange::StackAttacked { defender: UnitId(1), damage: 30, killed: 3, .. }]
        ));
    }

    #[test]
    fn immune_target_is_complained_about() {
        let state = battle();
        let spell = fireball();
        let caster = CasterProfile::new("Luna", Side::Attacker, 2);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&state, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(12, 7));

        let mut log = CommandLog::new();
        assert!(cast.cast(&mut log, &mut PcgRng::new(3)).is_none());
        assert!(log.changes().is_empty());
        assert_eq!(log.complaints().len(), 1);
        assert!(log.complaints()[0].starts_with("fireball"));
    }

    #[test]
    fn in_memory_cast_matches_server_cast() {
        let mut state = battle();
        let snapshot = state.clone();
        let spell = fireball();
        let caster = CasterProfile::new("Luna", Side::Attacker, 3);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&snapshot, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(12, 5));

        let mut server = CommandLog::new();
        cast.cast(&mut server, &mut PcgRng::new(0)).unwrap();
        assert_eq!(cast.plan().as_ref().map(CommandLog::changes), Some(server.changes()));

        assert!(cast.cast_in_memory(&mut state).unwrap());
        let unit = state.unit(UnitId(1)).unwrap();
        assert_eq!(unit.total_health() - unit.available_health(), 45);
    }

    #[test]
    fn spell_target_overrides_aim() {
        let state = battle();
        let mut spell = fireball();
        spell.schools = SpellSchools::empty();
        let caster = CasterProfile::new("Luna", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&state, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(12, 5)).with_spell_target(vec![
            Destination::hex(BattleHex::from_xy(12, 5)),
            Destination::hex(BattleHex::from_xy(12, 7)),
        ]);
        let report = cast.cast(&mut CommandLog::new(), &mut PcgRng::new(0)).unwrap();
        assert_eq!(report.affected, vec![UnitId(1), UnitId(2)]);
        assert_eq!(report.damage_to_display, 30);
    }

    /// A level-0 spell made of the same effect twice.
    fn doubled(kind: EffectKind) -> Spell {
        let mut spell = Spell::new(SpellId(90), "twinBolt");
        spell.positivity = Positivity::Negative;
        spell.damage = true;
        spell.level_power = [15; 4];
        for _ in 0..2 {
            spell.effects.add(Effect::new(kind.clone()), 0).unwrap();
        }
        spell
    }

    #[test]
    fn second_damage_effect_hits_the_damaged_stack() {
        let mut state = battle();
        let snapshot = state.clone();
        let spell = doubled(EffectKind::Damage(DamageEffect::default()));
        let caster = CasterProfile::new("Luna", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&snapshot, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(12, 5));

        let mut server = CommandLog::new();
        let report = cast.cast(&mut server, &mut PcgRng::new(0)).unwrap();
        assert_eq!(report.damage_to_display, 30);
        assert_eq!(report.affected, vec![UnitId(1)]);
        assert_eq!(cast.plan().as_ref().map(CommandLog::changes), Some(server.changes()));

        server.replay(&mut state).unwrap();
        let unit = state.unit(UnitId(1)).unwrap();
        assert_eq!(unit.total_health() - unit.available_health(), 30);
        assert_eq!(unit.count(), 7);
        assert_eq!(snapshot.unit(UnitId(1)).unwrap().available_health(), 100);
    }

    #[test]
    fn second_obstacle_effect_sees_the_first() {
        let mut state = battle();
        let snapshot = state.clone();
        let spell = doubled(EffectKind::Obstacle(ObstacleEffect::default()));
        let caster = CasterProfile::new("Luna", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&snapshot, &caster, &spell, &catalog, CastMode::Hero);
        let cast = SpellCast::new(m, aim(6, 3));

        let mut server = CommandLog::new();
        assert!(cast.cast(&mut server, &mut PcgRng::new(0)).is_some());
        let [BattleChange::ObstacleAdded(wall)] = server.changes() else {
            panic!("expected one obstacle, got {:?}", server.changes());
        };
        assert_eq!(wall.id, ObstacleId(0));
        assert_eq!(server.complaints(), &["Invalid obstacle placement".to_owned()]);

        assert!(cast.cast_in_memory(&mut state).unwrap());
        assert_eq!(state.obstacles().len(), 1);
    }
}
