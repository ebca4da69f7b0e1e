//! Look-ahead scenarios: spells simulated on a hypothetical battle built from
//! the bundled content, then attacks enumerated on the result.

use battle_ai::{DamageEstimator, HypotheticState, TargetError, TargetEvaluator};
use battle_content::{ContentFactory, CreatureTable, SpellBook};
use battle_core::spells::IdentifierResolver;
use battle_core::{
    BattleHex, BattleState, BattleView, Bonus, BonusType, CastMode, CasterProfile, Destination,
    EffectRegistry, Mechanics, Side, SpellCast, SpellId, Target, Unit, UnitId,
};

const PIKEMEN: UnitId = UnitId(0);
const ARCHERS: UnitId = UnitId(1);
const SKELETONS: UnitId = UnitId(2);

fn content() -> (CreatureTable, SpellBook) {
    let factory = ContentFactory::bundled();
    let creatures = factory.load_creatures().unwrap();
    let spells = factory
        .load_spells(&EffectRegistry::with_builtin(), &creatures)
        .unwrap();
    (creatures, spells)
}

fn battle(creatures: &CreatureTable) -> BattleState {
    let id = |name: &str| creatures.creature("core", name).unwrap();
    BattleState::builder()
        .unit(id("pikeman"), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 4)
        .unit(id("archer"), Side::Attacker, BattleHex::from_xy(3, 8), 10, 10, 4)
        .shooter(12)
        .unit(id("skeleton"), Side::Defender, BattleHex::from_xy(12, 5), 10, 6, 4)
        .bonus(Bonus::spell_effect(BonusType::Speed, SpellId(54), -2, 3))
        .build()
}

/// Plans `name` against the hypothetical battle and applies it there.
fn simulate(state: &mut HypotheticState<'_>, spells: &SpellBook, name: &str, aim: Target) {
    let spell = spells.by_name(name).unwrap();
    let caster = CasterProfile::new("Solmyr", Side::Attacker, 3);
    let log = {
        let m = Mechanics::new(&*state, &caster, spell, spells, CastMode::Hero);
        SpellCast::new(m, aim).plan().unwrap()
    };
    log.replay(state).unwrap();
}

fn targets<'a>(view: &'a dyn BattleView, attacker: UnitId) -> TargetEvaluator<'a> {
    let unit = view.unit(attacker).unwrap();
    TargetEvaluator::new(unit, view, &DamageEstimator::default())
}

#[test]
fn teleport_brings_the_enemy_into_reach() {
    let (creatures, spells) = content();
    let real = battle(&creatures);
    let mut state = HypotheticState::new(&real);

    let aim = vec![
        Destination::hex(BattleHex::from_xy(11, 5)),
        Destination::unit(real.unit(PIKEMEN).unwrap()),
    ];
    simulate(&mut state, &spells, "teleport", aim);
    assert_eq!(state.overlay_count(), 1);

    let before = targets(&real, PIKEMEN);
    assert!(before.possible_attacks().is_empty());
    assert_eq!(before.unreachable_enemies().len(), 1);

    let after = targets(&state, PIKEMEN);
    assert!(after.unreachable_enemies().is_empty());
    let standing = after
        .possible_attacks()
        .iter()
        .find(|o| o.hex == Some(BattleHex::from_xy(11, 5)))
        .unwrap();
    assert_eq!(standing.defender, SKELETONS);
    assert_eq!(standing.charged_fields, 0);
    assert!(after.best_action_value() > 0);

    assert_eq!(real.unit(PIKEMEN).unwrap().position(), BattleHex::from_xy(2, 5));
}

#[test]
fn arrows_finish_the_enemy_in_lookahead_only() {
    let (creatures, spells) = content();
    let real = battle(&creatures);
    let mut state = HypotheticState::new(&real);
    let at_skeletons = || vec![Destination::hex(BattleHex::from_xy(12, 5))];

    simulate(&mut state, &spells, "magicArrow", at_skeletons());
    assert_eq!(state.unit(SKELETONS).unwrap().count(), 5);
    let shot = targets(&state, ARCHERS);
    assert_eq!(shot.possible_attacks().len(), 1);
    assert!(shot.possible_attacks()[0].shooting);

    simulate(&mut state, &spells, "magicArrow", at_skeletons());
    let done = targets(&state, ARCHERS);
    assert!(done.possible_attacks().is_empty());
    assert_eq!(done.best_action_value(), 0);
    assert_eq!(done.best_action(), Err(TargetError::NoActions(ARCHERS)));

    assert_eq!(real.unit(SKELETONS).unwrap().count(), 10);
    assert_eq!(targets(&real, ARCHERS).possible_attacks().len(), 1);
}

#[test]
fn dispel_is_seen_by_the_lookahead_only() {
    let (creatures, spells) = content();
    let real = battle(&creatures);
    let mut state = HypotheticState::new(&real);

    simulate(
        &mut state,
        &spells,
        "dispel",
        vec![Destination::hex(BattleHex::from_xy(12, 5))],
    );
    assert_eq!(state.unit(SKELETONS).unwrap().speed(), 4);
    assert_eq!(real.unit(SKELETONS).unwrap().speed(), 2);
}

#[test]
fn hypothetical_berserk_turns_on_the_nearest_ally() {
    let (creatures, _) = content();
    let real = battle(&creatures);
    let mut state = HypotheticState::new(&real);
    let berserk = Bonus::spell_effect(BonusType::AttacksNearestCreature, SpellId(59), 0, 1);

    state.add_bonus(PIKEMEN, std::slice::from_ref(&berserk)).unwrap();
    let compelled = targets(&state, PIKEMEN);
    assert_eq!(
        compelled.possible_attacks().len() + compelled.unreachable_enemies().len(),
        1
    );
    assert_eq!(compelled.possible_attacks()[0].defender, ARCHERS);

    state.remove_bonus(PIKEMEN, std::slice::from_ref(&berserk)).unwrap();
    let calm = targets(&state, PIKEMEN);
    assert!(calm.possible_attacks().is_empty());
    let unreachable: Vec<_> = calm
        .unreachable_enemies()
        .iter()
        .map(|u| u.unit_id())
        .collect();
    assert_eq!(unreachable, vec![SKELETONS]);
}
