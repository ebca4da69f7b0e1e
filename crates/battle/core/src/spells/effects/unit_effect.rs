//! Behaviour shared by effects that act on units.

use crate::ids::UnitId;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::{Problem, ProblemKind};
use super::super::target::{Destination, EffectTarget, Target};

/// Applicable when at least one unit on the field is accepted.
pub(super) fn applicable(
    problem: &mut Problem,
    m: &Mechanics<'_>,
    accepts: impl Fn(&dyn Unit) -> bool,
) -> bool {
    if m.view.units_if(&|u| accepts(u)).is_empty() {
        return m.adapt_problem(ProblemKind::NoAppropriateTarget, problem);
    }
    true
}

/// Applicable when at least one unit of `target` is accepted.
pub(super) fn applicable_to(
    problem: &mut Problem,
    m: &Mechanics<'_>,
    target: &EffectTarget,
    accepts: impl Fn(&dyn Unit) -> bool,
) -> bool {
    if units(m, target).into_iter().any(|u| accepts(u)) {
        return true;
    }
    m.adapt_problem(ProblemKind::NoAppropriateTarget, problem)
}

/// Accepted units of the spell target, or of the aim point when the spell
/// target is empty. Hex-only destinations pick up the unit standing there.
pub(super) fn transform_target(
    m: &Mechanics<'_>,
    aim: &Target,
    spell_target: &Target,
    accepts: impl Fn(&dyn Unit) -> bool,
) -> EffectTarget {
    let source = if spell_target.is_empty() { aim } else { spell_target };
    let mut seen: Vec<UnitId> = Vec::new();
    let mut target = EffectTarget::new();
    for destination in source {
        let unit = match destination.unit {
            Some(id) => m.view.unit(id),
            None => m
                .view
                .units_if(&|u| u.occupies(destination.hex))
                .into_iter()
                .next(),
        };
        let Some(unit) = unit else {
            continue;
        };
        if seen.contains(&unit.unit_id()) || !accepts(unit) {
            continue;
        }
        seen.push(unit.unit_id());
        target.push(Destination::unit(unit));
    }
    target
}

/// Resolves the unit destinations of `target`, skipping ids the view does not know.
pub(super) fn units<'a>(m: &Mechanics<'a>, target: &EffectTarget) -> Vec<&'a dyn Unit> {
    target
        .iter()
        .filter_map(|d| d.unit)
        .filter_map(|id| m.view.unit(id))
        .collect()
}
