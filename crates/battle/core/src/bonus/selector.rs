use super::bonus::Bonus;
use super::kinds::{BonusSource, BonusType, EffectRange};

/// Composable predicate over a [`Bonus`].
///
/// A closed enum rather than a closure so selectors stay `Debug`, comparable
/// and cheap to clone into caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    All,
    Type(BonusType),
    TypeSubtype(BonusType, i32),
    TypeSubtypeInfo(BonusType, i32, i32),
    SourceType(BonusSource),
    Source(BonusSource, u32),
    EffectRange(EffectRange),
    /// Structural identity, see [`Bonus::same_identity`].
    SameIdentity(Box<Bonus>),
    And(Box<Selector>, Box<Selector>),
    Or(Box<Selector>, Box<Selector>),
    Not(Box<Selector>),
}

impl Selector {
    pub fn matches(&self, bonus: &Bonus) -> bool {
        match self {
            Self::All => true,
            Self::Type(kind) => bonus.kind == *kind,
            Self::TypeSubtype(kind, subtype) => bonus.kind == *kind && bonus.subtype == *subtype,
            Self::TypeSubtypeInfo(kind, subtype, info) => {
                bonus.kind == *kind && bonus.subtype == *subtype && bonus.additional_info == *info
            }
            Self::SourceType(source) => bonus.source == *source,
            Self::Source(source, sid) => bonus.source == *source && bonus.sid == *sid,
            Self::EffectRange(range) => {
                bonus.effect_range == EffectRange::NoLimit || bonus.effect_range == *range
            }
            Self::SameIdentity(other) => other.same_identity(bonus),
            Self::And(a, b) => a.matches(bonus) && b.matches(bonus),
            Self::Or(a, b) => a.matches(bonus) || b.matches(bonus),
            Self::Not(inner) => !inner.matches(bonus),
        }
    }

    pub fn identity_of(bonus: &Bonus) -> Self {
        Self::SameIdentity(Box::new(bonus.clone()))
    }

    pub fn and(self, other: Selector) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Selector) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators_compose() {
        let b = Bonus::new(BonusType::LevelSpellImmunity, BonusSource::SpellEffect, 5, 34);
        let sel = Selector::Type(BonusType::LevelSpellImmunity)
            .and(Selector::SourceType(BonusSource::SpellEffect));
        assert!(sel.matches(&b));
        assert!(!sel.clone().not().matches(&b));
        assert!(
            Selector::Type(BonusType::Undead)
                .or(Selector::Source(BonusSource::SpellEffect, 34))
                .matches(&b)
        );
    }

    #[test]
    fn effect_range_accepts_unlimited_bonuses() {
        let any = Bonus::new(BonusType::PrimarySkill, BonusSource::Creature, 1, 0);
        let melee = any.clone().with_effect_range(EffectRange::OnlyMeleeFight);
        let shooting = Selector::EffectRange(EffectRange::OnlyDistanceFight);
        assert!(shooting.matches(&any));
        assert!(!shooting.matches(&melee));
    }
}
