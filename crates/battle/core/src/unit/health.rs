/// How far a heal may restore a stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum HealLevel {
    /// Restore wounds of living creatures only.
    #[default]
    Heal,
    /// Also bring back dead creatures, up to the initial stack size.
    Resurrect,
    /// No upper bound.
    OverHeal,
}

impl HealLevel {
    pub const fn allows_resurrection(self) -> bool {
        !matches!(self, Self::Heal)
    }
}

/// Whether creatures brought back by a heal survive the battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum HealPower {
    OneBattle,
    #[default]
    Permanent,
}

/// Result of applying damage to a stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    pub dealt: u64,
    pub killed: u32,
}

/// Health portion of a unit: creature count plus the wounds of the top one.
///
/// `first_hp_left` is in `1..=max_health` while the stack is alive and `0`
/// once it is dead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitHealth {
    pub count: u32,
    pub first_hp_left: u32,
    /// Creatures brought back for this battle only.
    pub resurrected: u32,
}

impl UnitHealth {
    /// A full-health stack of `count` creatures.
    pub fn full(count: u32, max_health: u32) -> Self {
        Self {
            count,
            first_hp_left: if count > 0 { max_health } else { 0 },
            resurrected: 0,
        }
    }

    pub fn available(&self, max_health: u32) -> u64 {
        if self.count == 0 {
            return 0;
        }
        u64::from(self.count - 1) * u64::from(max_health) + u64::from(self.first_hp_left)
    }

    fn set_available(&mut self, amount: u64, max_health: u32) {
        let max = u64::from(max_health.max(1));
        if amount == 0 {
            self.count = 0;
            self.first_hp_left = 0;
            return;
        }
        let count = amount.div_ceil(max);
        self.count = u32::try_from(count).unwrap_or(u32::MAX);
        self.first_hp_left = (amount - (count - 1) * max) as u32;
    }

    pub fn damage(&mut self, amount: u64, max_health: u32) -> DamageOutcome {
        let before = self.available(max_health);
        let dealt = amount.min(before);
        let count_before = self.count;
        self.set_available(before - dealt, max_health);
        self.resurrected = self.resurrected.min(self.count);
        DamageOutcome {
            dealt,
            killed: count_before - self.count,
        }
    }

    /// Restores up to `amount` health, capped by `level` against `base_count`.
    /// Returns the health actually restored.
    pub fn heal(
        &mut self,
        amount: u64,
        max_health: u32,
        base_count: u32,
        level: HealLevel,
        power: HealPower,
    ) -> u64 {
        let before = self.available(max_health);
        let cap = match level {
            HealLevel::Heal if self.count == 0 => 0,
            HealLevel::Heal => u64::from(self.count) * u64::from(max_health),
            HealLevel::Resurrect => u64::from(base_count) * u64::from(max_health),
            HealLevel::OverHeal => u64::MAX,
        };
        let after = before.saturating_add(amount).min(cap.max(before));
        let count_before = self.count;
        self.set_available(after, max_health);
        if power == HealPower::OneBattle && self.count > count_before {
            self.resurrected += self.count - count_before;
        }
        after - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_kills_whole_creatures_first_from_top() {
        let mut health = UnitHealth::full(10, 20);
        let outcome = health.damage(45, 20);
        assert_eq!(outcome, DamageOutcome { dealt: 45, killed: 2 });
        assert_eq!(health.count, 8);
        assert_eq!(health.first_hp_left, 15);
    }

    #[test]
    fn damage_is_capped_at_available_health() {
        let mut health = UnitHealth::full(2, 10);
        let outcome = health.damage(500, 10);
        assert_eq!(outcome.dealt, 20);
        assert_eq!(health, UnitHealth::default());
    }

    #[test]
    fn heal_does_not_raise_the_dead() {
        let mut health = UnitHealth::full(5, 10);
        health.damage(25, 10);
        let healed = health.heal(100, 10, 5, HealLevel::Heal, HealPower::Permanent);
        assert_eq!(healed, 5);
        assert_eq!(health.count, 3);
        assert_eq!(health.first_hp_left, 10);
    }

    #[test]
    fn resurrection_for_one_battle_is_tracked() {
        let mut health = UnitHealth::full(5, 10);
        health.damage(50, 10);
        let healed = health.heal(30, 10, 5, HealLevel::Resurrect, HealPower::OneBattle);
        assert_eq!(healed, 30);
        assert_eq!(health.count, 3);
        assert_eq!(health.resurrected, 3);
    }
}
