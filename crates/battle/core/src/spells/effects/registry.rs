use std::collections::HashMap;

use tracing::debug;

use super::error::EffectsError;
use super::kinds::EffectKind;
use super::params::EffectParams;
use super::{
    DamageEffect, DispelEffect, Effect, EffectSpec, HealEffect, ObstacleEffect, TeleportEffect,
};

/// Builds an effect kind from its parameters.
pub type EffectFactory = fn(&EffectParams) -> Result<EffectKind, EffectsError>;

/// Name-keyed table of effect constructors.
///
/// Populated explicitly: [`EffectRegistry::with_builtin`] registers the
/// `core:` effects, and embedders may [`register`](Self::register) more
/// before loading content.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    factories: HashMap<&'static str, EffectFactory>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in effect.
    pub fn with_builtin() -> Self {
        let builtin: [(&'static str, EffectFactory); 5] = [
            (DamageEffect::NAME, |p| DamageEffect::from_params(p).map(EffectKind::Damage)),
            (HealEffect::NAME, |p| HealEffect::from_params(p).map(EffectKind::Heal)),
            (TeleportEffect::NAME, |p| TeleportEffect::from_params(p).map(EffectKind::Teleport)),
            (ObstacleEffect::NAME, |p| ObstacleEffect::from_params(p).map(EffectKind::Obstacle)),
            (DispelEffect::NAME, |p| DispelEffect::from_params(p).map(EffectKind::Dispel)),
        ];

        let mut registry = Self::new();
        for (name, factory) in builtin {
            registry.register(name, factory);
        }
        registry
    }

    /// Registers `factory` under `name`, replacing an earlier registration.
    pub fn register(&mut self, name: &'static str, factory: EffectFactory) {
        if self.factories.insert(name, factory).is_some() {
            debug!(target: "battle_core::spells", effect = name, "effect factory replaced");
        }
    }

    pub fn find(&self, name: &str) -> Option<EffectFactory> {
        self.factories.get(name).copied()
    }

    /// Instantiates the effect described by `spec`, level unset.
    pub fn create(&self, spec: &EffectSpec) -> Result<Effect, EffectsError> {
        let factory = self
            .find(&spec.kind)
            .ok_or_else(|| EffectsError::UnknownEffectType(spec.kind.clone()))?;
        Ok(Effect {
            level: 0,
            automatic: spec.automatic,
            optional: spec.optional,
            kind: factory(&spec.params)?,
        })
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::effects::ParamValue;

    #[test]
    fn builtin_effects_are_registered() {
        let registry = EffectRegistry::with_builtin();
        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["core:damage", "core:dispel", "core:heal", "core:obstacle", "core:teleport"]
        );
    }

    #[test]
    fn create_carries_flags_and_params() {
        let registry = EffectRegistry::with_builtin();
        let mut spec = EffectSpec::new("core:damage").with_param("killByCount", ParamValue::Bool(true));
        spec.optional = true;
        let effect = registry.create(&spec).unwrap();
        assert!(effect.optional);
        assert!(effect.automatic);
        assert_eq!(
            effect.kind,
            EffectKind::Damage(DamageEffect {
                kill_by_count: true,
                ..DamageEffect::default()
            })
        );
        assert_eq!(
            registry.create(&EffectSpec::new("core:nothing")),
            Err(EffectsError::UnknownEffectType("core:nothing".into()))
        );
    }

    #[test]
    fn custom_factories_can_be_added() {
        let mut registry = EffectRegistry::new();
        assert!(registry.is_empty());
        registry.register("mod:blink", |_| Ok(EffectKind::Teleport(TeleportEffect)));
        assert!(registry.find("mod:blink").is_some());
        assert_eq!(registry.len(), 1);
    }
}
