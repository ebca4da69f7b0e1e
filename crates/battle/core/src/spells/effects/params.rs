use std::collections::BTreeMap;

use super::error::EffectsError;

/// A single effect parameter as written in content files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

pub type EffectParams = BTreeMap<String, ParamValue>;

/// Typed access to an effect's parameters, with defaults for absent keys.
pub(super) struct Params<'p> {
    effect: &'static str,
    params: &'p EffectParams,
}

impl<'p> Params<'p> {
    pub(super) fn new(effect: &'static str, params: &'p EffectParams) -> Self {
        Self { effect, params }
    }

    fn invalid(&self, param: &str, reason: impl Into<String>) -> EffectsError {
        EffectsError::InvalidParam {
            effect: self.effect,
            param: param.to_owned(),
            reason: reason.into(),
        }
    }

    pub(super) fn bool(&self, key: &str, default: bool) -> Result<bool, EffectsError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(ParamValue::Bool(value)) => Ok(*value),
            Some(other) => Err(self.invalid(key, format!("expected a bool, got {other:?}"))),
        }
    }

    pub(super) fn int(&self, key: &str, default: i64) -> Result<i64, EffectsError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(ParamValue::Int(value)) => Ok(*value),
            Some(other) => Err(self.invalid(key, format!("expected an integer, got {other:?}"))),
        }
    }

    pub(super) fn uint(&self, key: &str, default: u32) -> Result<u32, EffectsError> {
        let value = self.int(key, i64::from(default))?;
        u32::try_from(value).map_err(|_| self.invalid(key, format!("{value} is out of range")))
    }

    /// Like [`Params::uint`] but `None` when the key is absent.
    pub(super) fn opt_uint(&self, key: &str) -> Result<Option<u32>, EffectsError> {
        if self.params.contains_key(key) {
            self.uint(key, 0).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads a string parameter restricted to `choices`, mapped to `T`.
    pub(super) fn choice<T: Copy>(
        &self,
        key: &str,
        default: T,
        choices: &[(&str, T)],
    ) -> Result<T, EffectsError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(ParamValue::Str(name)) => choices
                .iter()
                .find(|(candidate, _)| candidate == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| self.invalid(key, format!("unknown value '{name}'"))),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {other:?}"))),
        }
    }
}
