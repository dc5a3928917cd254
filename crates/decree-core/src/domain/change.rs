//! Change model: affine deltas applied to named World entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::MalformedDeltaError;
use super::world::FieldKind;

/// Affine transform `new = round(multiplier * old + additive)`.
///
/// Components are kept exactly as the scenario supplied them, so a delta with
/// the wrong arity survives deserialization and is rejected by
/// [`Delta::affine`] instead of being silently patched up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delta(Vec<f64>);

impl Delta {
    pub fn new(multiplier: f64, additive: f64) -> Self {
        Self(vec![multiplier, additive])
    }

    /// Raw components, possibly malformed.
    pub fn from_components(components: Vec<f64>) -> Self {
        Self(components)
    }

    /// Keeps the old value.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Replaces the old value with `value`.
    pub fn set(value: f64) -> Self {
        Self::new(0.0, value)
    }

    pub fn components(&self) -> &[f64] {
        &self.0
    }

    /// `(multiplier, additive)` if the delta is well formed.
    pub fn affine(&self, kind: FieldKind, name: &str) -> Result<(f64, f64), MalformedDeltaError> {
        match self.0.as_slice() {
            [multiplier, additive] if multiplier.is_finite() && additive.is_finite() => {
                Ok((*multiplier, *additive))
            }
            _ => Err(MalformedDeltaError {
                kind,
                name: name.to_string(),
                components: self.0.clone(),
            }),
        }
    }
}

/// Rounds half away from zero and saturates into `i64`.
pub(crate) fn updated_value(old: i64, multiplier: f64, additive: f64) -> i64 {
    (multiplier * old as f64 + additive).round() as i64
}

/// Sparse set of deltas. Names that are not listed are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Delta>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub powers: BTreeMap<String, Delta>,
}

impl Change {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, name: impl Into<String>, delta: Delta) -> Self {
        self.resources.insert(name.into(), delta);
        self
    }

    pub fn power(mut self, name: impl Into<String>, delta: Delta) -> Self {
        self.powers.insert(name.into(), delta);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.powers.is_empty()
    }

    /// Every delta paired with its namespace, resources first.
    pub fn entries(&self) -> impl Iterator<Item = (FieldKind, &str, &Delta)> {
        let resources = self
            .resources
            .iter()
            .map(|(name, delta)| (FieldKind::Resource, name.as_str(), delta));
        let powers = self
            .powers
            .iter()
            .map(|(name, delta)| (FieldKind::Power, name.as_str(), delta));
        resources.chain(powers)
    }

    /// Checks every delta without touching any World.
    pub fn validate(&self) -> Result<(), MalformedDeltaError> {
        for (kind, name, delta) in self.entries() {
            delta.affine(kind, name)?;
        }
        Ok(())
    }
}
