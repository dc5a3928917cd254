//! World model: named integer resources and powers.
//!
//! The World is an owned value. The turn orchestrator is its only writer;
//! everybody else receives clones through [`World::snapshot`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::change::updated_value;
use super::decision::Choice;
use super::errors::MalformedDeltaError;

/// The two namespaces a World exposes to guards and changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Resource,
    Power,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Resource => f.write_str("resource"),
            FieldKind::Power => f.write_str("power"),
        }
    }
}

/// Simulation state.
///
/// Ordered maps keep display and debug output stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    #[serde(default)]
    pub resources: BTreeMap<String, i64>,

    #[serde(default)]
    pub powers: BTreeMap<String, i64>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Money 4000, Military 90, Legislation 10.
    pub fn example() -> Self {
        Self::new()
            .with_resource("Money", 4000)
            .with_power("Military", 90)
            .with_power("Legislation", 10)
    }

    pub fn with_resource(mut self, name: impl Into<String>, value: i64) -> Self {
        self.resources.insert(name.into(), value);
        self
    }

    pub fn with_power(mut self, name: impl Into<String>, value: i64) -> Self {
        self.powers.insert(name.into(), value);
        self
    }

    fn values(&self, kind: FieldKind) -> &BTreeMap<String, i64> {
        match kind {
            FieldKind::Resource => &self.resources,
            FieldKind::Power => &self.powers,
        }
    }

    fn values_mut(&mut self, kind: FieldKind) -> &mut BTreeMap<String, i64> {
        match kind {
            FieldKind::Resource => &mut self.resources,
            FieldKind::Power => &mut self.powers,
        }
    }

    /// Reads a value; absent names read as 0.
    pub fn get(&self, kind: FieldKind, name: &str) -> i64 {
        self.values(kind).get(name).copied().unwrap_or(0)
    }

    pub fn resource(&self, name: &str) -> i64 {
        self.get(FieldKind::Resource, name)
    }

    pub fn power(&self, name: &str) -> i64 {
        self.get(FieldKind::Power, name)
    }

    /// Inserts `name` with value 0 unless it already exists.
    ///
    /// Used once at run start so the key set stays fixed during play.
    pub fn ensure_key(&mut self, kind: FieldKind, name: &str) {
        self.values_mut(kind).entry(name.to_string()).or_insert(0);
    }

    /// Independent copy for publication to a consumer.
    pub fn snapshot(&self) -> World {
        self.clone()
    }

    /// Applies `choice` in place.
    ///
    /// All deltas are validated before the first write: on error the World is
    /// left exactly as it was.
    pub fn apply(&mut self, choice: &Choice) -> Result<(), MalformedDeltaError> {
        let mut updates = Vec::new();
        for (kind, name, delta) in choice.change.entries() {
            let (multiplier, additive) = delta.affine(kind, name)?;
            updates.push((kind, name, multiplier, additive));
        }

        for (kind, name, multiplier, additive) in updates {
            let old = self.get(kind, name);
            self.values_mut(kind)
                .insert(name.to_string(), updated_value(old, multiplier, additive));
        }
        Ok(())
    }
}

impl World {
    /// `Name: value` pairs of one namespace in name order, space separated.
    pub fn describe(&self, kind: FieldKind) -> String {
        self.values(kind)
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resources [{}] powers [{}]",
            self.describe(FieldKind::Resource),
            self.describe(FieldKind::Power)
        )
    }
}
