//! Unit registry entity
//!
//! Ordered set of known units. Insertion order is preserved; IDs are unique.

use serde::{Deserialize, Serialize};

use crate::domain::entities::unit::Unit;
use crate::domain::value_objects::{normalize_group_input, UnitStatus};
use crate::error::{FleetError, FleetResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Unit>", into = "Vec<Unit>")]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

/// Number of units in each lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub queued: usize,
    pub running: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StatusCounts {
    fn slot(&mut self, status: UnitStatus) -> &mut usize {
        match status {
            UnitStatus::Pending => &mut self.pending,
            UnitStatus::Queued => &mut self.queued,
            UnitStatus::Running => &mut self.running,
            UnitStatus::Success => &mut self.success,
            UnitStatus::Failed => &mut self.failed,
            UnitStatus::Skipped => &mut self.skipped,
        }
    }

    pub fn record(&mut self, status: UnitStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: UnitStatus) -> usize {
        match status {
            UnitStatus::Pending => self.pending,
            UnitStatus::Queued => self.queued,
            UnitStatus::Running => self.running,
            UnitStatus::Success => self.success,
            UnitStatus::Failed => self.failed,
            UnitStatus::Skipped => self.skipped,
        }
    }

    pub fn total(&self) -> usize {
        UnitStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.units.iter().map(|u| u.id().to_string()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id() == id)
    }

    /// Add a unit; a duplicate ID is rejected and the registry is unchanged.
    pub fn insert(&mut self, unit: Unit) -> FleetResult<()> {
        if self.contains(unit.id()) {
            return Err(FleetError::validation(format!(
                "unit {} is already registered",
                unit.id()
            )));
        }
        self.units.push(unit);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id() == id)?;
        Some(self.units.remove(index))
    }

    /// Assign (or clear, for blank / `Unassigned`) a unit's group.
    pub fn set_group(&mut self, id: &str, group: Option<&str>) -> FleetResult<()> {
        let unit = self
            .get_mut(id)
            .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
        unit.set_group(normalize_group_input(group));
        Ok(())
    }

    /// Reject the whole list if any ID is not registered.
    pub fn ensure_known(&self, ids: &[String]) -> FleetResult<()> {
        let unknown: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !self.contains(id))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(FleetError::validation(format!(
                "unknown unit id(s): {}",
                unknown.join(", ")
            )))
        }
    }

    /// Apply a lifecycle edge to one unit, returning its previous status.
    pub(crate) fn transition(&mut self, id: &str, next: UnitStatus) -> FleetResult<UnitStatus> {
        let unit = self
            .get_mut(id)
            .ok_or_else(|| FleetError::UnknownUnit(id.to_string()))?;
        unit.apply_transition(next)
    }

    /// Distinct normalized group names, sorted
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self.units.iter().map(Unit::normalized_group).collect();
        groups.sort();
        groups.dedup();
        groups
    }

    /// IDs of units whose normalized group equals `group`, in registry order
    pub fn ids_in_group(&self, group: &str) -> Vec<String> {
        self.units
            .iter()
            .filter(|u| u.normalized_group() == group)
            .map(|u| u.id().to_string())
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for unit in &self.units {
            counts.record(unit.status());
        }
        counts
    }

    pub fn ids_with_status(&self, status: UnitStatus) -> Vec<String> {
        self.units
            .iter()
            .filter(|u| u.status() == status)
            .map(|u| u.id().to_string())
            .collect()
    }
}

impl From<Vec<Unit>> for UnitRegistry {
    /// First occurrence of an ID wins.
    fn from(units: Vec<Unit>) -> Self {
        let mut registry = UnitRegistry::new();
        for unit in units {
            if !registry.contains(unit.id()) {
                registry.units.push(unit);
            }
        }
        registry
    }
}

impl From<UnitRegistry> for Vec<Unit> {
    fn from(registry: UnitRegistry) -> Self {
        registry.units
    }
}
