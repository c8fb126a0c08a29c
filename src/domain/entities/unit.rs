//! Unit entity
//!
//! A field unit tracked by the registry. Identity and provenance are fixed at
//! creation; status only moves along lifecycle edges.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{normalize_group, IpOverrides, UnitStatus};
use crate::error::{FleetError, FleetResult};

/// Upper bound for extraction confidence
pub const MAX_CONFIDENCE: u8 = 100;

/// Confidence assigned to units accepted from the extraction service
pub const EXTRACTED_CONFIDENCE: u8 = 99;

/// How a unit entered the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitSource {
    Extracted,
    Manual,
}

/// Whether `id` is six digits starting with `62`
pub fn is_valid_unit_id(id: &str) -> bool {
    id.len() == 6 && id.starts_with("62") && id.bytes().all(|b| b.is_ascii_digit())
}

/// Split free-form manual input on whitespace and commas.
///
/// Returns `(valid, invalid)` tokens, each in input order with duplicates removed.
pub fn parse_unit_list(input: &str) -> (Vec<String>, Vec<String>) {
    let mut valid: Vec<String> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();
    for token in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let bucket = if is_valid_unit_id(token) {
            &mut valid
        } else {
            &mut invalid
        };
        if !bucket.iter().any(|t| t == token) {
            bucket.push(token.to_string());
        }
    }
    (valid, invalid)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    id: String,
    registration_name: String,
    source: UnitSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default)]
    status: UnitStatus,
    #[serde(default, skip_serializing_if = "IpOverrides::is_empty")]
    ip_overrides: IpOverrides,
}

impl Unit {
    /// A unit typed in by the operator
    pub fn manual(id: impl Into<String>) -> FleetResult<Self> {
        Self::create(id.into(), UnitSource::Manual, None)
    }

    /// A unit reported by the extraction service
    pub fn extracted(id: impl Into<String>, confidence: u8) -> FleetResult<Self> {
        Self::create(
            id.into(),
            UnitSource::Extracted,
            Some(confidence.min(MAX_CONFIDENCE)),
        )
    }

    fn create(id: String, source: UnitSource, confidence: Option<u8>) -> FleetResult<Self> {
        let id = id.trim().to_string();
        if !is_valid_unit_id(&id) {
            return Err(FleetError::validation(format!(
                "invalid unit id '{id}': expected six digits starting with 62"
            )));
        }
        Ok(Self {
            registration_name: id.clone(),
            id,
            source,
            confidence,
            group: None,
            status: UnitStatus::Pending,
            ip_overrides: IpOverrides::new(),
        })
    }

    pub fn with_registration_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.registration_name = name.trim().to_string();
        }
        self
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn registration_name(&self) -> &str {
        &self.registration_name
    }

    pub fn source(&self) -> UnitSource {
        self.source
    }

    pub fn confidence(&self) -> Option<u8> {
        self.confidence
    }

    /// Raw group assignment, `None` when unassigned
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Group name with the `Unassigned` sentinel applied
    pub fn normalized_group(&self) -> String {
        normalize_group(self.group.as_deref())
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn ip_overrides(&self) -> &IpOverrides {
        &self.ip_overrides
    }

    pub(crate) fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    pub(crate) fn ip_overrides_mut(&mut self) -> &mut IpOverrides {
        &mut self.ip_overrides
    }

    /// Move along a lifecycle edge, returning the previous status.
    pub(crate) fn apply_transition(&mut self, next: UnitStatus) -> FleetResult<UnitStatus> {
        let previous = self.status;
        self.status = previous.transition(next)?;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ids_must_match_format() {
        assert!(is_valid_unit_id("621696"));
        assert!(!is_valid_unit_id("631696"));
        assert!(!is_valid_unit_id("62169"));
        assert!(!is_valid_unit_id("6216960"));
        assert!(!is_valid_unit_id("62a696"));
        assert!(Unit::manual("12345").is_err());
    }

    #[test]
    fn manual_units_default_their_name_and_status() {
        let unit = Unit::manual(" 621696 ").unwrap();
        assert_eq!(unit.id(), "621696");
        assert_eq!(unit.registration_name(), "621696");
        assert_eq!(unit.status(), UnitStatus::Pending);
        assert_eq!(unit.source(), UnitSource::Manual);
        assert_eq!(unit.confidence(), None);
        assert_eq!(unit.normalized_group(), "Unassigned");
    }

    #[test]
    fn extracted_confidence_is_clamped() {
        let unit = Unit::extracted("621001", 250).unwrap();
        assert_eq!(unit.confidence(), Some(100));
    }

    #[test]
    fn parse_unit_list_splits_on_commas_and_whitespace() {
        let (valid, invalid) = parse_unit_list("621001, 621002\n621001 abc,62x");
        assert_eq!(valid, vec!["621001", "621002"]);
        assert_eq!(invalid, vec!["abc", "62x"]);
    }

    #[test]
    fn transition_rejects_illegal_edges_without_mutating() {
        let mut unit = Unit::manual("621001").unwrap();
        assert!(unit.apply_transition(UnitStatus::Success).is_err());
        assert_eq!(unit.status(), UnitStatus::Pending);
        assert_eq!(
            unit.apply_transition(UnitStatus::Queued).unwrap(),
            UnitStatus::Pending
        );
        assert_eq!(unit.status(), UnitStatus::Queued);
    }

    #[test]
    fn serde_uses_camel_case_and_skips_empty_overrides() {
        let unit = Unit::manual("621001").unwrap();
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(
            json,
            r#"{"id":"621001","registrationName":"621001","source":"MANUAL","status":"PENDING"}"#
        );
    }
}
