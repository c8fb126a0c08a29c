//! Unit extractor port
//!
//! Boundary to the vision service that reads unit IDs out of a dashboard
//! screenshot. Its errors are opaque to the engine.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub id: String,
    pub group: Option<String>,
}

impl ExtractedUnit {
    pub fn new(id: impl Into<String>, group: Option<String>) -> Self {
        Self {
            id: id.into(),
            group,
        }
    }
}

pub trait UnitExtractor: Send + Sync {
    fn extract(&self, image: &[u8]) -> anyhow::Result<Vec<ExtractedUnit>>;
}

/// Drop repeated IDs, keeping the first occurrence.
pub fn dedupe_extracted(units: Vec<ExtractedUnit>) -> Vec<ExtractedUnit> {
    let mut seen = std::collections::HashSet::new();
    units
        .into_iter()
        .filter(|unit| seen.insert(unit.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let units = dedupe_extracted(vec![
            ExtractedUnit::new("621001", Some("Pumps".into())),
            ExtractedUnit::new("621002", None),
            ExtractedUnit::new("621001", Some("Sand 1".into())),
        ]);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].group.as_deref(), Some("Pumps"));
    }
}
