//! Extractor over a saved vision-service response
//!
//! Accepts the `{ "units": [ { "id", "group" } ] }` document the dashboard
//! reader returns, or a bare array of the same items. IDs may be strings or
//! numbers; missing or blank groups become `None`.

use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::{ExtractedUnit, UnitExtractor};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Response {
    Wrapped { units: Vec<Item> },
    Bare(Vec<Item>),
}

#[derive(Debug, Deserialize)]
struct Item {
    id: Value,
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResponseExtractor;

impl JsonResponseExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn id_text(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => bail!("unit id must be a string or number, got {other}"),
    }
}

impl UnitExtractor for JsonResponseExtractor {
    fn extract(&self, image: &[u8]) -> anyhow::Result<Vec<ExtractedUnit>> {
        let text = std::str::from_utf8(image).context("extraction response is not UTF-8")?;
        let text = text.trim_start_matches('\u{feff}');
        let response: Response =
            serde_json::from_str(text).context("extraction response is not valid JSON")?;

        let items = match response {
            Response::Wrapped { units } => units,
            Response::Bare(units) => units,
        };

        items
            .into_iter()
            .map(|item| {
                let group = item
                    .group
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty());
                Ok(ExtractedUnit::new(id_text(&item.id)?, group))
            })
            .collect()
    }
}
