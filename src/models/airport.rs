//! Airport suggestion data structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display strings attached to an airport suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub title: String,
    pub suggestion_title: String,
    pub subtitle: String,
}

/// A candidate returned by airport lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportSuggestion {
    pub sky_id: String,
    pub entity_id: String,
    pub presentation: Presentation,
}

impl AirportSuggestion {
    /// Parse one suggestion from an upstream JSON element.
    ///
    /// Identifiers are read at top level first, then under
    /// `navigation.relevantFlightParams` (the nearby-airports shape).
    /// Returns `None` when either identifier is missing.
    pub fn from_json(value: &Value) -> Option<Self> {
        let flight_params = value.pointer("/navigation/relevantFlightParams");
        let ident = |key: &str| {
            scalar_string(value.get(key))
                .or_else(|| scalar_string(flight_params.and_then(|p| p.get(key))))
                .filter(|s| !s.is_empty())
        };

        let sky_id = ident("skyId")?;
        let entity_id = ident("entityId")?;

        let text = |key: &str| {
            value
                .pointer(&format!("/presentation/{key}"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            sky_id,
            entity_id,
            presentation: Presentation {
                title: text("title"),
                suggestion_title: text("suggestionTitle"),
                subtitle: text("subtitle"),
            },
        })
    }

    /// Label shown in the search field once selected.
    pub fn display_title(&self) -> &str {
        if self.presentation.suggestion_title.is_empty() {
            &self.presentation.title
        } else {
            &self.presentation.suggestion_title
        }
    }

    /// The identifier pair used to issue a search.
    pub fn to_ref(&self) -> AirportRef {
        AirportRef {
            sky_id: self.sky_id.clone(),
            entity_id: self.entity_id.clone(),
            display_title: self.display_title().to_string(),
        }
    }
}

/// A selected airport, as carried by a search intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportRef {
    pub sky_id: String,
    pub entity_id: String,
    pub display_title: String,
}

impl AirportRef {
    pub fn new(
        sky_id: impl Into<String>,
        entity_id: impl Into<String>,
        display_title: impl Into<String>,
    ) -> Self {
        Self {
            sky_id: sky_id.into(),
            entity_id: entity_id.into(),
            display_title: display_title.into(),
        }
    }
}

/// Upstream ids arrive as strings or numbers.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
