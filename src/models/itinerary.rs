//! Canonical flight itinerary records.

use std::fmt;

use serde::Serialize;

/// Text shown when no price could be resolved.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// Identity of an itinerary within one response.
///
/// Positional ids are only meaningful for the response they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItineraryId {
    Upstream(String),
    Position(usize),
}

impl fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream(id) => f.write_str(id),
            Self::Position(index) => write!(f, "{index}"),
        }
    }
}

/// The first leg of an itinerary, reduced to display fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LegSummary {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// `HH:MM`, or empty when unknown
    pub departure_time: String,
    /// `HH:MM`, or empty when unknown
    pub arrival_time: String,
    pub duration_minutes: Option<u64>,
    /// `"{h}h {m}m"`, the upstream string, or empty
    pub duration: String,
    /// `None` hides the stops badge, `Some(0)` is a direct flight
    pub stop_count: Option<u64>,
    pub carrier_name: String,
}

impl LegSummary {
    /// Badge text for the stop count.
    pub fn stops_label(&self) -> Option<String> {
        match self.stop_count? {
            0 => Some("DIRECT".to_string()),
            1 => Some("1 STOP".to_string()),
            n => Some(format!("{n} STOPS")),
        }
    }
}

/// Classification label attached by the upstream ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Cheapest,
    Fastest,
    Shortest,
    ThirdShortest,
    Other,
}

/// Badge color for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Green,
    Blue,
    Teal,
    Gray,
    Purple,
}

impl TagColor {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#28a745",
            Self::Blue => "#007bff",
            Self::Teal => "#17a2b8",
            Self::Gray => "#6c757d",
            Self::Purple => "#6f42c1",
        }
    }
}

/// A tag as delivered upstream. Unknown labels are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self.0.as_str() {
            "cheapest" => TagKind::Cheapest,
            "fastest" => TagKind::Fastest,
            "shortest" => TagKind::Shortest,
            "third_shortest" => TagKind::ThirdShortest,
            _ => TagKind::Other,
        }
    }

    pub fn color(&self) -> TagColor {
        match self.kind() {
            TagKind::Cheapest => TagColor::Green,
            TagKind::Fastest => TagColor::Blue,
            TagKind::Shortest => TagColor::Teal,
            TagKind::ThirdShortest => TagColor::Gray,
            TagKind::Other => TagColor::Purple,
        }
    }

    /// Label text with the first underscore turned into a space.
    pub fn display_label(&self) -> String {
        self.0.replacen('_', " ", 1)
    }
}

/// One renderable flight option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub price: String,
    pub leg: LegSummary,
    pub tags: Vec<Tag>,
}

impl Itinerary {
    /// `"ORIG → DEST"`, falling back to the searched airports, then placeholders.
    pub fn route_label(&self, fallback_origin: Option<&str>, fallback_destination: Option<&str>) -> String {
        let origin = self
            .leg
            .origin
            .as_deref()
            .or(fallback_origin)
            .unwrap_or("DEP");
        let destination = self
            .leg
            .destination
            .as_deref()
            .or(fallback_destination)
            .unwrap_or("ARR");
        format!("{origin} → {destination}")
    }
}

/// Classified outcome of a flight search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ReconciledResult {
    /// Upstream succeeded; zero itineraries is still a success
    Success { itineraries: Vec<Itinerary> },
    /// Upstream or transport reported a failure
    ApiError { message: String },
    /// Nothing has been searched, or results were cleared
    Empty,
    /// The response shape was not recognized
    Malformed { message: String },
}

impl ReconciledResult {
    pub fn api_error(message: impl Into<String>) -> Self {
        Self::ApiError {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Itineraries of a successful search, empty otherwise.
    pub fn itineraries(&self) -> &[Itinerary] {
        match self {
            Self::Success { itineraries } => itineraries,
            _ => &[],
        }
    }

    /// Failure text for `ApiError` and `Malformed`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message } | Self::Malformed { message } => Some(message),
            _ => None,
        }
    }
}
