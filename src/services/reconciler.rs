// src/services/reconciler.rs

//! Response reconciliation.
//!
//! Classifies a raw `searchFlights` payload and extracts canonical
//! itineraries. Top-level classification is the only place a failure is
//! reported; field extraction degrades to fallbacks and never fails.

use serde_json::Value;

use crate::models::{
    Clock, Itinerary, ItineraryId, LegSummary, PRICE_UNAVAILABLE, ReconciledResult, Tag,
};
use crate::utils::format;

pub const NO_DATA: &str = "No data received";
pub const UNEXPECTED_FORMAT: &str = "Unexpected response format";
pub const API_ERROR_DEFAULT: &str = "API returned an error";

/// Keys under `data` that may hold the itinerary list, in probe order.
const ITINERARY_KEYS: [&str; 3] = ["itineraries", "flights", "results"];

/// Classify and normalize a response with default display options.
pub fn reconcile(raw: Option<&Value>) -> ReconciledResult {
    Reconciler::default().reconcile(raw)
}

/// Response reconciler carrying display options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    clock: Clock,
}

impl Reconciler {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Classify a raw payload; first matching rule wins.
    pub fn reconcile(&self, raw: Option<&Value>) -> ReconciledResult {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            return ReconciledResult::malformed(NO_DATA);
        };

        let status = raw.get("status").and_then(Value::as_bool);
        let data = present(raw.get("data"));

        match (status, data) {
            (Some(true), Some(data)) => {
                let records = itinerary_records(data);
                log::info!("Extracted {} flights from API response", records.len());
                ReconciledResult::Success {
                    itineraries: records
                        .iter()
                        .enumerate()
                        .map(|(index, record)| self.itinerary(index, record))
                        .collect(),
                }
            }
            (Some(false), _) => {
                let message = raw
                    .get("message")
                    .and_then(text)
                    .unwrap_or_else(|| API_ERROR_DEFAULT.to_string());
                log::warn!("API returned error: {}", message);
                ReconciledResult::ApiError { message }
            }
            _ => {
                log::warn!("Unexpected API response structure: {}", raw);
                ReconciledResult::malformed(UNEXPECTED_FORMAT)
            }
        }
    }

    /// Extract one itinerary; `index` is its position in the response.
    pub fn itinerary(&self, index: usize, record: &Value) -> Itinerary {
        let leg = present(record.pointer("/legs/0")).filter(|l| l.is_object());
        let probe = Probe { leg, record };

        let id = record
            .get("id")
            .and_then(text)
            .filter(|id| !id.is_empty())
            .map_or(ItineraryId::Position(index), ItineraryId::Upstream);

        Itinerary {
            id,
            price: price(record),
            leg: self.leg_summary(&probe),
            tags: tags(record),
        }
    }

    fn leg_summary(&self, probe: &Probe<'_>) -> LegSummary {
        let clock_time = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| probe.find(key, Value::as_str))
                .map(|raw| format::clock_time(raw, self.clock))
                .unwrap_or_default()
        };

        let duration_minutes = probe.find("durationInMinutes", whole_number);
        let duration = match duration_minutes {
            Some(minutes) => format::duration(minutes),
            None => probe
                .find("duration", Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };

        LegSummary {
            origin: probe.find("origin", airport_code),
            destination: probe.find("destination", airport_code),
            departure_time: clock_time(&["departure", "departureTime"]),
            arrival_time: clock_time(&["arrival", "arrivalTime"]),
            duration_minutes,
            duration,
            stop_count: probe.find("stopCount", whole_number),
            carrier_name: carrier(probe),
        }
    }
}

/// Field lookup preferring `legs[0]` over the top-level record.
struct Probe<'a> {
    leg: Option<&'a Value>,
    record: &'a Value,
}

impl<'a> Probe<'a> {
    /// First value under `key` that `extract` accepts, leg before record.
    fn find<T>(&self, key: &str, extract: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        self.leg
            .and_then(|leg| leg.get(key))
            .and_then(&extract)
            .or_else(|| self.record.get(key).and_then(&extract))
    }
}

/// The itinerary array under `data`, or empty when none is found.
fn itinerary_records(data: &Value) -> &[Value] {
    let found = ITINERARY_KEYS
        .iter()
        .find_map(|key| present(data.get(*key)))
        .or_else(|| data.is_array().then_some(data));

    match found {
        Some(Value::Array(items)) => items,
        Some(other) => {
            log::warn!("Itinerary container is not a list: {}", other);
            &[]
        }
        None => &[],
    }
}

fn price(record: &Value) -> String {
    let formatted = |path: &str| record.pointer(path).and_then(Value::as_str).map(str::to_string);
    let dollars = |path: &str| record.pointer(path).and_then(text).map(|v| format!("${v}"));

    formatted("/price/formatted")
        .or_else(|| dollars("/price/raw"))
        .or_else(|| formatted("/pricingOptions/0/price/formatted"))
        .or_else(|| dollars("/pricingOptions/0/price/amount"))
        .or_else(|| dollars("/rawPrice"))
        .or_else(|| formatted("/formattedPrice"))
        .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string())
}

fn carrier(probe: &Probe<'_>) -> String {
    let record = probe.record;
    probe
        .find("carriers", |c| c.pointer("/marketing/0/name").and_then(Value::as_str))
        .or_else(|| record.pointer("/airline/name").and_then(Value::as_str))
        .or_else(|| record.get("airline").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn tags(record: &Value) -> Vec<Tag> {
    match record.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let tag = text(item).map(Tag);
                if tag.is_none() {
                    log::debug!("Skipped tag that is not a string or number: {}", item);
                }
                tag
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `displayCode`, then `id`, then the value itself when it is a string.
fn airport_code(value: &Value) -> Option<String> {
    value
        .get("displayCode")
        .and_then(Value::as_str)
        .or_else(|| value.get("id").and_then(Value::as_str))
        .or_else(|| value.as_str())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// Non-null value, treating JSON `null` as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Strings verbatim, numbers as written; anything else is absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format::number(n)),
        _ => None,
    }
}

/// Non-negative integral count; tolerates `2.0` but not `2.5` or `-1`.
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && f.is_finite())
            .map(|f| f as u64)
    })
}
