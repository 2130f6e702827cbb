//! Search input and the canonical request parameters derived from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AirportRef;

/// Date layout expected by the flight API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Search input as declared by the user.
///
/// Airports are selected suggestions, never free text. `date` is kept as a
/// string so that malformed input can be rejected by validation instead of
/// being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIntent {
    pub origin: Option<AirportRef>,
    pub destination: Option<AirportRef>,
    pub date: String,
}

impl SearchIntent {
    /// Build an intent for a calendar date.
    pub fn on(origin: AirportRef, destination: AirportRef, date: NaiveDate) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            date: date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Flatten into the loose five-field parameter form.
    pub fn to_params(&self) -> SearchParams {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        SearchParams {
            origin_sky_id: self.origin.as_ref().and_then(|a| non_empty(&a.sky_id)),
            origin_entity_id: self.origin.as_ref().and_then(|a| non_empty(&a.entity_id)),
            destination_sky_id: self.destination.as_ref().and_then(|a| non_empty(&a.sky_id)),
            destination_entity_id: self
                .destination
                .as_ref()
                .and_then(|a| non_empty(&a.entity_id)),
            date: non_empty(&self.date),
        }
    }
}

/// The five user-derived search fields, any of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin_sky_id: Option<String>,
    pub origin_entity_id: Option<String>,
    pub destination_sky_id: Option<String>,
    pub destination_entity_id: Option<String>,
    pub date: Option<String>,
}

impl SearchParams {
    /// Field names paired with their values, in validation order.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("originSkyId", self.origin_sky_id.as_deref()),
            ("originEntityId", self.origin_entity_id.as_deref()),
            ("destinationSkyId", self.destination_sky_id.as_deref()),
            ("destinationEntityId", self.destination_entity_id.as_deref()),
            ("date", self.date.as_deref()),
        ]
    }
}

/// Outcome of checking loose parameters, for form feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ParamCheck {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Exact query parameter set sent to `searchFlights`.
///
/// Passenger, currency, market and cabin values are fixed policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalParams {
    pub origin_sky_id: String,
    pub origin_entity_id: String,
    pub destination_sky_id: String,
    pub destination_entity_id: String,
    pub date: String,
    pub adults: u32,
    pub currency: &'static str,
    pub market: &'static str,
    pub country_code: &'static str,
    pub cabin_class: &'static str,
    pub sort_by: &'static str,
}

impl CanonicalParams {
    pub const ADULTS: u32 = 1;
    pub const CURRENCY: &'static str = "USD";
    pub const MARKET: &'static str = "US";
    pub const COUNTRY_CODE: &'static str = "US";
    pub const CABIN_CLASS: &'static str = "economy";
    pub const SORT_BY: &'static str = "best";

    pub(crate) fn with_defaults(
        origin_sky_id: String,
        origin_entity_id: String,
        destination_sky_id: String,
        destination_entity_id: String,
        date: String,
    ) -> Self {
        Self {
            origin_sky_id,
            origin_entity_id,
            destination_sky_id,
            destination_entity_id,
            date,
            adults: Self::ADULTS,
            currency: Self::CURRENCY,
            market: Self::MARKET,
            country_code: Self::COUNTRY_CODE,
            cabin_class: Self::CABIN_CLASS,
            sort_by: Self::SORT_BY,
        }
    }

    /// Query pairs in wire order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("originSkyId", self.origin_sky_id.clone()),
            ("originEntityId", self.origin_entity_id.clone()),
            ("destinationSkyId", self.destination_sky_id.clone()),
            ("destinationEntityId", self.destination_entity_id.clone()),
            ("date", self.date.clone()),
            ("adults", self.adults.to_string()),
            ("currency", self.currency.to_string()),
            ("market", self.market.to_string()),
            ("countryCode", self.country_code.to_string()),
            ("cabinClass", self.cabin_class.to_string()),
            ("sortBy", self.sort_by.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
