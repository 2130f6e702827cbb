// src/services/normalizer.rs

//! Query normalization.
//!
//! Turns a search intent into the exact parameter set `searchFlights`
//! expects, rejecting incomplete or malformed input before any request.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ValidationError;
use crate::models::{CanonicalParams, DATE_FORMAT, ParamCheck, SearchIntent, SearchParams};

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static date pattern"))
}

/// Check the five required fields, then the date layout.
pub fn check_params(params: &SearchParams) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = params
        .fields()
        .into_iter()
        .filter(|(_, value)| value.is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { fields: missing });
    }

    match params.date.as_deref() {
        Some(date) if date_pattern().is_match(date) => Ok(()),
        _ => Err(ValidationError::InvalidDateFormat),
    }
}

/// Form-level validation of loose parameters.
pub fn validate_flight_search_params(params: &SearchParams) -> ParamCheck {
    match check_params(params) {
        Ok(()) => ParamCheck::valid(),
        Err(e) => ParamCheck::invalid(e.to_string()),
    }
}

/// Build canonical request parameters from a search intent.
pub fn build_search_params(intent: &SearchIntent) -> Result<CanonicalParams, ValidationError> {
    let params = intent.to_params();
    check_params(&params)?;

    if let (Some(origin), Some(destination)) = (&intent.origin, &intent.destination) {
        if origin.sky_id == destination.sky_id && origin.entity_id == destination.entity_id {
            return Err(ValidationError::SameAirport);
        }
    }

    // All five fields are present past check_params.
    let SearchParams {
        origin_sky_id,
        origin_entity_id,
        destination_sky_id,
        destination_entity_id,
        date,
    } = params;

    Ok(CanonicalParams::with_defaults(
        origin_sky_id.unwrap_or_default(),
        origin_entity_id.unwrap_or_default(),
        destination_sky_id.unwrap_or_default(),
        destination_entity_id.unwrap_or_default(),
        date.unwrap_or_default(),
    ))
}

/// `build_search_params`, also refusing dates that are not real calendar
/// days or fall before `today`.
pub fn build_search_params_on(
    intent: &SearchIntent,
    today: NaiveDate,
) -> Result<CanonicalParams, ValidationError> {
    let params = build_search_params(intent)?;
    let date = NaiveDate::parse_from_str(&params.date, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat)?;
    ensure_not_past(date, today)?;
    Ok(params)
}

/// Reject travel dates before `today`. Time of day plays no part.
pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if date < today {
        return Err(ValidationError::DateInPast {
            date: date.format(DATE_FORMAT).to_string(),
            today: today.format(DATE_FORMAT).to_string(),
        });
    }
    Ok(date)
}
