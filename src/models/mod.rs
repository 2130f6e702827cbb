// src/models/mod.rs

//! Domain models for the flight search client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod airport;
mod config;
mod itinerary;
mod search;

// Re-export all public types
pub use airport::{AirportRef, AirportSuggestion, Presentation};
pub use config::{ApiConfig, Clock, Config, DisplayConfig, LoggingConfig, SearchConfig};
pub use itinerary::{
    Itinerary, ItineraryId, LegSummary, PRICE_UNAVAILABLE, ReconciledResult, Tag, TagColor,
    TagKind,
};
pub use search::{CanonicalParams, DATE_FORMAT, ParamCheck, SearchIntent, SearchParams};
