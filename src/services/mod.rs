//! Service layer for the flight search client.
//!
//! This module contains the business logic for:
//! - Query normalization (`build_search_params`, `validate_flight_search_params`)
//! - Response reconciliation (`Reconciler`, `reconcile`)
//! - Upstream API calls (`FlightsClient`)

pub mod flights;
pub mod normalizer;
pub mod reconciler;

pub use flights::FlightsClient;
pub use normalizer::{
    build_search_params, build_search_params_on, ensure_not_past, validate_flight_search_params,
};
pub use reconciler::{Reconciler, reconcile};
