//! Search screen controller.
//!
//! Drives `SearchState` from UI events: debounced airport lookups per
//! field, and at most one flight search at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::models::{AirportSuggestion, ReconciledResult};
use crate::services::FlightsClient;
use crate::session::debounce::Debouncer;
use crate::session::state::{AirportField, SearchBlocked, SearchState};
use crate::utils::http::Transport;

/// Owns the screen state and the client it talks to.
pub struct SearchController<T: Transport> {
    client: FlightsClient<T>,
    state: Mutex<SearchState>,
    origin_lookup: Debouncer,
    destination_lookup: Debouncer,
}

impl<T: Transport> SearchController<T> {
    pub fn new(client: FlightsClient<T>, today: NaiveDate) -> Self {
        let quiet = client.config().search.debounce();
        Self {
            client,
            state: Mutex::new(SearchState::new(today)),
            origin_lookup: Debouncer::new(quiet),
            destination_lookup: Debouncer::new(quiet),
        }
    }

    pub fn client(&self) -> &FlightsClient<T> {
        &self.client
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.state().clone()
    }

    // Never held across an await.
    fn state(&self) -> MutexGuard<'_, SearchState> {
        lock(&self.state)
    }

    fn debouncer(&self, field: AirportField) -> &Debouncer {
        match field {
            AirportField::Origin => &self.origin_lookup,
            AirportField::Destination => &self.destination_lookup,
        }
    }

    /// Handle a keystroke in an airport input.
    ///
    /// Resolves after the quiet period. Returns true only for the call whose
    /// lookup result was committed; superseded calls make no request.
    pub async fn query_changed(&self, field: AirportField, text: impl Into<String>) -> bool {
        let text = text.into();
        self.state().input_changed(field, text.clone());

        let debouncer = self.debouncer(field);
        let token = debouncer.schedule();
        if text.trim().is_empty() || !debouncer.settle(token).await {
            return false;
        }

        let suggestions = self.client.search_airport(&text).await;
        if !debouncer.is_current(token) {
            log::debug!("Discarding stale airport suggestions for {:?}", text);
            return false;
        }

        self.state().suggestions_loaded(field, suggestions);
        true
    }

    /// Pick a suggestion, cancelling any pending lookup for that field.
    pub fn select_airport(&self, field: AirportField, suggestion: &AirportSuggestion) {
        self.debouncer(field).cancel();
        self.state().airport_selected(field, suggestion);
    }

    /// Change the travel date, refusing days before the local today.
    pub fn set_travel_date(&self, date: NaiveDate) -> Result<(), ValidationError> {
        self.set_travel_date_on(date, Local::now().date_naive())
    }

    pub fn set_travel_date_on(&self, date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        self.state().set_travel_date(date, today)
    }

    /// Run a flight search from the current form.
    ///
    /// Returns `None` without touching the network while another search is
    /// pending. Results for a form edited mid-search are dropped and the
    /// cleared outcome is returned instead.
    pub async fn search(&self) -> Option<ReconciledResult> {
        self.search_on(Local::now().date_naive()).await
    }

    /// `search` with an explicit current date.
    pub async fn search_on(&self, today: NaiveDate) -> Option<ReconciledResult> {
        let ticket = match self.state().begin_search(today) {
            Ok(ticket) => ticket,
            Err(SearchBlocked::InProgress) => {
                log::debug!("Search already in progress, ignoring");
                return None;
            }
            Err(SearchBlocked::Invalid(error)) => {
                return Some(ReconciledResult::api_error(error.to_string()));
            }
        };

        let mut in_flight = InFlight {
            state: &self.state,
            done: false,
        };
        let result = self.client.search_flights_on(&ticket.intent, today).await;
        in_flight.done = true;

        let mut state = self.state();
        if state.search_completed(&ticket, result.clone()) {
            Some(result)
        } else {
            Some(state.outcome().clone())
        }
    }
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets the searching flag when a search future is dropped mid-request.
struct InFlight<'a> {
    state: &'a Mutex<SearchState>,
    done: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            log::debug!("Flight search dropped before it returned");
            lock(self.state).search_cancelled();
        }
    }
}
