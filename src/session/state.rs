//! Search screen state and its transitions.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{AirportRef, AirportSuggestion, DATE_FORMAT, ReconciledResult, SearchIntent};
use crate::services::normalizer::{build_search_params_on, ensure_not_past};

/// Which airport input an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirportField {
    Origin,
    Destination,
}

/// Text, selection and suggestions of one airport input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub text: String,
    pub selected: Option<AirportRef>,
    pub suggestions: Vec<AirportSuggestion>,
}

/// Why a search could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBlocked {
    /// A search is already pending
    InProgress,
    /// The form does not describe a valid search
    Invalid(ValidationError),
}

/// A search admitted by `SearchState::begin_search`.
///
/// Carries the form generation it was issued for; a result for an older
/// generation is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub intent: SearchIntent,
    generation: u64,
}

/// State owned by the search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    origin: FieldState,
    destination: FieldState,
    travel_date: NaiveDate,
    searching: bool,
    outcome: ReconciledResult,
    error: Option<String>,
    /// Bumped by every edit of the form
    generation: u64,
}

impl SearchState {
    /// Fresh state with the travel date set to `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            origin: FieldState::default(),
            destination: FieldState::default(),
            travel_date: today,
            searching: false,
            outcome: ReconciledResult::Empty,
            error: None,
            generation: 0,
        }
    }

    pub fn field(&self, field: AirportField) -> &FieldState {
        match field {
            AirportField::Origin => &self.origin,
            AirportField::Destination => &self.destination,
        }
    }

    fn field_mut(&mut self, field: AirportField) -> &mut FieldState {
        match field {
            AirportField::Origin => &mut self.origin,
            AirportField::Destination => &mut self.destination,
        }
    }

    pub fn travel_date(&self) -> NaiveDate {
        self.travel_date
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn outcome(&self) -> &ReconciledResult {
        &self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The user typed into an airport input.
    ///
    /// Typing invalidates the previous selection and any displayed results.
    pub fn input_changed(&mut self, field: AirportField, text: impl Into<String>) {
        let input = self.field_mut(field);
        input.text = text.into();
        input.selected = None;
        if input.text.trim().is_empty() {
            input.suggestions.clear();
        }
        self.clear_results();
    }

    /// A lookup for `field` finished. Ignored once an airport is selected.
    pub fn suggestions_loaded(&mut self, field: AirportField, suggestions: Vec<AirportSuggestion>) {
        let input = self.field_mut(field);
        if input.selected.is_none() {
            input.suggestions = suggestions;
        }
    }

    /// The user picked a suggestion.
    pub fn airport_selected(&mut self, field: AirportField, suggestion: &AirportSuggestion) {
        let input = self.field_mut(field);
        let airport = suggestion.to_ref();
        input.text = airport.display_title.clone();
        input.selected = Some(airport);
        input.suggestions.clear();
        self.clear_results();
    }

    /// Change the travel date; dates before `today` are refused.
    pub fn set_travel_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
        self.travel_date = ensure_not_past(date, today)?;
        self.clear_results();
        Ok(())
    }

    /// The intent described by the current form.
    pub fn intent(&self) -> SearchIntent {
        SearchIntent {
            origin: self.origin.selected.clone(),
            destination: self.destination.selected.clone(),
            date: self.travel_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Enter the searching phase.
    ///
    /// Refused while a search is pending; invalid forms, including a travel
    /// date that has fallen before `today`, record the error.
    pub fn begin_search(&mut self, today: NaiveDate) -> Result<SearchTicket, SearchBlocked> {
        if self.searching {
            return Err(SearchBlocked::InProgress);
        }

        let intent = self.intent();
        if let Err(error) = build_search_params_on(&intent, today) {
            self.search_failed(error.to_string());
            return Err(SearchBlocked::Invalid(error));
        }

        self.searching = true;
        self.error = None;
        self.outcome = ReconciledResult::Empty;
        Ok(SearchTicket {
            intent,
            generation: self.generation,
        })
    }

    /// A search returned a classified result.
    ///
    /// Returns false, keeping the cleared results, when the form was edited
    /// after `ticket` was issued.
    pub fn search_completed(&mut self, ticket: &SearchTicket, result: ReconciledResult) -> bool {
        self.searching = false;
        if ticket.generation != self.generation {
            log::debug!("Discarding search results for an edited form");
            return false;
        }
        self.error = result.error_message().map(str::to_string);
        self.outcome = result;
        true
    }

    /// A pending search was abandoned before it returned.
    pub fn search_cancelled(&mut self) {
        self.searching = false;
    }

    /// A search ended without a result.
    pub fn search_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.searching = false;
        self.outcome = ReconciledResult::api_error(message.clone());
        self.error = Some(message);
    }

    fn clear_results(&mut self) {
        self.generation += 1;
        self.outcome = ReconciledResult::Empty;
        self.error = None;
    }
}
