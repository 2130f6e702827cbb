//! Search screen session.
//!
//! - `SearchState`: fields, selections, results and the searching flag
//! - `Debouncer`: coalesces keystrokes into one airport lookup
//! - `SearchController`: wires both to a `FlightsClient`

mod controller;
mod debounce;
mod state;

pub use controller::SearchController;
pub use debounce::{DebounceToken, Debouncer};
pub use state::{AirportField, FieldState, SearchBlocked, SearchState, SearchTicket};
