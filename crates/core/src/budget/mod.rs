//! Budget and stop rules for exploration/exploitation search runs.
//!
//! A run moves through `exploring → selecting → exploiting → done`. The
//! [`BudgetController`] owns the run's counters, grants each page before it
//! is fetched and records what came back.

mod controller;
mod types;

pub use controller::BudgetController;
pub use types::*;
