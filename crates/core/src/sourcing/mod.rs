//! Sourcing runs: explore several filter variants, keep the productive ones
//! and page through them under a budget, then rank the pooled candidates.

mod runner;
mod selection;
mod types;
mod variants;

pub use runner::SourcingRun;
pub use selection::{presence, select_variants, uniqueness, VariantQuality};
pub use types::*;
pub use variants::{derive_variants, prepare_variants};
