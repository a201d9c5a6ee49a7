//! Candidate scoring, deduplication and ranking.

mod dedup;
mod ranker;
mod scorer;
mod types;

pub use dedup::{apply_exclusions, count_new_identities, deduplicate};
pub use ranker::{rank, MAX_RANKED};
pub use scorer::{group_thousands, parse_start_date, score};
pub use types::*;
