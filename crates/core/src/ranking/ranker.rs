//! Ranking of a pooled candidate set.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::searcher::{CandidateProfile, PostProcessing};

use super::dedup::{apply_exclusions, deduplicate};
use super::scorer::score;
use super::types::{RankedCandidate, RankingOutcome, Requirements};

/// Candidates kept in a ranking result.
pub const MAX_RANKED: usize = 25;

/// Deduplicate, exclude, score and sort candidates, best first.
///
/// Ties keep retrieval order. Statistics cover every candidate that survived
/// deduplication and exclusion; only the top [`MAX_RANKED`] are returned.
pub fn rank(
    candidates: Vec<CandidateProfile>,
    requirements: &Requirements,
    exclusions: &PostProcessing,
    evaluated_at: DateTime<Utc>,
) -> RankingOutcome {
    let (unique, duplicates_removed) = deduplicate(candidates);
    let (eligible, excluded) = apply_exclusions(unique, exclusions);

    if eligible.is_empty() {
        return RankingOutcome {
            duplicates_removed,
            excluded,
            ..RankingOutcome::empty()
        };
    }

    let mut ranked: Vec<RankedCandidate> = eligible
        .into_iter()
        .map(|profile| {
            let card = score(&profile, requirements, evaluated_at);
            RankedCandidate {
                profile,
                score: card.score,
                rationale: card.rationale,
            }
        })
        .collect();

    // stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let total_candidates = ranked.len();
    let top_score = ranked[0].score;
    let average_score =
        ranked.iter().map(|c| c.score as f64).sum::<f64>() / total_candidates as f64;

    ranked.truncate(MAX_RANKED);
    let candidates_returned = ranked.len();

    debug!(
        total_candidates,
        candidates_returned, duplicates_removed, excluded, top_score, "Ranked candidates"
    );

    RankingOutcome {
        ranked_candidates: ranked,
        total_candidates,
        candidates_returned,
        top_score,
        average_score,
        duplicates_removed,
        excluded,
        note: format!(
            "Returning top {} of {} candidates",
            candidates_returned, total_candidates
        ),
    }
}
