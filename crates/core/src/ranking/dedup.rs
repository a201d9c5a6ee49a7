//! Candidate deduplication and exclusion.

use std::collections::HashSet;

use crate::searcher::{CandidateProfile, PostProcessing};

/// Drop repeated identities, keeping the first occurrence.
///
/// Identity is `person_id`, else `profile_url`. Candidates with neither are
/// always kept. Returns the survivors and the number removed.
pub fn deduplicate(candidates: Vec<CandidateProfile>) -> (Vec<CandidateProfile>, usize) {
    let mut seen = HashSet::new();
    let before = candidates.len();
    let unique: Vec<_> = candidates
        .into_iter()
        .filter(|c| match c.identity_key() {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect();
    let removed = before - unique.len();
    (unique, removed)
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Remove candidates matching the exclusion lists.
///
/// `exclude_profiles` matches the profile URL (case and trailing slash
/// ignored) or the person id; `exclude_names` matches the full name
/// case-insensitively.
pub fn apply_exclusions(
    candidates: Vec<CandidateProfile>,
    exclusions: &PostProcessing,
) -> (Vec<CandidateProfile>, usize) {
    if exclusions.is_empty() {
        return (candidates, 0);
    }

    let profiles: HashSet<String> = exclusions
        .exclude_profiles
        .iter()
        .map(|p| normalize_url(p))
        .filter(|p| !p.is_empty())
        .collect();
    let names: HashSet<String> = exclusions
        .exclude_names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();

    let before = candidates.len();
    let kept: Vec<_> = candidates
        .into_iter()
        .filter(|c| {
            let url_hit = !c.profile_url.is_empty() && profiles.contains(&normalize_url(&c.profile_url));
            let id_hit = !c.person_id.is_empty() && profiles.contains(&c.person_id.to_lowercase());
            let name_hit = names.contains(&c.name.trim().to_lowercase());
            !(url_hit || id_hit || name_hit)
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Count identities in `candidates` not present in `seen`, adding them.
pub fn count_new_identities(candidates: &[CandidateProfile], seen: &mut HashSet<String>) -> usize {
    candidates
        .iter()
        .filter_map(CandidateProfile::identity_key)
        .filter(|key| seen.insert(key.clone()))
        .count()
}
