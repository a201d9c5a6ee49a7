//! Variant quality scoring after exploration.

use std::collections::{HashMap, HashSet};

use crate::ranking::Requirements;
use crate::searcher::CandidateProfile;

/// A second variant is kept only when it scores at least this share of the best.
const SECOND_VARIANT_RATIO: f64 = 0.5;

/// Quality of one variant's exploration page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantQuality {
    pub presence: f64,
    pub uniqueness: f64,
}

impl VariantQuality {
    pub fn score(&self) -> f64 {
        self.presence * self.uniqueness
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Share of the must-have criteria (each must-have skill, any target title,
/// any target region) a profile meets.
fn must_have_share(profile: &CandidateProfile, requirements: &Requirements) -> f64 {
    let mut fields = 0usize;
    let mut met = 0usize;

    for skill in requirements.must_have_skills.iter().filter(|s| !s.trim().is_empty()) {
        fields += 1;
        if profile.skills.iter().any(|s| contains_ci(s, skill)) {
            met += 1;
        }
    }

    let titles: Vec<_> = requirements.titles.iter().filter(|t| !t.trim().is_empty()).collect();
    if !titles.is_empty() {
        fields += 1;
        let title = profile
            .current_employer()
            .map(|e| e.title.as_str())
            .unwrap_or_default();
        if titles.iter().any(|t| contains_ci(title, t)) {
            met += 1;
        }
    }

    let regions: Vec<_> = requirements
        .target_regions
        .iter()
        .filter(|r| !r.trim().is_empty())
        .collect();
    if !regions.is_empty() {
        fields += 1;
        if regions.iter().any(|r| contains_ci(&profile.region, r)) {
            met += 1;
        }
    }

    if fields == 0 {
        1.0
    } else {
        met as f64 / fields as f64
    }
}

/// Average must-have share over a page; 0 for an empty page.
pub fn presence(profiles: &[CandidateProfile], requirements: &Requirements) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    profiles
        .iter()
        .map(|p| must_have_share(p, requirements))
        .sum::<f64>()
        / profiles.len() as f64
}

/// Per variant, the share of its identities no other variant returned.
pub fn uniqueness(pages: &[&[CandidateProfile]]) -> Vec<f64> {
    let identities: Vec<HashSet<String>> = pages
        .iter()
        .map(|page| page.iter().filter_map(CandidateProfile::identity_key).collect())
        .collect();

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for ids in &identities {
        for id in ids {
            *occurrences.entry(id.as_str()).or_default() += 1;
        }
    }

    identities
        .iter()
        .map(|ids| {
            if ids.is_empty() {
                return 0.0;
            }
            let only_here = ids.iter().filter(|id| occurrences[id.as_str()] == 1).count();
            only_here as f64 / ids.len() as f64
        })
        .collect()
}

/// Pick up to `max_selected` variants among the `eligible` indices.
///
/// Ranked by score, then presence, then original order. The runner-up is
/// kept only if the best score is positive and it reaches half of it.
pub fn select_variants(
    qualities: &[VariantQuality],
    eligible: &[usize],
    max_selected: usize,
) -> Vec<usize> {
    let mut order: Vec<usize> = eligible.to_vec();
    order.sort_by(|&a, &b| {
        let (qa, qb) = (qualities[a], qualities[b]);
        qb.score()
            .total_cmp(&qa.score())
            .then(qb.presence.total_cmp(&qa.presence))
            .then(a.cmp(&b))
    });

    let Some(&best) = order.first() else {
        return Vec::new();
    };
    let best_score = qualities[best].score();

    let mut selected = vec![best];
    for &index in order.iter().skip(1).take(max_selected.saturating_sub(1)) {
        if best_score > 0.0 && qualities[index].score() >= SECOND_VARIANT_RATIO * best_score {
            selected.push(index);
        }
    }
    selected.truncate(max_selected);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            person_id: id.into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn quality(presence: f64, uniqueness: f64) -> VariantQuality {
        VariantQuality {
            presence,
            uniqueness,
        }
    }

    #[test]
    fn test_presence_averages_must_have_share() {
        let requirements = Requirements {
            must_have_skills: vec!["Rust".into(), "Go".into()],
            ..Default::default()
        };
        let page = vec![person("1", &["Rust", "Golang"]), person("2", &["rust"])];
        assert!((presence(&page, &requirements) - 0.75).abs() < 1e-9);
        assert_eq!(presence(&[], &requirements), 0.0);
    }

    #[test]
    fn test_presence_without_criteria_is_full() {
        let page = vec![person("1", &[])];
        assert_eq!(presence(&page, &Requirements::default()), 1.0);
    }

    #[test]
    fn test_uniqueness_against_other_variants() {
        let a = vec![person("1", &[]), person("2", &[])];
        let b = vec![person("2", &[]), person("3", &[]), person("4", &[]), person("5", &[])];
        let c: Vec<CandidateProfile> = vec![];
        let scores = uniqueness(&[&a, &b, &c]);
        assert_eq!(scores, vec![0.5, 0.75, 0.0]);
    }

    #[test]
    fn test_selects_best_and_close_runner_up() {
        let qualities = [quality(0.8, 0.5), quality(0.9, 0.9), quality(0.2, 0.2)];
        assert_eq!(select_variants(&qualities, &[0, 1, 2], 2), vec![1, 0]);
    }

    #[test]
    fn test_distant_runner_up_is_dropped() {
        let qualities = [quality(1.0, 1.0), quality(0.4, 0.5)];
        assert_eq!(select_variants(&qualities, &[0, 1], 2), vec![0]);
    }

    #[test]
    fn test_ties_break_on_presence_then_order() {
        let qualities = [quality(0.5, 0.4), quality(0.4, 0.5), quality(0.5, 0.4)];
        assert_eq!(select_variants(&qualities, &[0, 1, 2], 3), vec![0, 2, 1]);
    }

    #[test]
    fn test_zero_best_score_keeps_single_variant() {
        let qualities = [quality(1.0, 0.0), quality(0.5, 0.0)];
        assert_eq!(select_variants(&qualities, &[0, 1], 2), vec![0]);
    }

    #[test]
    fn test_only_eligible_variants_are_considered() {
        let qualities = [quality(1.0, 1.0), quality(0.6, 0.9)];
        assert_eq!(select_variants(&qualities, &[1], 2), vec![1]);
        assert!(select_variants(&qualities, &[], 2).is_empty());
    }
}
