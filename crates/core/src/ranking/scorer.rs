//! Weighted fit score for a single candidate.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::searcher::CandidateProfile;

use super::types::{Requirements, ScoreCard};

const TITLE_MATCH: i64 = 20;
const MUST_HAVE_SKILL: i64 = 8;
const NICE_TO_HAVE_SKILL: i64 = 3;
/// Skills per list that can earn points.
const SKILL_CAP: usize = 10;
const EXPERIENCE_IN_BAND: i64 = 10;
const EXPERIENCE_ABOVE_BAND: i64 = 3;
const EXPERIENCE_BELOW_BAND: i64 = -10;
const COMPANY_SIZE_MATCH: i64 = 10;
const INDUSTRY_MATCH: i64 = 5;
const REGION_EXACT: i64 = 10;
const REGION_APPROXIMATE: i64 = 5;
const RECENT_ROLE: i64 = 5;
const EXCLUDED_EMPLOYER: i64 = -100;
const RECENT_ROLE_DAYS: i64 = 3 * 365;
const MAX_RATIONALE: usize = 3;
const RATIONALE_SKILLS: usize = 3;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_ci(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.to_lowercase() == b.trim().to_lowercase()
}

fn has_skill(candidate: &CandidateProfile, skill: &str) -> bool {
    candidate.skills.iter().any(|s| contains_ci(s, skill))
}

fn title_matches(current_title: &str, requirements: &Requirements) -> bool {
    requirements
        .titles
        .iter()
        .any(|t| contains_ci(current_title, t))
}

/// Parse an ISO-8601 start date. Values without an offset are taken as UTC.
pub fn parse_start_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn is_recent_role(start_date: &str, evaluated_at: DateTime<Utc>) -> bool {
    parse_start_date(start_date)
        .is_some_and(|start| start >= evaluated_at - Duration::days(RECENT_ROLE_DAYS))
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{}", years as i64)
    } else {
        format!("{}", years)
    }
}

/// Score a candidate against the requirements.
///
/// Pure: the same inputs always produce the same card. `evaluated_at` is the
/// reference time for the recent-role bonus.
pub fn score(
    candidate: &CandidateProfile,
    requirements: &Requirements,
    evaluated_at: DateTime<Utc>,
) -> ScoreCard {
    let employer = candidate.current_employer();
    let current_title = employer.map(|e| e.title.as_str()).unwrap_or_default();
    let mut total: i64 = 0;

    let title_match = title_matches(current_title, requirements);
    if title_match {
        total += TITLE_MATCH;
    }

    total += requirements
        .must_have_skills
        .iter()
        .take(SKILL_CAP)
        .filter(|skill| has_skill(candidate, skill))
        .count() as i64
        * MUST_HAVE_SKILL;

    total += requirements
        .nice_to_have_skills
        .iter()
        .take(SKILL_CAP)
        .filter(|skill| has_skill(candidate, skill))
        .count() as i64
        * NICE_TO_HAVE_SKILL;

    let years = candidate.years_of_experience_raw;
    let (min_years, max_years) = requirements.experience_band();
    // In-band wins over both out-of-band checks, even for an inverted band.
    if years >= min_years && years <= max_years {
        total += EXPERIENCE_IN_BAND;
    } else if years > max_years {
        total += EXPERIENCE_ABOVE_BAND;
    } else {
        total += EXPERIENCE_BELOW_BAND;
    }

    let headcount = employer.map(|e| e.company_headcount_latest).unwrap_or(0);
    let (min_size, max_size) = requirements.company_size_band();
    if (min_size..=max_size).contains(&headcount) {
        total += COMPANY_SIZE_MATCH;
    }

    if let Some(employer) = employer {
        let industry_match = requirements.target_industries.iter().any(|target| {
            employer
                .company_industries
                .iter()
                .any(|industry| contains_ci(industry, target))
        });
        if industry_match {
            total += INDUSTRY_MATCH;
        }
    }

    let region = candidate.region.trim();
    if requirements
        .target_regions
        .iter()
        .any(|r| eq_ci(r, region))
    {
        total += REGION_EXACT;
    } else if requirements
        .target_regions
        .iter()
        .any(|r| contains_ci(region, r))
    {
        total += REGION_APPROXIMATE;
    }

    if let Some(employer) = employer {
        if is_recent_role(&employer.start_date, evaluated_at) {
            total += RECENT_ROLE;
        }
        let excluded = requirements
            .exclude_companies
            .iter()
            .any(|c| !employer.name.trim().is_empty() && eq_ci(c, &employer.name));
        if excluded {
            total += EXCLUDED_EMPLOYER;
        }
    }

    ScoreCard {
        score: total.max(0) as u32,
        rationale: rationale(candidate, requirements, title_match),
    }
}

fn rationale(candidate: &CandidateProfile, requirements: &Requirements, title_match: bool) -> Vec<String> {
    let employer = candidate.current_employer();
    let mut reasons = Vec::new();

    if title_match {
        let title = employer.map(|e| e.title.as_str()).unwrap_or_default();
        reasons.push(format!("Strong title match: {}", title));
    }

    let matched: Vec<&str> = requirements
        .must_have_skills
        .iter()
        .filter(|skill| has_skill(candidate, skill))
        .take(RATIONALE_SKILLS)
        .map(String::as_str)
        .collect();
    if !matched.is_empty() {
        reasons.push(format!("Key skills: {}", matched.join(", ")));
    }

    reasons.push(format!(
        "{} years of experience",
        format_years(candidate.years_of_experience_raw)
    ));

    if let Some(employer) = employer.filter(|e| !e.name.is_empty()) {
        reasons.push(format!(
            "Currently at {} ({} employees)",
            employer.name,
            group_thousands(employer.company_headcount_latest)
        ));
    }

    reasons.truncate(MAX_RATIONALE);
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::EmploymentRecord;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn engineer() -> CandidateProfile {
        CandidateProfile {
            person_id: "p1".into(),
            name: "Sam Rivera".into(),
            region: "San Francisco Bay Area".into(),
            years_of_experience_raw: 6.0,
            skills: strings(&["Python", "Kubernetes"]),
            current_employers: vec![EmploymentRecord {
                name: "Initech".into(),
                title: "Senior Software Engineer".into(),
                start_date: "2024-02-01T00:00:00Z".into(),
                company_headcount_latest: 1200,
                company_industries: strings(&["Software Development"]),
            }],
            ..Default::default()
        }
    }

    fn requirements() -> Requirements {
        Requirements {
            titles: strings(&["Software Engineer"]),
            must_have_skills: strings(&["Python"]),
            min_experience: Some(5.0),
            max_experience: Some(8.0),
            target_regions: strings(&["San Francisco Bay Area"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_scenario_scores_at_least_53() {
        let card = score(&engineer(), &requirements(), now());
        // 20 title + 8 skill + 10 experience + 10 region + 5 recency + 10 company size
        assert_eq!(card.score, 63);
        assert!(card.score >= 53);
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = score(&engineer(), &requirements(), now());
        let b = score(&engineer(), &requirements(), now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_never_negative() {
        let candidate = CandidateProfile {
            years_of_experience_raw: 1.0,
            current_employers: vec![EmploymentRecord {
                name: "Rival Corp".into(),
                company_headcount_latest: 10,
                ..Default::default()
            }],
            ..Default::default()
        };
        let req = Requirements {
            min_experience: Some(10.0),
            company_size_min: Some(500),
            exclude_companies: strings(&["rival corp"]),
            ..Default::default()
        };
        assert_eq!(score(&candidate, &req, now()).score, 0);
    }

    #[test]
    fn test_experience_bands() {
        let req = requirements();
        let mut candidate = engineer();
        candidate.current_employers.clear();
        candidate.region.clear();
        candidate.skills.clear();

        // in band: 10 exp + 10 company (headcount 0 within default band)
        assert_eq!(score(&candidate, &req, now()).score, 20);
        candidate.years_of_experience_raw = 12.0;
        assert_eq!(score(&candidate, &req, now()).score, 13);
        candidate.years_of_experience_raw = 2.0;
        assert_eq!(score(&candidate, &req, now()).score, 0);
    }

    #[test]
    fn test_skills_are_substring_matched_and_capped() {
        let candidate = CandidateProfile {
            skills: (0..12).map(|i| format!("Skill{} (advanced)", i)).collect(),
            years_of_experience_raw: 200.0,
            ..Default::default()
        };
        let req = Requirements {
            must_have_skills: (0..12).map(|i| format!("skill{}", i)).collect(),
            company_size_min: Some(1),
            ..Default::default()
        };
        // 10 capped must-haves + 3 above-band experience
        assert_eq!(score(&candidate, &req, now()).score, 83);
    }

    #[test]
    fn test_region_exact_beats_approximate() {
        let req = Requirements {
            target_regions: strings(&["Berlin"]),
            company_size_min: Some(1),
            min_experience: Some(0.0),
            max_experience: Some(100.0),
            ..Default::default()
        };
        let mut candidate = CandidateProfile {
            region: "berlin".into(),
            ..Default::default()
        };
        assert_eq!(score(&candidate, &req, now()).score, 20);
        candidate.region = "Berlin, Germany".into();
        assert_eq!(score(&candidate, &req, now()).score, 15);
    }

    #[test]
    fn test_region_exact_folds_unicode_case() {
        let req = Requirements {
            target_regions: strings(&["München"]),
            company_size_min: Some(1),
            ..Default::default()
        };
        let candidate = CandidateProfile {
            region: "MÜNCHEN".into(),
            ..Default::default()
        };
        // 10 experience + 10 exact region
        assert_eq!(score(&candidate, &req, now()).score, 20);
    }

    #[test]
    fn test_excluded_employer_folds_unicode_case() {
        let candidate = CandidateProfile {
            current_employers: vec![EmploymentRecord {
                name: "ÉCOLE Corp".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let req = Requirements {
            exclude_companies: strings(&["école corp"]),
            ..Default::default()
        };
        assert_eq!(score(&candidate, &req, now()).score, 0);

        let other = Requirements {
            exclude_companies: strings(&["Globex"]),
            ..Default::default()
        };
        // 10 experience + 10 company size
        assert_eq!(score(&candidate, &other, now()).score, 20);
    }

    #[test]
    fn test_inverted_experience_band_prefers_above() {
        let req = Requirements {
            min_experience: Some(10.0),
            max_experience: Some(5.0),
            company_size_min: Some(1),
            ..Default::default()
        };
        let candidate = CandidateProfile {
            years_of_experience_raw: 7.0,
            ..Default::default()
        };
        assert_eq!(score(&candidate, &req, now()).score, 3);
    }

    #[test]
    fn test_recency_window() {
        let req = Requirements {
            company_size_min: Some(u64::MAX),
            ..Default::default()
        };
        let mut candidate = CandidateProfile {
            current_employers: vec![EmploymentRecord {
                start_date: "2022-06-03".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(score(&candidate, &req, now()).score, 15);

        candidate.current_employers[0].start_date = "2019-01-01T00:00:00".into();
        assert_eq!(score(&candidate, &req, now()).score, 10);

        candidate.current_employers[0].start_date = "last spring".into();
        assert_eq!(score(&candidate, &req, now()).score, 10);
    }

    #[test]
    fn test_industry_match() {
        let req = Requirements {
            target_industries: strings(&["software"]),
            ..Default::default()
        };
        let card = score(&engineer(), &req, now());
        // 10 exp + 10 company + 5 industry + 5 recency
        assert_eq!(card.score, 30);
    }

    #[test]
    fn test_rationale_order_and_cap() {
        let card = score(&engineer(), &requirements(), now());
        assert_eq!(
            card.rationale,
            vec![
                "Strong title match: Senior Software Engineer".to_string(),
                "Key skills: Python".to_string(),
                "6 years of experience".to_string(),
            ]
        );
    }

    #[test]
    fn test_rationale_mentions_employer_with_separators() {
        let req = Requirements::default();
        let card = score(&engineer(), &req, now());
        assert_eq!(
            card.rationale,
            vec![
                "6 years of experience".to_string(),
                "Currently at Initech (1,200 employees)".to_string(),
            ]
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_parse_start_date_formats() {
        assert!(parse_start_date("2023-04-01T10:00:00Z").is_some());
        assert!(parse_start_date("2023-04-01T10:00:00+02:00").is_some());
        assert!(parse_start_date("2023-04-01").is_some());
        assert!(parse_start_date("").is_none());
        assert!(parse_start_date("04/01/2023").is_none());
    }
}
