//! Testing utilities and mock implementations.
//!
//! Mocks for the external service traits ([`PeopleSearcher`] and
//! [`LlmClient`]) so runs, tools and agent sessions can be tested without
//! network access.
//!
//! [`PeopleSearcher`]: crate::searcher::PeopleSearcher
//! [`LlmClient`]: crate::agent::LlmClient
//!
//! # Example
//!
//! ```rust,ignore
//! use recruiter_core::testing::{fixtures, MockLlmClient, MockPeopleSearcher};
//!
//! let searcher = MockPeopleSearcher::new();
//! searcher.add_page("Rust", fixtures::page("rust", 200, Some("next"))).await;
//!
//! let llm = MockLlmClient::new();
//! llm.push_text("Here are your candidates.").await;
//! ```

mod mock_llm;
mod mock_searcher;

pub use mock_llm::MockLlmClient;
pub use mock_searcher::MockPeopleSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::searcher::{estimate_credits, CandidateProfile, EmploymentRecord, SearchPage};

    /// Create a candidate with reasonable defaults.
    pub fn profile(person_id: &str, title: &str, skills: &[&str]) -> CandidateProfile {
        CandidateProfile {
            person_id: person_id.to_string(),
            name: format!("Candidate {}", person_id),
            headline: format!("{} | {}", title, skills.join(", ")),
            region: "Berlin, Germany".to_string(),
            years_of_experience_raw: 6.0,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            current_employers: vec![EmploymentRecord {
                name: "Acme Cloud".to_string(),
                title: title.to_string(),
                start_date: "2021-03-01".to_string(),
                company_headcount_latest: 850,
                company_industries: vec!["Software Development".to_string()],
            }],
            profile_url: format!("https://www.linkedin.com/in/{}", person_id),
        }
    }

    /// A page of `count` distinct candidates with ids `{prefix}-{i}`.
    pub fn page(prefix: &str, count: usize, next_cursor: Option<&str>) -> SearchPage {
        SearchPage {
            profiles: (0..count)
                .map(|i| {
                    profile(
                        &format!("{}-{}", prefix, i),
                        "Backend Engineer",
                        &["Rust", "PostgreSQL"],
                    )
                })
                .collect(),
            next_cursor: next_cursor.map(str::to_string),
            total_results: count,
            skipped_profiles: 0,
            credits_used: estimate_credits(count),
            duration_ms: 5,
        }
    }

    /// A profile in the untruncated shape the search API returns.
    pub fn api_profile(person_id: &str) -> Value {
        json!({
            "person_id": person_id,
            "name": format!("Candidate {}", person_id),
            "headline": "Staff Engineer",
            "region": "San Francisco Bay Area",
            "years_of_experience_raw": 11,
            "skills": ["Rust", "Go", "Kubernetes", "gRPC", "PostgreSQL", "Kafka",
                       "Terraform", "AWS", "Linux", "Python", "Redis", "Docker"],
            "current_employers": [
                {
                    "name": "Globex",
                    "title": "Staff Engineer",
                    "start_date": "2019-06-01T00:00:00",
                    "company_headcount_latest": 12000,
                    "company_industries": ["Software", "Cloud", "Security", "Fintech"],
                    "company_website_domain": "globex.example"
                },
                {"name": "Initech", "title": "Engineer"}
            ],
            "past_employers": [{"name": "Hooli"}],
            "flagship_profile_url": format!("https://www.linkedin.com/in/{}", person_id),
            "profile_url": format!("https://www.linkedin.com/in/{}", person_id),
            "emails": ["someone@example.com"]
        })
    }

    /// A search API response body.
    pub fn api_response(profiles: Vec<Value>, next_cursor: Option<&str>) -> Value {
        json!({
            "profiles": profiles,
            "next_cursor": next_cursor,
        })
    }
}
