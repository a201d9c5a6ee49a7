//! Tool catalogue exposed to the model and the dispatcher that executes it.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::filter::{FilterError, FilterNode, FilterRequest, FILTER_TYPES};
use crate::ranking::{rank, RankingOutcome, Requirements};
use crate::searcher::{
    CandidateProfile, PeopleSearchOutput, PeopleSearcher, SearchError, SearchRequest,
};

use super::llm::ToolSpec;

pub const PEOPLE_SEARCH: &str = "people_search";
pub const FILTER_BUILDER: &str = "filter_builder";
pub const CANDIDATE_RANKER: &str = "candidate_ranker";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl ToolError {
    /// Failures caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        match self {
            ToolError::UnknownTool(_) | ToolError::InvalidInput(_) | ToolError::Filter(_) => true,
            ToolError::Search(e) => e.is_validation(),
        }
    }
}

fn filter_schema() -> Value {
    json!({
        "type": "object",
        "description": "Either a condition {column, type, value} or a group {op: \"and\"|\"or\", conditions: [...]}",
        "properties": {
            "column": {"type": "string"},
            "type": {"type": "string", "enum": ["=", "!=", "in", "not_in", ">", "<", "=>", "=<", "(.)"]},
            "value": {},
            "op": {"type": "string", "enum": ["and", "or"]},
            "conditions": {"type": "array", "items": {"type": "object"}}
        }
    })
}

fn requirements_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "titles": {"type": "array", "items": {"type": "string"}},
            "must_have_skills": {"type": "array", "items": {"type": "string"}},
            "nice_to_have_skills": {"type": "array", "items": {"type": "string"}},
            "min_experience": {"type": "number"},
            "max_experience": {"type": "number"},
            "company_size_min": {"type": "integer"},
            "company_size_max": {"type": "integer"},
            "target_industries": {"type": "array", "items": {"type": "string"}},
            "target_regions": {"type": "array", "items": {"type": "string"}},
            "exclude_companies": {"type": "array", "items": {"type": "string"}},
            "exclude_names": {"type": "array", "items": {"type": "string"}},
            "exclude_profiles": {"type": "array", "items": {"type": "string"}}
        }
    })
}

/// Tools offered to the model.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: PEOPLE_SEARCH.to_string(),
            description: "Search the People Discovery database with a filter tree. Returns one \
                page of truncated profiles and a cursor. Keep filters identical when paginating \
                with a cursor. Costs 3 credits per 100 results; use 200 per call."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filters": filter_schema(),
                    "limit": {"type": "integer", "minimum": 1, "maximum": 1000, "default": 200},
                    "cursor": {"type": ["string", "null"]},
                    "post_processing": {
                        "type": "object",
                        "properties": {
                            "exclude_profiles": {"type": "array", "items": {"type": "string"}},
                            "exclude_names": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                },
                "required": ["filters"]
            }),
        },
        ToolSpec {
            name: FILTER_BUILDER.to_string(),
            description: "Build a valid filter tree for a common intent: title, skills, \
                experience, company, region, or combined (an AND of previously built filters)."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filter_type": {"type": "string", "enum": FILTER_TYPES},
                    "titles": {"type": "array", "items": {"type": "string"}},
                    "skills": {"type": "array", "items": {"type": "string"}},
                    "regions": {"type": "array", "items": {"type": "string"}},
                    "fuzzy": {"type": "boolean", "default": true},
                    "min_years": {"type": "integer", "minimum": 0},
                    "max_years": {"type": "integer", "minimum": 0},
                    "company_size_min": {"type": "integer"},
                    "company_size_max": {"type": "integer"},
                    "industries": {"type": "array", "items": {"type": "string"}},
                    "exclude_companies": {"type": "array", "items": {"type": "string"}},
                    "filter_components": {"type": "array", "items": filter_schema()}
                },
                "required": ["filter_type"]
            }),
        },
        ToolSpec {
            name: CANDIDATE_RANKER.to_string(),
            description: "Deduplicate, score and rank candidate profiles against the \
                requirements. Returns the top 25 with short rationales and score statistics."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "candidates": {"type": "array", "items": {"type": "object"}},
                    "requirements": requirements_schema()
                },
                "required": ["candidates", "requirements"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct RankerInput {
    #[serde(default)]
    candidates: Vec<CandidateProfile>,
    #[serde(default)]
    requirements: Requirements,
}

/// `filter_builder` without a searcher.
pub fn build_filter(input: &Value) -> Result<FilterNode, ToolError> {
    Ok(FilterRequest::from_json(input)?.build()?)
}

/// `candidate_ranker` without a searcher. Input is `{candidates, requirements}`.
pub fn rank_candidates(input: Value) -> Result<RankingOutcome, ToolError> {
    let input: RankerInput =
        serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;
    let exclusions = input.requirements.exclusions();
    Ok(rank(input.candidates, &input.requirements, &exclusions, Utc::now()))
}

/// Executes tool calls against the configured searcher.
#[derive(Clone)]
pub struct ToolDispatcher {
    searcher: Arc<dyn PeopleSearcher>,
}

impl ToolDispatcher {
    pub fn new(searcher: Arc<dyn PeopleSearcher>) -> Self {
        Self { searcher }
    }

    /// Run one page of a people search and shape it for the caller.
    pub async fn people_search(&self, input: Value) -> Result<PeopleSearchOutput, ToolError> {
        let request: SearchRequest =
            serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        let page = self.searcher.search(&request).await?;
        Ok(PeopleSearchOutput::from_page(&page))
    }

    pub fn filter_builder(&self, input: &Value) -> Result<FilterNode, ToolError> {
        build_filter(input)
    }

    pub fn candidate_ranker(&self, input: Value) -> Result<RankingOutcome, ToolError> {
        rank_candidates(input)
    }

    async fn execute(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let to_value = |v: Result<Value, serde_json::Error>| {
            v.map_err(|e| ToolError::InvalidInput(e.to_string()))
        };
        match name {
            PEOPLE_SEARCH => to_value(serde_json::to_value(self.people_search(input).await?)),
            FILTER_BUILDER => to_value(serde_json::to_value(self.filter_builder(&input)?)),
            CANDIDATE_RANKER => to_value(serde_json::to_value(self.candidate_ranker(input)?)),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// Execute a tool call and render the result as a JSON string.
    ///
    /// Failures are rendered as `{"error": ...}`; the flag is true for them.
    pub async fn dispatch(&self, name: &str, input: Value) -> (String, bool) {
        debug!(tool = name, "Dispatching tool call");
        match self.execute(name, input).await {
            Ok(value) => (value.to_string(), false),
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                (json!({ "error": e.to_string() }).to_string(), true)
            }
        }
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("searcher", &self.searcher.name())
            .finish()
    }
}
