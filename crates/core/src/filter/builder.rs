//! Builds filter trees from high-level search intents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{Column, FilterError, FilterNode, GroupOp, Operator};

/// Filter categories accepted in `filter_type`.
pub const FILTER_TYPES: &[&str] = &[
    "title",
    "skills",
    "experience",
    "company",
    "region",
    "combined",
];

fn default_fuzzy() -> bool {
    true
}

/// A semantic filter request, discriminated by `filter_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter_type", rename_all = "snake_case")]
pub enum FilterRequest {
    Title {
        titles: Vec<String>,
        #[serde(default = "default_fuzzy")]
        fuzzy: bool,
    },
    Skills {
        skills: Vec<String>,
        #[serde(default = "default_fuzzy")]
        fuzzy: bool,
    },
    Experience {
        min_years: i64,
        #[serde(default)]
        max_years: Option<i64>,
    },
    Company(CompanyConstraints),
    Region {
        regions: Vec<String>,
        #[serde(default = "default_fuzzy")]
        fuzzy: bool,
    },
    Combined {
        filter_components: Vec<FilterNode>,
    },
}

/// Inputs of a company filter; at least one must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_companies: Vec<String>,
}

impl FilterRequest {
    /// Parse a loosely-typed request, reporting unknown categories with the
    /// list of valid ones.
    pub fn from_json(value: &Value) -> Result<Self, FilterError> {
        let given = value
            .get("filter_type")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::Invalid("missing 'filter_type'".to_string()))?;

        if !FILTER_TYPES.contains(&given) {
            return Err(FilterError::UnknownCategory {
                given: given.to_string(),
                valid: FILTER_TYPES,
            });
        }

        serde_json::from_value(value.clone())
            .map_err(|e| FilterError::Invalid(format!("{} filter: {}", given, e)))
    }

    /// Category name as sent in `filter_type`.
    pub fn filter_type(&self) -> &'static str {
        match self {
            FilterRequest::Title { .. } => "title",
            FilterRequest::Skills { .. } => "skills",
            FilterRequest::Experience { .. } => "experience",
            FilterRequest::Company(_) => "company",
            FilterRequest::Region { .. } => "region",
            FilterRequest::Combined { .. } => "combined",
        }
    }

    pub fn build(&self) -> Result<FilterNode, FilterError> {
        match self {
            FilterRequest::Title { titles, fuzzy } => title_filter(titles, *fuzzy),
            FilterRequest::Skills { skills, fuzzy } => skills_filter(skills, *fuzzy),
            FilterRequest::Experience {
                min_years,
                max_years,
            } => experience_filter(*min_years, *max_years),
            FilterRequest::Company(constraints) => company_filter(constraints),
            FilterRequest::Region { regions, fuzzy } => region_filter(regions, *fuzzy),
            FilterRequest::Combined { filter_components } => combine(filter_components.clone()),
        }
    }
}

fn text_conditions(column: Column, values: &[String], fuzzy: bool) -> Vec<FilterNode> {
    let operator = Operator::text_match(fuzzy);
    values
        .iter()
        .map(|v| FilterNode::condition(column, operator, v.as_str()))
        .collect()
}

/// Any of the given current titles.
pub fn title_filter(titles: &[String], fuzzy: bool) -> Result<FilterNode, FilterError> {
    if titles.is_empty() {
        return Err(FilterError::EmptyList("titles"));
    }
    Ok(FilterNode::group_or_single(
        GroupOp::Or,
        text_conditions(Column::CurrentEmployerTitle, titles, fuzzy),
    ))
}

/// All of the given skills.
pub fn skills_filter(skills: &[String], fuzzy: bool) -> Result<FilterNode, FilterError> {
    if skills.is_empty() {
        return Err(FilterError::EmptyList("skills"));
    }
    Ok(FilterNode::group_or_single(
        GroupOp::And,
        text_conditions(Column::Skills, skills, fuzzy),
    ))
}

/// Any of the given regions.
pub fn region_filter(regions: &[String], fuzzy: bool) -> Result<FilterNode, FilterError> {
    if regions.is_empty() {
        return Err(FilterError::EmptyList("regions"));
    }
    Ok(FilterNode::group_or_single(
        GroupOp::Or,
        text_conditions(Column::Region, regions, fuzzy),
    ))
}

/// Years of experience at least `min_years`, and at most `max_years` when given.
pub fn experience_filter(min_years: i64, max_years: Option<i64>) -> Result<FilterNode, FilterError> {
    if min_years < 0 {
        return Err(FilterError::NegativeExperience(min_years));
    }

    let lower = FilterNode::condition(Column::YearsOfExperienceRaw, Operator::Gte, min_years);
    match max_years {
        None => Ok(lower),
        Some(max) if max < min_years => Err(FilterError::InvertedExperience {
            min: min_years,
            max,
        }),
        Some(max) => Ok(FilterNode::and(vec![
            lower,
            FilterNode::condition(Column::YearsOfExperienceRaw, Operator::Lte, max),
        ])),
    }
}

/// Headcount bounds, industries and employer exclusions on the current employer.
pub fn company_filter(constraints: &CompanyConstraints) -> Result<FilterNode, FilterError> {
    let mut parts = Vec::new();

    if let Some(min) = constraints.company_size_min {
        parts.push(FilterNode::condition(
            Column::CurrentEmployerHeadcountLatest,
            Operator::Gte,
            min,
        ));
    }
    if let Some(max) = constraints.company_size_max {
        parts.push(FilterNode::condition(
            Column::CurrentEmployerHeadcountLatest,
            Operator::Lte,
            max,
        ));
    }
    if !constraints.industries.is_empty() {
        parts.push(FilterNode::group_or_single(
            GroupOp::Or,
            text_conditions(Column::CurrentEmployerIndustries, &constraints.industries, true),
        ));
    }
    if !constraints.exclude_companies.is_empty() {
        parts.push(FilterNode::condition(
            Column::CurrentEmployerName,
            Operator::NotIn,
            constraints.exclude_companies.clone(),
        ));
    }

    if parts.is_empty() {
        return Err(FilterError::EmptyCompanyFilter);
    }
    Ok(FilterNode::group_or_single(GroupOp::And, parts))
}

/// Conjunction of already-built filters.
pub fn combine(components: Vec<FilterNode>) -> Result<FilterNode, FilterError> {
    if components.is_empty() {
        return Err(FilterError::EmptyList("filter_components"));
    }
    components.iter().try_for_each(FilterNode::validate)?;
    Ok(FilterNode::group_or_single(GroupOp::And, components))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn to_json(node: &FilterNode) -> Value {
        serde_json::to_value(node).unwrap()
    }

    #[test]
    fn test_single_title_is_a_condition() {
        let node = title_filter(&strings(&["Data Engineer"]), true).unwrap();
        assert_eq!(
            to_json(&node),
            json!({"column": "current_employers.title", "type": "(.)", "value": "Data Engineer"})
        );
    }

    #[test]
    fn test_multiple_titles_are_or_group_with_exact_match() {
        let node = title_filter(&strings(&["SRE", "DevOps Engineer"]), false).unwrap();
        assert_eq!(
            to_json(&node),
            json!({"op": "or", "conditions": [
                {"column": "current_employers.title", "type": "=", "value": "SRE"},
                {"column": "current_employers.title", "type": "=", "value": "DevOps Engineer"}
            ]})
        );
    }

    #[test]
    fn test_skills_are_and_group() {
        let node = skills_filter(&strings(&["Python", "Go"]), true).unwrap();
        assert_eq!(
            to_json(&node),
            json!({"op": "and", "conditions": [
                {"column": "skills", "type": "(.)", "value": "Python"},
                {"column": "skills", "type": "(.)", "value": "Go"}
            ]})
        );
    }

    #[test]
    fn test_empty_lists_name_the_field() {
        let err = skills_filter(&[], true).unwrap_err();
        assert!(err.to_string().contains("skills"));
        let err = region_filter(&[], true).unwrap_err();
        assert!(err.to_string().contains("regions"));
        let err = combine(vec![]).unwrap_err();
        assert!(err.to_string().contains("filter_components"));
    }

    #[test]
    fn test_experience_min_only() {
        let node = experience_filter(5, None).unwrap();
        assert_eq!(
            to_json(&node),
            json!({"column": "years_of_experience_raw", "type": "=>", "value": 5})
        );
    }

    #[test]
    fn test_experience_range() {
        let node = experience_filter(5, Some(10)).unwrap();
        assert_eq!(
            to_json(&node),
            json!({"op": "and", "conditions": [
                {"column": "years_of_experience_raw", "type": "=>", "value": 5},
                {"column": "years_of_experience_raw", "type": "=<", "value": 10}
            ]})
        );
    }

    #[test]
    fn test_experience_errors() {
        assert!(matches!(
            experience_filter(-1, None),
            Err(FilterError::NegativeExperience(-1))
        ));
        assert!(matches!(
            experience_filter(8, Some(3)),
            Err(FilterError::InvertedExperience { min: 8, max: 3 })
        ));
    }

    #[test]
    fn test_company_filter_parts_in_order() {
        let node = company_filter(&CompanyConstraints {
            company_size_min: Some(50),
            company_size_max: Some(500),
            industries: strings(&["Fintech", "Banking"]),
            exclude_companies: strings(&["Acme"]),
        })
        .unwrap();
        assert_eq!(
            to_json(&node),
            json!({"op": "and", "conditions": [
                {"column": "current_employers.company_headcount_latest", "type": "=>", "value": 50},
                {"column": "current_employers.company_headcount_latest", "type": "=<", "value": 500},
                {"op": "or", "conditions": [
                    {"column": "current_employers.company_industries", "type": "(.)", "value": "Fintech"},
                    {"column": "current_employers.company_industries", "type": "(.)", "value": "Banking"}
                ]},
                {"column": "current_employers.name", "type": "not_in", "value": ["Acme"]}
            ]})
        );
    }

    #[test]
    fn test_company_filter_single_part_unwrapped() {
        let node = company_filter(&CompanyConstraints {
            industries: strings(&["Healthcare"]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            to_json(&node),
            json!({"column": "current_employers.company_industries", "type": "(.)", "value": "Healthcare"})
        );
    }

    #[test]
    fn test_company_filter_requires_input() {
        assert!(matches!(
            company_filter(&CompanyConstraints::default()),
            Err(FilterError::EmptyCompanyFilter)
        ));
    }

    #[test]
    fn test_combined_single_component_unwrapped() {
        let region = region_filter(&strings(&["Berlin"]), false).unwrap();
        assert_eq!(combine(vec![region.clone()]).unwrap(), region);

        let both = combine(vec![region.clone(), experience_filter(3, None).unwrap()]).unwrap();
        assert!(matches!(both, FilterNode::Group { op: GroupOp::And, .. }));
    }

    #[test]
    fn test_combined_rejects_malformed_components() {
        let empty_group = FilterRequest::from_json(&json!({
            "filter_type": "combined",
            "filter_components": [{"op": "and", "conditions": []}]
        }))
        .unwrap();
        assert!(matches!(empty_group.build(), Err(FilterError::EmptyGroup)));

        let scalar_in = FilterRequest::from_json(&json!({
            "filter_type": "combined",
            "filter_components": [
                {"column": "region", "type": "=", "value": "Berlin"},
                {"column": "current_employers.name", "type": "not_in", "value": "Globex"}
            ]
        }))
        .unwrap();
        assert!(matches!(
            scalar_in.build(),
            Err(FilterError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_json_dispatches_on_filter_type() {
        let request = FilterRequest::from_json(&json!({
            "filter_type": "region",
            "regions": ["Lisbon"]
        }))
        .unwrap();
        assert_eq!(
            request,
            FilterRequest::Region {
                regions: strings(&["Lisbon"]),
                fuzzy: true
            }
        );
        assert_eq!(request.filter_type(), "region");
    }

    #[test]
    fn test_from_json_unknown_type_lists_valid_categories() {
        let err = FilterRequest::from_json(&json!({"filter_type": "salary"})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("salary"));
        assert!(message.contains("title, skills, experience, company, region, combined"));
    }

    #[test]
    fn test_from_json_missing_field_is_invalid() {
        let err = FilterRequest::from_json(&json!({"filter_type": "experience"})).unwrap_err();
        assert!(matches!(err, FilterError::Invalid(_)));
    }

    #[test]
    fn test_combined_request_from_json_builds_tree() {
        let request = FilterRequest::from_json(&json!({
            "filter_type": "combined",
            "filter_components": [
                {"column": "skills", "type": "(.)", "value": "Rust"},
                {"column": "region", "type": "=", "value": "Berlin"}
            ]
        }))
        .unwrap();
        let node = request.build().unwrap();
        assert_eq!(node.conditions().len(), 2);
    }
}
