//! Filter tree types for the People Discovery search API.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Declares the [`Column`] enum with its wire names.
macro_rules! columns {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// A filterable field path known to the search API.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Column {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl Column {
            /// Every known column, in declaration order.
            pub const ALL: &'static [Column] = &[$(Column::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Column::$variant => $wire,)+
                }
            }
        }
    };
}

columns! {
    // Person
    PersonId => "person_id",
    Name => "name",
    FirstName => "first_name",
    LastName => "last_name",
    Region => "region",
    Headline => "headline",
    Summary => "summary",
    Skills => "skills",
    Languages => "languages",
    ProfileLanguage => "profile_language",
    Emails => "emails",
    TwitterHandle => "twitter_handle",
    NumOfConnections => "num_of_connections",
    RecentlyChangedJobs => "recently_changed_jobs",
    YearsOfExperience => "years_of_experience",
    YearsOfExperienceRaw => "years_of_experience_raw",

    // Current employers
    CurrentEmployerName => "current_employers.name",
    CurrentEmployerLinkedinId => "current_employers.linkedin_id",
    CurrentEmployerLogoUrl => "current_employers.logo_url",
    CurrentEmployerLinkedinDescription => "current_employers.linkedin_description",
    CurrentEmployerCompanyId => "current_employers.company_id",
    CurrentEmployerWebsiteDomain => "current_employers.company_website_domain",
    CurrentEmployerPositionId => "current_employers.position_id",
    CurrentEmployerTitle => "current_employers.title",
    CurrentEmployerDescription => "current_employers.description",
    CurrentEmployerLocation => "current_employers.location",
    CurrentEmployerStartDate => "current_employers.start_date",
    CurrentEmployerEndDate => "current_employers.end_date",
    CurrentEmployerHqCountry => "current_employers.company_headquarters_country",
    CurrentEmployerHqAddress => "current_employers.company_headquarters_address",
    CurrentEmployerHeadcountRange => "current_employers.company_headcount_range",
    CurrentEmployerHeadcountLatest => "current_employers.company_headcount_latest",
    CurrentEmployerIndustries => "current_employers.company_industries",
    CurrentEmployerCompanyType => "current_employers.company_type",

    // Past employers
    PastEmployerName => "past_employers.name",
    PastEmployerLinkedinId => "past_employers.linkedin_id",
    PastEmployerLogoUrl => "past_employers.logo_url",
    PastEmployerLinkedinDescription => "past_employers.linkedin_description",
    PastEmployerCompanyId => "past_employers.company_id",
    PastEmployerWebsiteDomain => "past_employers.company_website_domain",
    PastEmployerPositionId => "past_employers.position_id",
    PastEmployerTitle => "past_employers.title",
    PastEmployerDescription => "past_employers.description",
    PastEmployerLocation => "past_employers.location",
    PastEmployerStartDate => "past_employers.start_date",
    PastEmployerEndDate => "past_employers.end_date",
    PastEmployerHqCountry => "past_employers.company_headquarters_country",
    PastEmployerHqAddress => "past_employers.company_headquarters_address",
    PastEmployerHeadcountRange => "past_employers.company_headcount_range",
    PastEmployerHeadcountLatest => "past_employers.company_headcount_latest",
    PastEmployerIndustries => "past_employers.company_industries",
    PastEmployerCompanyType => "past_employers.company_type",

    // Any employer
    AllEmployerName => "all_employers.name",
    AllEmployerLinkedinId => "all_employers.linkedin_id",
    AllEmployerLogoUrl => "all_employers.logo_url",
    AllEmployerLinkedinDescription => "all_employers.linkedin_description",
    AllEmployerCompanyId => "all_employers.company_id",
    AllEmployerWebsiteDomain => "all_employers.company_website_domain",
    AllEmployerPositionId => "all_employers.position_id",
    AllEmployerTitle => "all_employers.title",
    AllEmployerDescription => "all_employers.description",
    AllEmployerLocation => "all_employers.location",
    AllEmployerStartDate => "all_employers.start_date",
    AllEmployerEndDate => "all_employers.end_date",
    AllEmployerHqCountry => "all_employers.company_headquarters_country",
    AllEmployerHqAddress => "all_employers.company_headquarters_address",
    AllEmployerHeadcountRange => "all_employers.company_headcount_range",
    AllEmployerHeadcountLatest => "all_employers.company_headcount_latest",
    AllEmployerIndustries => "all_employers.company_industries",
    AllEmployerCompanyType => "all_employers.company_type",

    // Education
    EducationDegreeName => "education_background.degree_name",
    EducationInstituteName => "education_background.institute_name",
    EducationInstituteLinkedinId => "education_background.institute_linkedin_id",
    EducationInstituteLinkedinUrl => "education_background.institute_linkedin_url",
    EducationInstituteLogoUrl => "education_background.institute_logo_url",
    EducationFieldOfStudy => "education_background.field_of_study",
    EducationActivities => "education_background.activities_and_societies",
    EducationStartDate => "education_background.start_date",
    EducationEndDate => "education_background.end_date",

    // Honors
    HonorTitle => "honors.title",
    HonorIssuedDate => "honors.issued_date",
    HonorDescription => "honors.description",
    HonorIssuer => "honors.issuer",
    HonorMediaUrls => "honors.media_urls",
    HonorOrganizationLinkedinId => "honors.associated_organization_linkedin_id",
    HonorOrganization => "honors.associated_organization",

    // Certifications
    CertificationName => "certifications.name",
    CertificationIssuedDate => "certifications.issued_date",
    CertificationExpirationDate => "certifications.expiration_date",
    CertificationUrl => "certifications.url",
    CertificationIssuer => "certifications.issuer_organization",
    CertificationIssuerLinkedinId => "certifications.issuer_organization_linkedin_id",
    CertificationId => "certifications.certification_id",
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a condition, serialized with the API's spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=>")]
    Gte,
    #[serde(rename = "=<")]
    Lte,
    /// Approximate text match.
    #[serde(rename = "(.)")]
    Fuzzy,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => "=>",
            Operator::Lte => "=<",
            Operator::Fuzzy => "(.)",
        }
    }

    /// Text operator for the builder's `fuzzy` flag.
    pub fn text_match(fuzzy: bool) -> Self {
        if fuzzy {
            Operator::Fuzzy
        } else {
            Operator::Eq
        }
    }

    fn takes_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connective of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOp {
    And,
    Or,
}

/// Value side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn is_list(&self) -> bool {
        matches!(self, FilterValue::List(_))
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FilterValue::Int)
            .unwrap_or(FilterValue::Float(value as f64))
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values.into_iter().map(FilterValue::Text).collect())
    }
}

/// A node of the filter tree: a single condition or a boolean group.
///
/// Nested `and` groups over employer fields are matched by the API against
/// one employment record; keeping such groups on a single record is up to
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Condition {
        column: Column,
        #[serde(rename = "type")]
        operator: Operator,
        value: FilterValue,
    },
    Group {
        op: GroupOp,
        conditions: Vec<FilterNode>,
    },
}

impl FilterNode {
    pub fn condition(column: Column, operator: Operator, value: impl Into<FilterValue>) -> Self {
        FilterNode::Condition {
            column,
            operator,
            value: value.into(),
        }
    }

    pub fn and(conditions: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            op: GroupOp::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            op: GroupOp::Or,
            conditions,
        }
    }

    /// Group under `op`, or return the only node unwrapped.
    pub fn group_or_single(op: GroupOp, mut conditions: Vec<FilterNode>) -> Self {
        if conditions.len() == 1 {
            conditions.remove(0)
        } else {
            FilterNode::Group { op, conditions }
        }
    }

    /// Check the structural rules of the tree.
    pub fn validate(&self) -> Result<(), FilterError> {
        match self {
            FilterNode::Condition {
                column,
                operator,
                value,
            } => {
                if operator.takes_list() {
                    match value {
                        FilterValue::List(items) => {
                            if items.iter().any(FilterValue::is_list) {
                                return Err(FilterError::InvalidValue {
                                    column: *column,
                                    operator: *operator,
                                    reason: "list values must be scalars".to_string(),
                                });
                            }
                        }
                        _ => {
                            return Err(FilterError::InvalidValue {
                                column: *column,
                                operator: *operator,
                                reason: "expected a list".to_string(),
                            })
                        }
                    }
                } else if value.is_list() {
                    return Err(FilterError::InvalidValue {
                        column: *column,
                        operator: *operator,
                        reason: "expected a single value".to_string(),
                    });
                }
                Ok(())
            }
            FilterNode::Group { conditions, .. } => {
                if conditions.is_empty() {
                    return Err(FilterError::EmptyGroup);
                }
                conditions.iter().try_for_each(FilterNode::validate)
            }
        }
    }

    /// Every condition in the tree, depth first.
    pub fn conditions(&self) -> Vec<(Column, Operator, &FilterValue)> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<(Column, Operator, &'a FilterValue)>) {
        match self {
            FilterNode::Condition {
                column,
                operator,
                value,
            } => out.push((*column, *operator, value)),
            FilterNode::Group { conditions, .. } => {
                for node in conditions {
                    node.collect_conditions(out);
                }
            }
        }
    }
}

/// Filter construction and validation failures.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("'{0}' must contain at least one value")]
    EmptyList(&'static str),

    #[error("min_years cannot be negative (got {0})")]
    NegativeExperience(i64),

    #[error("max_years ({max}) cannot be less than min_years ({min})")]
    InvertedExperience { min: i64, max: i64 },

    #[error("company filter needs at least one of: company_size_min, company_size_max, industries, exclude_companies")]
    EmptyCompanyFilter,

    #[error("Unknown filter type '{given}'. Valid types: {}", .valid.join(", "))]
    UnknownCategory {
        given: String,
        valid: &'static [&'static str],
    },

    #[error("Filter group must contain at least one condition")]
    EmptyGroup,

    #[error("Invalid value for {column} {operator}: {reason}")]
    InvalidValue {
        column: Column,
        operator: Operator,
        reason: String,
    },

    #[error("Invalid filter request: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_wire_spellings() {
        let ops = vec![
            Operator::Eq,
            Operator::Ne,
            Operator::In,
            Operator::NotIn,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
            Operator::Fuzzy,
        ];
        let json = serde_json::to_value(&ops).unwrap();
        assert_eq!(
            json,
            json!(["=", "!=", "in", "not_in", ">", "<", "=>", "=<", "(.)"])
        );
    }

    #[test]
    fn test_column_catalogue() {
        assert!(Column::ALL.len() >= 90);
        let parsed: Column = serde_json::from_value(json!("current_employers.title")).unwrap();
        assert_eq!(parsed, Column::CurrentEmployerTitle);
        assert_eq!(
            Column::CertificationId.as_str(),
            "certifications.certification_id"
        );
        assert!(serde_json::from_value::<Column>(json!("shoe_size")).is_err());
    }

    #[test]
    fn test_condition_serialization() {
        let node = FilterNode::condition(Column::YearsOfExperienceRaw, Operator::Gte, 5i64);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"column": "years_of_experience_raw", "type": "=>", "value": 5})
        );
    }

    #[test]
    fn test_nested_tree_deserializes() {
        let raw = json!({
            "op": "and",
            "conditions": [
                {"column": "skills", "type": "(.)", "value": "Rust"},
                {"op": "or", "conditions": [
                    {"column": "region", "type": "=", "value": "Berlin"},
                    {"column": "current_employers.name", "type": "not_in", "value": ["Acme"]}
                ]}
            ]
        });
        let node: FilterNode = serde_json::from_value(raw.clone()).unwrap();
        assert!(node.validate().is_ok());
        assert_eq!(node.conditions().len(), 3);
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let node = FilterNode::and(vec![FilterNode::or(vec![])]);
        assert!(matches!(node.validate(), Err(FilterError::EmptyGroup)));
    }

    #[test]
    fn test_validate_list_operators() {
        let bad = FilterNode::condition(Column::CurrentEmployerName, Operator::NotIn, "Acme");
        assert!(matches!(
            bad.validate(),
            Err(FilterError::InvalidValue { .. })
        ));

        let bad = FilterNode::condition(
            Column::YearsOfExperienceRaw,
            Operator::Gte,
            FilterValue::List(vec![FilterValue::Int(1)]),
        );
        assert!(bad.validate().is_err());

        let good = FilterNode::condition(
            Column::CurrentEmployerName,
            Operator::In,
            vec!["Acme".to_string(), "Globex".to_string()],
        );
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_group_or_single_unwraps() {
        let only = FilterNode::condition(Column::Region, Operator::Eq, "Paris");
        assert_eq!(
            FilterNode::group_or_single(GroupOp::And, vec![only.clone()]),
            only
        );
    }
}
