//! Exploration variants derived from requirements.

use crate::filter::{
    combine, company_filter, experience_filter, region_filter, skills_filter, title_filter,
    CompanyConstraints, FilterNode,
};
use crate::ranking::Requirements;

use super::types::{FilterVariant, SourcingError};

/// Must-have skills kept by the broadened variant.
const BROADENED_SKILLS: usize = 2;

fn experience_part(requirements: &Requirements) -> Result<Option<FilterNode>, SourcingError> {
    if requirements.min_experience.is_none() && requirements.max_experience.is_none() {
        return Ok(None);
    }
    let min = requirements.min_experience.unwrap_or(0.0).floor() as i64;
    let max = requirements.max_experience.map(|m| m.ceil() as i64);
    Ok(Some(experience_filter(min, max)?))
}

fn company_part(requirements: &Requirements) -> Result<Option<FilterNode>, SourcingError> {
    let constraints = CompanyConstraints {
        company_size_min: requirements.company_size_min,
        company_size_max: requirements.company_size_max,
        industries: requirements.target_industries.clone(),
        exclude_companies: requirements.exclude_companies.clone(),
    };
    if constraints == CompanyConstraints::default() {
        return Ok(None);
    }
    Ok(Some(company_filter(&constraints)?))
}

fn assemble(parts: Vec<Option<FilterNode>>) -> Result<Option<FilterNode>, SourcingError> {
    let parts: Vec<_> = parts.into_iter().flatten().collect();
    if parts.is_empty() {
        return Ok(None);
    }
    Ok(Some(combine(parts)?))
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    (!items.is_empty()).then_some(items)
}

/// Build up to `max_variants` distinct variants, strictest first:
///
/// - `core`: every must-have skill, exact region, company constraints
/// - `broadened`: first two must-have skills, fuzzy region
/// - `relaxed`: titles and experience only
pub fn derive_variants(
    requirements: &Requirements,
    max_variants: usize,
) -> Result<Vec<FilterVariant>, SourcingError> {
    let titles = non_empty(&requirements.titles)
        .map(|t| title_filter(t, true))
        .transpose()?;
    let experience = experience_part(requirements)?;
    let skills = non_empty(&requirements.must_have_skills)
        .map(|s| skills_filter(s, true))
        .transpose()?;
    let first_skills = non_empty(&requirements.must_have_skills)
        .map(|s| skills_filter(&s[..s.len().min(BROADENED_SKILLS)], true))
        .transpose()?;
    let exact_region = non_empty(&requirements.target_regions)
        .map(|r| region_filter(r, false))
        .transpose()?;
    let fuzzy_region = non_empty(&requirements.target_regions)
        .map(|r| region_filter(r, true))
        .transpose()?;
    let company = company_part(requirements)?;

    let candidates = [
        (
            "core",
            assemble(vec![
                titles.clone(),
                skills,
                experience.clone(),
                exact_region,
                company,
            ])?,
        ),
        (
            "broadened",
            assemble(vec![
                titles.clone(),
                first_skills,
                experience.clone(),
                fuzzy_region,
            ])?,
        ),
        ("relaxed", assemble(vec![titles, experience])?),
    ];

    let mut variants: Vec<FilterVariant> = Vec::new();
    for (name, filters) in candidates {
        let Some(filters) = filters else { continue };
        if variants.iter().any(|v| v.filters == filters) {
            continue;
        }
        variants.push(FilterVariant::new(name, filters));
    }
    variants.truncate(max_variants);

    if variants.is_empty() {
        return Err(SourcingError::Validation(
            "requirements must name at least one title, skill, region, experience bound or company constraint"
                .to_string(),
        ));
    }
    Ok(variants)
}

/// Check caller-supplied variants and keep at most `max_variants`.
pub fn prepare_variants(
    mut variants: Vec<FilterVariant>,
    max_variants: usize,
) -> Result<Vec<FilterVariant>, SourcingError> {
    for (i, variant) in variants.iter_mut().enumerate() {
        if variant.name.trim().is_empty() {
            variant.name = format!("variant_{}", i + 1);
        }
        variant.filters.validate().map_err(|e| {
            SourcingError::Validation(format!("variant '{}': {}", variant.name, e))
        })?;
    }
    variants.truncate(max_variants);
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Column, FilterValue, Operator};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn full_requirements() -> Requirements {
        Requirements {
            titles: strings(&["Backend Engineer"]),
            must_have_skills: strings(&["Rust", "Postgres", "Kafka"]),
            min_experience: Some(4.0),
            max_experience: Some(9.5),
            target_regions: strings(&["Berlin"]),
            company_size_min: Some(50),
            ..Default::default()
        }
    }

    #[test]
    fn test_three_distinct_variants() {
        let variants = derive_variants(&full_requirements(), 3).unwrap();
        let names: Vec<_> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["core", "broadened", "relaxed"]);

        let core = variants[0].filters.conditions();
        assert!(core.iter().any(|(c, _, v)| *c == Column::Skills
            && **v == FilterValue::Text("Kafka".into())));
        assert!(core
            .iter()
            .any(|(c, op, _)| *c == Column::Region && *op == Operator::Eq));

        let broadened = variants[1].filters.conditions();
        assert_eq!(
            broadened.iter().filter(|(c, _, _)| *c == Column::Skills).count(),
            2
        );
        assert!(broadened
            .iter()
            .any(|(c, op, _)| *c == Column::Region && *op == Operator::Fuzzy));

        let relaxed = variants[2].filters.conditions();
        assert!(relaxed
            .iter()
            .all(|(c, _, _)| matches!(c, Column::CurrentEmployerTitle | Column::YearsOfExperienceRaw)));
    }

    #[test]
    fn test_experience_bounds_are_widened_to_whole_years() {
        let variants = derive_variants(&full_requirements(), 1).unwrap();
        let bounds: Vec<_> = variants[0]
            .filters
            .conditions()
            .into_iter()
            .filter(|(c, _, _)| *c == Column::YearsOfExperienceRaw)
            .map(|(_, _, v)| v.clone())
            .collect();
        assert_eq!(
            bounds,
            vec![
                FilterValue::Int(4),
                FilterValue::Int(10)
            ]
        );
    }

    #[test]
    fn test_duplicate_variants_are_dropped() {
        let requirements = Requirements {
            titles: strings(&["Designer"]),
            ..Default::default()
        };
        let variants = derive_variants(&requirements, 3).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].name, "core");
    }

    #[test]
    fn test_no_usable_variant_is_validation_error() {
        let err = derive_variants(&Requirements::default(), 3).unwrap_err();
        assert!(matches!(err, SourcingError::Validation(_)));
    }

    #[test]
    fn test_inverted_experience_is_rejected() {
        let requirements = Requirements {
            min_experience: Some(9.0),
            max_experience: Some(2.0),
            ..Default::default()
        };
        let err = derive_variants(&requirements, 3).unwrap_err();
        assert!(err.to_string().contains("max_years"));
    }

    #[test]
    fn test_prepare_variants_validates_and_names() {
        let good = FilterVariant::new("", FilterNode::condition(Column::Skills, Operator::Fuzzy, "Go"));
        let prepared = prepare_variants(vec![good.clone(), good.clone(), good.clone(), good], 3).unwrap();
        assert_eq!(prepared.len(), 3);
        assert_eq!(prepared[0].name, "variant_1");

        let bad = FilterVariant::new("broken", FilterNode::or(vec![]));
        let err = prepare_variants(vec![bad], 3).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
