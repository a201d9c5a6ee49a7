//! Filter tree construction for the People Discovery search API.
//!
//! A filter is either a single `{column, type, value}` condition or an
//! `{op, conditions}` group. [`FilterRequest`] captures the common search
//! intents (titles, skills, experience, company, region) and builds the
//! matching tree.

mod builder;
mod types;

pub use builder::{
    combine, company_filter, experience_filter, region_filter, skills_filter, title_filter,
    CompanyConstraints, FilterRequest, FILTER_TYPES,
};
pub use types::*;
