//! Argument validation for core operations.
//!
//! Input format (names, quantities, URLs) is validated by the request
//! layer. What remains here are the checks whose failure would otherwise
//! turn into a confusing query: page sizes, blank filter values and
//! repeated child ids.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::recipe::PutRecipeInput;
use crate::search::SearchFilters;

/// Check that a result limit is within `1..=max`.
pub fn validate_limit(field: &'static str, got: u32, max: u32) -> Result<(), ValidationError> {
    if got == 0 || got > max {
        return Err(ValidationError::LimitOutOfRange { field, got, max });
    }
    Ok(())
}

/// Validate search filters against the configured page-size cap.
pub fn validate_search_filters(filters: &SearchFilters, max_results_cap: u32) -> Result<(), ValidationError> {
    validate_limit("max_results", filters.max_results, max_results_cap)?;

    if filters.group_ids.iter().any(|g| g.as_str().trim().is_empty()) {
        return Err(ValidationError::EmptyGroupId);
    }

    if filters.categories.iter().any(|c| c.trim().is_empty()) {
        return Err(ValidationError::EmptyCategory);
    }

    Ok(())
}

/// Reject an input that names the same ingredient or step id twice.
pub fn validate_child_ids(input: &PutRecipeInput) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in input.ingredients.iter().filter_map(|i| i.id.as_ref()) {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateChildId {
                kind: "ingredient",
                id: id.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for id in input.steps.iter().filter_map(|s| s.id.as_ref()) {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateChildId {
                kind: "step",
                id: id.to_string(),
            });
        }
    }

    Ok(())
}
