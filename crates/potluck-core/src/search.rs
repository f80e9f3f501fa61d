//! Search arguments and results that are not recipes.

use serde::{Deserialize, Serialize};

use crate::types::GroupId;

/// Default page size for search results.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Narrowing options for a full-text search.
///
/// The caller's own groups always bound the result set; `group_ids` can
/// only narrow it further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Match recipes in any of these categories. Empty means no filter.
    pub categories: Vec<String>,
    /// Restrict to these groups. Each must be one of the caller's groups.
    pub group_ids: Vec<GroupId>,
    pub max_results: u32,
    pub offset: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            group_ids: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            offset: 0,
        }
    }
}

impl SearchFilters {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn group(mut self, group_id: GroupId) -> Self {
        self.group_ids.push(group_id);
        self
    }

    pub fn page(mut self, max_results: u32, offset: u32) -> Self {
        self.max_results = max_results;
        self.offset = offset;
        self
    }
}

/// Split free text into lowercase alphanumeric terms.
///
/// Everything that is not a letter or digit separates terms, so the output
/// carries no query syntax of any kind.
pub fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// An ingredient name and how many visible recipes use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularTerm {
    pub term: String,
    pub count: u32,
}
