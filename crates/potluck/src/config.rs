//! Configuration for the Potluck services.

use potluck_core::{DEFAULT_MAX_RESULTS, DEFAULT_TOKEN_BYTES};

/// Configuration for the Potluck facade.
#[derive(Debug, Clone)]
pub struct PotluckConfig {
    /// Search, suggestion and aggregation limits.
    pub search: SearchConfig,
    /// Random bytes per share token before hex encoding.
    pub token_bytes: usize,
}

impl Default for PotluckConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            token_bytes: DEFAULT_TOKEN_BYTES,
        }
    }
}

/// Limits for the search engine.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_max_results: u32,
    /// Upper bound for every caller-supplied `max`.
    pub max_results_cap: u32,
    pub default_suggestions: u32,
    pub default_similar: u32,
    pub default_popular_terms: u32,
    /// Trimmed partial input shorter than this yields no suggestions.
    pub min_suggestion_len: usize,
    /// Ingredient and category words shorter than this are not used to
    /// find similar recipes. Name words are always used.
    pub similar_min_term_len: usize,
    /// Ingredient names shorter than this are left out of popular terms.
    pub popular_min_term_len: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: DEFAULT_MAX_RESULTS,
            max_results_cap: 100,
            default_suggestions: 5,
            default_similar: 5,
            default_popular_terms: 10,
            min_suggestion_len: 2,
            similar_min_term_len: 4,
            popular_min_term_len: 3,
        }
    }
}
