//! Ranked full-text search over the caller's groups.
//!
//! Every query here is bounded by the caller's group memberships inside
//! the SQL itself; there is no unscoped path into the index.

use std::collections::BTreeSet;
use std::sync::Arc;

use potluck_access::AccessGuard;
use potluck_core::{
    terms, validate_limit, validate_search_filters, GroupId, PopularTerm, RecipeId, ScoredRecipe,
    SearchFilters, UserId,
};
use potluck_store::{MatchMode, RankedRecord, SearchQuery, Store};

use crate::context::Context;
use crate::error::Result;
use crate::recipes::RecipeStore;

/// Search, suggestions, similar recipes and popular ingredients.
pub struct SearchEngine<S, G> {
    ctx: Arc<Context<S, G>>,
    recipes: Arc<RecipeStore<S, G>>,
}

impl<S: Store, G: AccessGuard> SearchEngine<S, G> {
    pub(crate) fn new(ctx: Arc<Context<S, G>>, recipes: Arc<RecipeStore<S, G>>) -> Self {
        Self { ctx, recipes }
    }

    /// Ranked search. All terms of `query` must match.
    ///
    /// Requested groups must each be one of the caller's groups. A query
    /// with no searchable terms returns nothing.
    pub async fn search(
        &self,
        user_id: &UserId,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<ScoredRecipe>> {
        validate_search_filters(filters, self.ctx.config.search.max_results_cap)?;

        let group_ids = distinct(&filters.group_ids);
        self.ctx
            .guard
            .assert_member_of_all(user_id, &group_ids)
            .await?;

        let terms = terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let categories: Vec<String> = filters
            .categories
            .iter()
            .map(|c| c.trim().to_string())
            .collect();

        let query = SearchQuery {
            terms,
            mode: MatchMode::All,
            group_ids,
            categories,
            exclude: None,
            limit: filters.max_results,
            offset: filters.offset,
        };

        self.ranked(user_id, &query).await
    }

    /// Recipe and ingredient names containing `partial`.
    pub async fn suggestions(
        &self,
        user_id: &UserId,
        partial: &str,
        max: Option<u32>,
    ) -> Result<Vec<String>> {
        let config = &self.ctx.config.search;
        let max = max.unwrap_or(config.default_suggestions);
        validate_limit("max", max, config.max_results_cap)?;

        let partial = partial.trim();
        if partial.chars().count() < config.min_suggestion_len {
            return Ok(Vec::new());
        }

        Ok(self.ctx.store.suggest(user_id, partial, max).await?)
    }

    /// Recipes resembling `recipe_id`, never including it.
    ///
    /// Terms are the words of the recipe name plus the longer words of its
    /// ingredients and categories; any of them may match.
    pub async fn similar(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
        max: Option<u32>,
    ) -> Result<Vec<ScoredRecipe>> {
        let config = &self.ctx.config.search;
        let max = max.unwrap_or(config.default_similar);
        validate_limit("max", max, config.max_results_cap)?;

        self.ctx
            .guard
            .assert_recipe_access(recipe_id, user_id)
            .await?;

        let Some(document) = self.ctx.store.search_document(recipe_id).await? else {
            return Ok(Vec::new());
        };

        let min_len = config.similar_min_term_len;
        let mut seen = BTreeSet::new();
        let terms: Vec<String> = terms(&document.name)
            .into_iter()
            .chain(
                terms(&document.ingredients)
                    .into_iter()
                    .chain(terms(&document.categories))
                    .filter(|t| t.chars().count() >= min_len),
            )
            .filter(|t| seen.insert(t.clone()))
            .collect();

        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let query = SearchQuery {
            terms,
            mode: MatchMode::Any,
            group_ids: Vec::new(),
            categories: Vec::new(),
            exclude: Some(recipe_id.clone()),
            limit: max,
            offset: 0,
        };

        self.ranked(user_id, &query).await
    }

    /// Most used ingredient names across the caller's visible recipes.
    pub async fn popular_terms(&self, user_id: &UserId, max: Option<u32>) -> Result<Vec<PopularTerm>> {
        let config = &self.ctx.config.search;
        let max = max.unwrap_or(config.default_popular_terms);
        validate_limit("max", max, config.max_results_cap)?;

        Ok(self
            .ctx
            .store
            .popular_ingredients(user_id, config.popular_min_term_len, max)
            .await?)
    }

    async fn ranked(&self, user_id: &UserId, query: &SearchQuery) -> Result<Vec<ScoredRecipe>> {
        let hits = self.ctx.store.search_recipes(user_id, query).await?;
        tracing::debug!(%user_id, terms = query.terms.len(), hits = hits.len(), "search");

        let (records, ranks): (Vec<_>, Vec<_>) = hits
            .into_iter()
            .map(|RankedRecord { record, rank }| (record, rank))
            .unzip();

        let recipes = self.recipes.hydrate(records).await?;
        Ok(recipes
            .into_iter()
            .zip(ranks)
            .map(|(recipe, rank)| ScoredRecipe { recipe, rank })
            .collect())
    }
}

fn distinct(group_ids: &[GroupId]) -> Vec<GroupId> {
    let mut seen = BTreeSet::new();
    group_ids
        .iter()
        .filter(|g| seen.insert(*g))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::context;
    use crate::error::ErrorKind;
    use potluck_core::PutRecipeInput;

    async fn engine() -> SearchEngine<
        potluck_store::SqliteStore,
        potluck_access::StoreGuard<potluck_store::SqliteStore>,
    > {
        let (ctx, _) = context().await;
        let recipes = Arc::new(RecipeStore::new(Arc::clone(&ctx)));
        let alice = UserId::new("alice");

        for input in [
            PutRecipeInput::new("Garlic bread")
                .group(GroupId::new("g1"))
                .category("Sides")
                .ingredient("garlic", 3.0, "cloves")
                .ingredient("butter", 50.0, "g"),
            PutRecipeInput::new("Tomato soup")
                .group(GroupId::new("g1"))
                .ingredient("tomato", 6.0, "pc")
                .ingredient("garlic", 1.0, "cloves"),
            PutRecipeInput::new("Apple pie")
                .group(GroupId::new("g1"))
                .ingredient("apple", 4.0, "pc"),
        ] {
            recipes.put_recipe(&alice, &input).await.unwrap();
        }

        SearchEngine::new(ctx, recipes)
    }

    #[tokio::test]
    async fn test_search_hydrates_and_scores() {
        let engine = engine().await;
        let hits = engine
            .search(&UserId::new("bob"), "garlic", &SearchFilters::default())
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].recipe.name, "Garlic bread");
        assert!(!hits[0].recipe.ingredients.is_empty());
        assert!(hits[0].rank >= hits[1].rank);
    }

    #[tokio::test]
    async fn test_search_with_only_punctuation_is_empty() {
        let engine = engine().await;
        let hits = engine
            .search(&UserId::new("bob"), "\"(*)\" OR -", &SearchFilters::default())
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_argument_checks() {
        let engine = engine().await;
        let bob = UserId::new("bob");

        let err = engine
            .search(&bob, "garlic", &SearchFilters::default().page(0, 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let err = engine
            .search(&bob, "garlic", &SearchFilters::default().group(GroupId::new("g2")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_similar_excludes_reference() {
        let engine = engine().await;
        let bob = UserId::new("bob");
        let bread = engine
            .search(&bob, "bread", &SearchFilters::default())
            .await
            .unwrap()
            .remove(0)
            .recipe;

        let similar = engine.similar(&bob, &bread.id, None).await.unwrap();
        assert!(similar.iter().all(|s| s.recipe.id != bread.id));
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].recipe.name, "Tomato soup");
    }

    #[tokio::test]
    async fn test_short_suggestion_input_is_empty() {
        let engine = engine().await;
        let bob = UserId::new("bob");

        assert!(engine.suggestions(&bob, " g ", None).await.unwrap().is_empty());
        assert_eq!(
            engine.suggestions(&bob, "gar", None).await.unwrap(),
            vec!["garlic", "Garlic bread"]
        );
    }

    #[tokio::test]
    async fn test_popular_terms_default_limit() {
        let engine = engine().await;
        let terms = engine.popular_terms(&UserId::new("bob"), None).await.unwrap();

        assert_eq!(terms[0].term, "garlic");
        assert_eq!(terms[0].count, 2);
        assert!(terms.len() <= 10);
    }
}
