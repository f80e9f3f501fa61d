//! The recipe aggregate: create, replace, load, delete.

use std::sync::Arc;

use potluck_access::AccessGuard;
use potluck_core::{
    convert, validate_child_ids, GroupAssociation, GroupId, Ingredient, IngredientId,
    PutRecipeInput, Recipe, RecipeId, RecipeRecord, Step, StepId, UserId, ValidationError,
};
use potluck_store::{RecipeWrite, SaveOutcome, Store, StoreExt};

use crate::context::Context;
use crate::error::{denied, PotluckError, Result};

/// Owns reads and writes of the recipe aggregate.
pub struct RecipeStore<S, G> {
    ctx: Arc<Context<S, G>>,
}

impl<S: Store, G: AccessGuard> RecipeStore<S, G> {
    pub(crate) fn new(ctx: Arc<Context<S, G>>) -> Self {
        Self { ctx }
    }

    /// Create a recipe, or replace an existing one the caller owns.
    ///
    /// Every group in the input must be one of the caller's groups. Client
    /// child ids are kept; they only need to be unique within the recipe. The
    /// parent row, all children and the search document are written in one
    /// transaction; on any failure nothing changes.
    pub async fn put_recipe(&self, user_id: &UserId, input: &PutRecipeInput) -> Result<Recipe> {
        let group_ids = input.distinct_group_ids();
        if group_ids.iter().any(|g| g.as_str().trim().is_empty()) {
            return Err(ValidationError::EmptyGroupId.into());
        }
        validate_child_ids(input)?;

        let (recipe_id, is_new) = match &input.id {
            Some(id) => {
                self.ctx
                    .guard
                    .assert_ownership(id, user_id)
                    .await
                    .map_err(|e| denied("put_recipe", user_id, e))?;
                (id.clone(), false)
            }
            None => (RecipeId::generate(), true),
        };

        self.ctx
            .guard
            .assert_member_of_all(user_id, &group_ids)
            .await
            .map_err(|e| denied("put_recipe", user_id, e))?;

        let write = self.resolve(user_id, recipe_id.clone(), is_new, input, &group_ids);

        match self.ctx.store.save_recipe(&write).await? {
            SaveOutcome::Missing => {
                tracing::warn!(%user_id, %recipe_id, "recipe vanished before update");
                return Err(PotluckError::Forbidden(format!(
                    "not the owner of recipe {}",
                    recipe_id
                )));
            }
            outcome => {
                tracing::info!(%user_id, %recipe_id, ?outcome, "recipe saved");
            }
        }

        self.ctx
            .store
            .load_recipe(&recipe_id)
            .await?
            .ok_or_else(|| PotluckError::Internal(format!("recipe {} missing after write", recipe_id)))
    }

    /// Assign ids, timestamps and converted quantities.
    fn resolve(
        &self,
        user_id: &UserId,
        recipe_id: RecipeId,
        is_new: bool,
        input: &PutRecipeInput,
        group_ids: &[GroupId],
    ) -> RecipeWrite {
        let now = self.ctx.now();

        let ingredients = input
            .ingredients
            .iter()
            .map(|i| {
                let converted = convert(i.quantity, &i.unit);
                Ingredient {
                    id: i.id.clone().unwrap_or_else(IngredientId::generate),
                    name: i.name.clone(),
                    quantity: i.quantity,
                    unit: i.unit.clone(),
                    metric_quantity: converted.metric,
                    imperial_quantity: converted.imperial,
                }
            })
            .collect();

        let steps = input
            .steps
            .iter()
            .map(|s| Step {
                id: s.id.clone().unwrap_or_else(StepId::generate),
                step_number: s.step_number,
                instruction: s.instruction.clone(),
            })
            .collect();

        let groups = group_ids
            .iter()
            .map(|group_id| GroupAssociation {
                recipe_id: recipe_id.clone(),
                group_id: group_id.clone(),
                added_by: user_id.clone(),
                added_at: now,
            })
            .collect();

        RecipeWrite {
            record: RecipeRecord {
                id: recipe_id,
                name: input.name.clone(),
                description: input.description.clone(),
                image_url: input.image_url.clone(),
                owner: user_id.clone(),
                created_at: now,
                updated_at: now,
            },
            is_new,
            ingredients,
            steps,
            groups,
            categories: input.distinct_categories(),
        }
    }

    /// Load a recipe.
    ///
    /// With a user, the user must share a group with the recipe. Without
    /// one, no check is made; only callers that passed another gate (such
    /// as a consumed share token) may take that path.
    pub async fn get_recipe_by_id(
        &self,
        recipe_id: &RecipeId,
        user_id: Option<&UserId>,
    ) -> Result<Option<Recipe>> {
        if let Some(user_id) = user_id {
            self.ctx
                .guard
                .assert_recipe_access(recipe_id, user_id)
                .await?;
        }

        Ok(self.ctx.store.load_recipe(recipe_id).await?)
    }

    /// Delete a recipe the caller owns, with everything hanging off it.
    pub async fn delete_recipe(&self, user_id: &UserId, recipe_id: &RecipeId) -> Result<()> {
        self.ctx
            .guard
            .assert_ownership(recipe_id, user_id)
            .await
            .map_err(|e| denied("delete_recipe", user_id, e))?;

        if !self.ctx.store.delete_recipe(recipe_id).await? {
            return Err(PotluckError::Forbidden(format!(
                "not the owner of recipe {}",
                recipe_id
            )));
        }

        tracing::info!(%user_id, %recipe_id, "recipe deleted");
        Ok(())
    }

    /// Recipes visible to the user, each once, most recently updated first.
    pub async fn list_recipes_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>> {
        let records = self.ctx.store.list_recipe_records_for_user(user_id).await?;
        self.hydrate(records).await
    }

    pub(crate) async fn hydrate(&self, records: Vec<RecipeRecord>) -> Result<Vec<Recipe>> {
        Ok(self.ctx.store.hydrate(records).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{context, START};
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_put_assigns_ids_and_conversions() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);
        let alice = UserId::new("alice");

        let recipe = recipes
            .put_recipe(
                &alice,
                &PutRecipeInput::new("Butter cake")
                    .group(GroupId::new("g1"))
                    .group(GroupId::new("g1"))
                    .ingredient("flour", 200.0, "g")
                    .ingredient("pinch of salt", 1.0, "pinch")
                    .step("Mix")
                    .step("Bake"),
            )
            .await
            .unwrap();

        assert_eq!(recipe.owner, alice);
        assert_eq!(recipe.created_at, START);
        assert_eq!(recipe.groups.len(), 1);

        let flour = recipe.ingredients.iter().find(|i| i.name == "flour").unwrap();
        assert_eq!(flour.metric_quantity, Some(200.0));
        assert_eq!(flour.imperial_quantity, Some(7.05));
        let salt = recipe.ingredients.iter().find(|i| i.name != "flour").unwrap();
        assert_eq!(salt.metric_quantity, None);
    }

    #[tokio::test]
    async fn test_update_keeps_client_ids_and_created_at() {
        let (ctx, clock) = context().await;
        let recipes = RecipeStore::new(ctx);
        let alice = UserId::new("alice");

        let created = recipes
            .put_recipe(
                &alice,
                &PutRecipeInput::new("Soup")
                    .group(GroupId::new("g1"))
                    .ingredient("leek", 1.0, "pc"),
            )
            .await
            .unwrap();
        let leek_id = created.ingredients[0].id.clone();

        clock.advance(1_000);
        let mut update = PutRecipeInput::new("Leek soup")
            .with_id(created.id.clone())
            .group(GroupId::new("g1"))
            .ingredient("leek", 2.0, "pc");
        update.ingredients[0].id = Some(leek_id.clone());

        let updated = recipes.put_recipe(&alice, &update).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.ingredients[0].id, leek_id);
        assert_eq!(updated.created_at, START);
        assert_eq!(updated.updated_at, START + 1_000);
    }

    #[tokio::test]
    async fn test_child_ids_from_other_groups_do_not_collide() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);
        let carol = UserId::new("carol");

        let hidden = recipes
            .put_recipe(
                &carol,
                &PutRecipeInput::new("Secret stew")
                    .group(GroupId::new("g2"))
                    .ingredient("beef", 500.0, "g")
                    .step("Braise"),
            )
            .await
            .unwrap();
        let taken_ingredient = hidden.ingredients[0].id.clone();
        let taken_step = hidden.steps[0].id.clone();

        let mut input = PutRecipeInput::new("Soup")
            .group(GroupId::new("g1"))
            .ingredient("leek", 1.0, "pc")
            .step("Chop");
        input.ingredients[0].id = Some(taken_ingredient.clone());
        input.steps[0].id = Some(taken_step.clone());

        let mine = recipes
            .put_recipe(&UserId::new("alice"), &input)
            .await
            .unwrap();
        assert_eq!(mine.ingredients[0].id, taken_ingredient);
        assert_eq!(mine.steps[0].id, taken_step);

        let theirs = recipes
            .get_recipe_by_id(&hidden.id, Some(&carol))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(theirs, hidden);
    }

    #[tokio::test]
    async fn test_repeated_child_id_is_invalid() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);
        let alice = UserId::new("alice");

        let mut input = PutRecipeInput::new("Soup")
            .group(GroupId::new("g1"))
            .ingredient("leek", 1.0, "pc")
            .ingredient("salt", 1.0, "pinch");
        input.ingredients[0].id = Some(IngredientId::new("i1"));
        input.ingredients[1].id = Some(IngredientId::new("i1"));

        let err = recipes.put_recipe(&alice, &input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(recipes.list_recipes_for_user(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_into_foreign_group_is_forbidden() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);

        let err = recipes
            .put_recipe(
                &UserId::new("alice"),
                &PutRecipeInput::new("Soup").group(GroupId::new("g2")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(recipes
            .list_recipes_for_user(&UserId::new("carol"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_blank_group_id_is_invalid() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);

        let err = recipes
            .put_recipe(
                &UserId::new("alice"),
                &PutRecipeInput::new("Soup").group(GroupId::new("  ")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[tokio::test]
    async fn test_get_checks_access_only_with_user() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);

        let recipe = recipes
            .put_recipe(
                &UserId::new("alice"),
                &PutRecipeInput::new("Soup").group(GroupId::new("g1")),
            )
            .await
            .unwrap();

        assert!(recipes
            .get_recipe_by_id(&recipe.id, Some(&UserId::new("bob")))
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            recipes
                .get_recipe_by_id(&recipe.id, Some(&UserId::new("carol")))
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::Forbidden
        );
        assert!(recipes
            .get_recipe_by_id(&recipe.id, None)
            .await
            .unwrap()
            .is_some());
        assert!(recipes
            .get_recipe_by_id(&RecipeId::new("missing"), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let (ctx, _) = context().await;
        let recipes = RecipeStore::new(ctx);
        let alice = UserId::new("alice");

        let recipe = recipes
            .put_recipe(&alice, &PutRecipeInput::new("Soup").group(GroupId::new("g1")))
            .await
            .unwrap();

        let err = recipes
            .delete_recipe(&UserId::new("bob"), &recipe.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        recipes.delete_recipe(&alice, &recipe.id).await.unwrap();
        assert_eq!(
            recipes
                .delete_recipe(&alice, &recipe.id)
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::Forbidden
        );
    }
}
