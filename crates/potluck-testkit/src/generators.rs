//! Proptest generators for property-based testing.

use proptest::prelude::*;

use potluck_core::{GroupId, IngredientInput, PutRecipeInput, ShareConditions, StepInput};

/// Generate a recipe or ingredient word.
pub fn word() -> impl Strategy<Value = String> {
    "[a-z]{3,10}".prop_map(String::from)
}

/// Generate a name of one to three words.
pub fn name() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..=3).prop_map(|words| words.join(" "))
}

/// Generate a unit, mixing convertible and free-text units.
pub fn unit() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("g"),
        Just("kg"),
        Just("oz"),
        Just("lb"),
        Just("ml"),
        Just("cup"),
        Just("tbsp"),
        Just("tsp"),
        Just("pinch"),
        Just("cloves"),
    ]
    .prop_map(String::from)
}

/// Generate an ingredient input with a positive quantity.
pub fn ingredient_input() -> impl Strategy<Value = IngredientInput> {
    (name(), 0.25f64..1000.0, unit()).prop_map(|(name, quantity, unit)| IngredientInput {
        id: None,
        name,
        quantity,
        unit,
    })
}

/// Generate a recipe input in `group`, with 1-based consecutive steps.
pub fn put_recipe_input(group: &'static str) -> impl Strategy<Value = PutRecipeInput> {
    (
        name(),
        prop::collection::vec(ingredient_input(), 0..8),
        prop::collection::vec(name(), 0..6),
        prop::collection::vec(word(), 0..3),
    )
        .prop_map(move |(name, ingredients, steps, categories)| PutRecipeInput {
            id: None,
            name,
            description: None,
            image_url: None,
            group_ids: vec![GroupId::new(group)],
            categories,
            ingredients,
            steps: steps
                .into_iter()
                .enumerate()
                .map(|(i, instruction)| StepInput {
                    id: None,
                    step_number: i as u32 + 1,
                    instruction,
                })
                .collect(),
        })
}

/// Generate share conditions around `now`: past or future expiry, and a
/// small or absent view cap.
pub fn share_conditions(now: i64) -> impl Strategy<Value = ShareConditions> {
    (
        prop::option::of(-10_000i64..10_000),
        prop::option::of(0u32..5),
    )
        .prop_map(move |(offset, max_views)| ShareConditions {
            expires_at: offset.map(|o| now + o),
            max_views,
        })
}
