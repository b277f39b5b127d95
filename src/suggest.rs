use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;

use crate::ingredient::normalize_inventory_ordered;
use crate::recipe_store::{Recipe, RecipeStore};
use crate::search::{top_k_cosine, EmbeddingEngine};

/// Number of recipes returned by a suggestion request.
pub const MAX_SUGGESTIONS: usize = 5;

/// Best-score floor below which the semantic ranking is considered
/// uninformative and replaced by a uniform random sample.
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.1;

/// One suggested recipe, with its ingredients partitioned against the
/// requesting user's inventory. Matched/missing entries are in normalized
/// form.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub recipe_title: String,
    pub ingredients: String,
    pub url: String,
    pub recipe_image: String,
    pub prep_time: String,
    pub course: String,
    pub diet: String,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
}

/// Returns a filter pattern when the client actually supplied one.
/// Whitespace-only input matches everything anyway, so it is treated as
/// absent.
fn active_pattern(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
}

/// Indices of recipes passing the optional course and diet filters, both
/// case-insensitive substring matches, applied in that order. An empty result
/// means the caller should fall back to the unfiltered table.
pub fn filter_recipe_indices(
    store: &RecipeStore,
    course: Option<&str>,
    diet: Option<&str>,
) -> Vec<usize> {
    let course_pattern = active_pattern(course);
    let diet_pattern = active_pattern(diet);

    (0..store.recipes.len())
        .filter(|&i| {
            let recipe = &store.recipes[i];
            course_pattern
                .as_ref()
                .map_or(true, |p| recipe.course.to_lowercase().contains(p))
                && diet_pattern
                    .as_ref()
                    .map_or(true, |p| recipe.diet.to_lowercase().contains(p))
        })
        .collect()
}

/// Partitions a recipe's normalized ingredients into (matched, missing)
/// against the inventory set. Every ingredient lands in exactly one side.
pub fn partition_ingredients(
    recipe: &Recipe,
    inventory: &HashSet<String>,
) -> (Vec<String>, Vec<String>) {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for ingredient in &recipe.normalized_ingredients {
        if inventory.contains(ingredient) {
            matched.push(ingredient.clone());
        } else {
            missing.push(ingredient.clone());
        }
    }
    (matched, missing)
}

/// Applies the low-confidence fallback to a ranked candidate list. Positions
/// index into the filtered pool. A confident ranking is returned as-is; a
/// best score under [`LOW_CONFIDENCE_THRESHOLD`] (or an empty ranking)
/// degrades to `min(MAX_SUGGESTIONS, pool_len)` positions sampled uniformly
/// without replacement.
pub fn select_pool_positions(ranked: &[(usize, f32)], pool_len: usize) -> Vec<usize> {
    let confident = ranked
        .first()
        .map(|&(_, score)| score >= LOW_CONFIDENCE_THRESHOLD)
        .unwrap_or(false);
    if confident {
        return ranked.iter().map(|&(pos, _)| pos).collect();
    }

    let positions: Vec<usize> = (0..pool_len).collect();
    let mut rng = rand::thread_rng();
    positions
        .choose_multiple(&mut rng, MAX_SUGGESTIONS.min(pool_len))
        .copied()
        .collect()
}

/// The `/suggest` operation: embeds the normalized inventory, ranks the
/// (optionally filtered) recipe table by cosine similarity, applies the
/// random fallback when confidence is low, and enriches each hit with its
/// matched/missing partition.
///
/// `recipe_embeddings` is the startup matrix for the full table; a filtered
/// subset is re-embedded per request.
pub fn suggest_recipes(
    store: &RecipeStore,
    recipe_embeddings: &[Vec<f32>],
    engine: &EmbeddingEngine,
    ingredients: &[String],
    course: Option<&str>,
    diet: Option<&str>,
) -> Result<Vec<RecipeSummary>> {
    let (inventory, ordered) = normalize_inventory_ordered(ingredients);
    let inventory_text = ordered.join(", ");
    let query_vec = engine
        .embed_one(&inventory_text)
        .context("Failed to embed user inventory")?;

    let filtered = filter_recipe_indices(store, course, diet);
    let (pool, ranked) = if filtered.is_empty() {
        // No recipe survived the filters: degrade to the whole table and
        // reuse the startup embeddings.
        let pool: Vec<usize> = (0..store.recipes.len()).collect();
        let ranked = top_k_cosine(&query_vec, recipe_embeddings, MAX_SUGGESTIONS);
        (pool, ranked)
    } else {
        let texts: Vec<String> = filtered
            .iter()
            .map(|&i| store.recipes[i].embedding_text.clone())
            .collect();
        let vectors = engine
            .embed(&texts)
            .context("Failed to embed filtered recipes")?;
        let ranked = top_k_cosine(&query_vec, &vectors, MAX_SUGGESTIONS);
        (filtered, ranked)
    };

    let selected = select_pool_positions(&ranked, pool.len());

    Ok(selected
        .into_iter()
        .map(|pos| {
            let recipe = &store.recipes[pool[pos]];
            let (matched, missing) = partition_ingredients(recipe, &inventory);
            RecipeSummary {
                recipe_title: recipe.title.clone(),
                ingredients: recipe.ingredients.clone(),
                url: recipe.url.clone(),
                recipe_image: recipe.image.clone(),
                prep_time: recipe.prep_time.clone(),
                course: recipe.course.clone(),
                diet: recipe.diet.clone(),
                matched_ingredients: matched,
                missing_ingredients: missing,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::normalize_inventory;
    use crate::recipe_store::Recipe;

    fn recipe(title: &str, ingredients: &str, course: &str, diet: &str) -> Recipe {
        Recipe::from_columns(
            title.to_string(),
            ingredients.to_string(),
            String::new(),
            String::new(),
            String::new(),
            course.to_string(),
            diet.to_string(),
            String::new(),
            String::new(),
        )
    }

    fn test_store() -> RecipeStore {
        RecipeStore {
            recipes: vec![
                recipe("Masala Omelette", "Egg | Onion | Mirchi", "Breakfast", "Eggetarian"),
                recipe("Aloo Paratha", "Atta | Potato | Ghee", "Breakfast", "Vegetarian"),
                recipe("Dal Tadka", "Lentils | Haldi | Jeera", "Lunch", "Vegetarian"),
                recipe("Paneer Tikka", "Paneer | Curd | Mirchi", "Dinner", "Vegetarian"),
            ],
        }
    }

    #[test]
    fn test_filter_by_course_is_case_insensitive_substring() {
        let store = test_store();
        let indices = filter_recipe_indices(&store, Some("breakfast"), None);
        assert_eq!(indices, vec![0, 1]);
        let indices = filter_recipe_indices(&store, Some("BREAK"), None);
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_filter_by_course_and_diet_sequentially() {
        let store = test_store();
        let indices = filter_recipe_indices(&store, Some("Breakfast"), Some("vegetarian"));
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_filter_with_no_match_returns_empty() {
        let store = test_store();
        assert!(filter_recipe_indices(&store, Some("Brunch"), None).is_empty());
        assert!(filter_recipe_indices(&store, Some("Breakfast"), Some("Vegan")).is_empty());
    }

    #[test]
    fn test_filter_blank_patterns_are_ignored() {
        let store = test_store();
        assert_eq!(filter_recipe_indices(&store, Some("  "), Some("")).len(), 4);
        assert_eq!(filter_recipe_indices(&store, None, None).len(), 4);
    }

    #[test]
    fn test_partition_covers_every_ingredient_exactly_once() {
        let store = test_store();
        let inventory = normalize_inventory(&[
            "egg".to_string(),
            "onion".to_string(),
            "atta".to_string(),
        ]);
        for recipe in &store.recipes {
            let (matched, missing) = partition_ingredients(recipe, &inventory);
            assert_eq!(
                matched.len() + missing.len(),
                recipe.normalized_ingredients.len()
            );
            for m in &matched {
                assert!(inventory.contains(m));
                assert!(!missing.contains(m));
            }
            for m in &missing {
                assert!(!inventory.contains(m));
            }
        }
    }

    #[test]
    fn test_partition_uses_normalized_forms() {
        let store = test_store();
        let inventory = normalize_inventory(&["wheat flour".to_string()]);
        // "Atta" normalizes to "wheat flour" and must count as matched.
        let (matched, missing) = partition_ingredients(&store.recipes[1], &inventory);
        assert_eq!(matched, vec!["wheat flour"]);
        assert_eq!(missing, vec!["potato", "ghee"]);
    }

    #[test]
    fn test_select_keeps_confident_ranking_order() {
        let ranked = vec![(3, 0.9), (0, 0.5), (2, 0.2)];
        assert_eq!(select_pool_positions(&ranked, 10), vec![3, 0, 2]);
    }

    #[test]
    fn test_select_threshold_is_strictly_below() {
        // A best score of exactly 0.1 still counts as confident.
        let ranked = vec![(1, LOW_CONFIDENCE_THRESHOLD), (0, 0.05)];
        assert_eq!(select_pool_positions(&ranked, 2), vec![1, 0]);
    }

    #[test]
    fn test_select_falls_back_to_random_sample() {
        let ranked = vec![(0, 0.05), (1, 0.01)];
        let picked = select_pool_positions(&ranked, 3);
        assert_eq!(picked.len(), 3); // min(5, pool of 3)
        let distinct: std::collections::HashSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), picked.len());
        assert!(picked.iter().all(|&p| p < 3));
    }

    #[test]
    fn test_select_fallback_caps_at_max_suggestions() {
        let picked = select_pool_positions(&[], 20);
        assert_eq!(picked.len(), MAX_SUGGESTIONS);
    }
}
