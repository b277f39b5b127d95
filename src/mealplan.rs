use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ingredient::normalize_inventory;
use crate::recipe_store::{Recipe, RecipeStore};

/// Meal slots filled when the client does not pin a single course.
pub const DEFAULT_COURSES: [&str; 3] = ["Breakfast", "Lunch", "Dinner"];

/// One per-slot meal suggestion with full recipe detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanSuggestion {
    pub recipe_title: String,
    /// Pipe-joined ingredient names in their original casing.
    pub ingredients: String,
    pub url: String,
    pub recipe_image: String,
    pub prep_time: String,
    /// The recipe's own course value, not the requested slot.
    pub course: String,
    pub diet: String,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub description: String,
    pub instructions: String,
    pub ingredients_available: usize,
    pub ingredients_total: usize,
    /// Synthetic identifier: `"{title}_{slot}"`.
    pub id: String,
}

/// Fraction of a recipe's ingredients present in the inventory. Recipes with
/// no ingredients score 0 and therefore never beat a real candidate.
pub fn availability_ratio(recipe: &Recipe, inventory: &HashSet<String>) -> f64 {
    let total = recipe.normalized_ingredients.len();
    if total == 0 {
        return 0.0;
    }
    let available = recipe
        .normalized_ingredients
        .iter()
        .filter(|ing| inventory.contains(*ing))
        .count();
    available as f64 / total as f64
}

fn build_suggestion(recipe: &Recipe, inventory: &HashSet<String>, slot: &str) -> MealPlanSuggestion {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for normalized in &recipe.normalized_ingredients {
        if inventory.contains(normalized) {
            matched.push(normalized.clone());
        } else {
            missing.push(normalized.clone());
        }
    }

    MealPlanSuggestion {
        recipe_title: recipe.title.clone(),
        ingredients: recipe.ingredient_names.join("|"),
        url: recipe.url.clone(),
        recipe_image: recipe.image.clone(),
        prep_time: recipe.prep_time.clone(),
        course: recipe.course.clone(),
        diet: recipe.diet.clone(),
        ingredients_available: matched.len(),
        ingredients_total: recipe.ingredient_names.len(),
        matched_ingredients: matched,
        missing_ingredients: missing,
        description: recipe.description.clone(),
        instructions: recipe.instructions.clone(),
        id: format!("{}_{}", recipe.title, slot),
    }
}

/// The `/mealplan-suggestions` operation. For each slot (the given course, or
/// the three defaults) the recipes are narrowed by course and optional diet
/// substring match; an empty slot is omitted. Among the survivors the recipe
/// with the highest availability ratio wins; ties go to the earliest row in
/// source order (stable descending sort, keep first).
pub fn mealplan_suggestions(
    store: &RecipeStore,
    inventory_items: &[String],
    diet: Option<&str>,
    course: Option<&str>,
) -> Vec<MealPlanSuggestion> {
    let inventory = normalize_inventory(inventory_items);

    let slots: Vec<String> = match course {
        Some(c) if !c.is_empty() => vec![c.to_string()],
        _ => DEFAULT_COURSES.iter().map(|c| c.to_string()).collect(),
    };
    let diet_pattern = diet
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_lowercase);

    let mut suggestions = Vec::new();
    for slot in &slots {
        let slot_pattern = slot.to_lowercase();
        let mut candidates: Vec<&Recipe> = store
            .recipes
            .iter()
            .filter(|r| r.course.to_lowercase().contains(&slot_pattern))
            .collect();
        if let Some(pattern) = &diet_pattern {
            candidates.retain(|r| r.diet.to_lowercase().contains(pattern));
        }
        if candidates.is_empty() {
            continue;
        }

        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .map(|&r| availability_ratio(r, &inventory))
            .enumerate()
            .collect();
        // Stable descending sort: equal ratios keep their source order, so
        // the first element is the earliest best row.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let best = candidates[scored[0].0];

        suggestions.push(build_suggestion(best, &inventory, slot));
    }

    suggestions
}
