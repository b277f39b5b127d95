use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A previously suggested recipe as echoed back by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedRecipe {
    pub recipe_title: String,
    #[serde(default)]
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
}

/// One shopping-list line: an ingredient and the recipes that need it, in
/// the order they were encountered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingItem {
    pub item: String,
    pub needed_for: Vec<String>,
}

/// Aggregates the missing ingredients of a batch of recipes into one
/// shopping list. Items are trimmed and lower-cased, blanks are skipped,
/// and the output preserves first-seen item order. A recipe appearing twice
/// contributes its title twice.
pub fn aggregate_shopping_list(recipes: &[SuggestedRecipe]) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = Vec::new();
    let mut index_by_item: HashMap<String, usize> = HashMap::new();

    for recipe in recipes {
        for missing in &recipe.missing_ingredients {
            let item = missing.trim().to_lowercase();
            if item.is_empty() {
                continue;
            }
            match index_by_item.get(&item) {
                Some(&idx) => items[idx].needed_for.push(recipe.recipe_title.clone()),
                None => {
                    index_by_item.insert(item.clone(), items.len());
                    items.push(ShoppingItem {
                        item,
                        needed_for: vec![recipe.recipe_title.clone()],
                    });
                }
            }
        }
    }

    items
}
