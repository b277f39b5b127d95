use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use crate::ingredient::{normalize_ingredient, split_ingredient_names};

// Expected column headers. Only the title and ingredient columns are
// required; the rest default to an empty string when the column is absent.
const TITLE_COL: &str = "recipe_title";
const INGREDIENTS_COL: &str = "ingredients";
const URL_COL: &str = "url";
const IMAGE_COL: &str = "recipe_image";
const PREP_TIME_COL: &str = "prep_time";
const COURSE_COL: &str = "course";
const DIET_COL: &str = "diet";
const DESCRIPTION_COL: &str = "description";
const INSTRUCTIONS_COL: &str = "instructions";

/// One recipe row, with every derived view of its ingredient string computed
/// up front at load time. The store is read-only for the process lifetime, so
/// nothing is recomputed or cached lazily per request.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub title: String,
    /// Raw pipe-delimited ingredient string as it appears in the CSV.
    pub ingredients: String,
    pub url: String,
    pub image: String,
    pub prep_time: String,
    pub course: String,
    pub diet: String,
    pub description: String,
    pub instructions: String,
    /// Trimmed, non-empty ingredient tokens in their original casing.
    pub ingredient_names: Vec<String>,
    /// Canonical form of each entry in `ingredient_names`, same order.
    pub normalized_ingredients: Vec<String>,
    /// Lower-cased tokens joined with ", "; the embedding input.
    pub embedding_text: String,
}

impl Recipe {
    /// Builds a recipe from its raw column values, deriving the ingredient
    /// views. Used by the loader and by tests that assemble stores in memory.
    #[allow(clippy::too_many_arguments)]
    pub fn from_columns(
        title: String,
        ingredients: String,
        url: String,
        image: String,
        prep_time: String,
        course: String,
        diet: String,
        description: String,
        instructions: String,
    ) -> Self {
        let ingredient_names = split_ingredient_names(&ingredients);
        let normalized_ingredients = ingredient_names
            .iter()
            .map(|name| normalize_ingredient(name))
            .collect();
        let embedding_text = ingredients
            .split('|')
            .map(|token| token.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title,
            ingredients,
            url,
            image,
            prep_time,
            course,
            diet,
            description,
            instructions,
            ingredient_names,
            normalized_ingredients,
            embedding_text,
        }
    }
}

/// The recipe table, loaded once at startup. Row order is preserved from the
/// CSV: meal-plan tie-breaking depends on it.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    pub recipes: Vec<Recipe>,
}

impl RecipeStore {
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Loads the recipe table from a CSV file.
    pub fn load(csv_path: &Path) -> Result<Self> {
        if !csv_path.exists() {
            return Err(anyhow::anyhow!("Recipe CSV file not found at: {:?}", csv_path));
        }

        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open recipe CSV file at {:?}", csv_path))?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = rdr.headers()?.clone();
        let col = |name: &str| headers.iter().position(|h| h == name);

        let title_idx = col(TITLE_COL)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", TITLE_COL))?;
        let ingredients_idx = col(INGREDIENTS_COL)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", INGREDIENTS_COL))?;
        let url_idx = col(URL_COL);
        let image_idx = col(IMAGE_COL);
        let prep_time_idx = col(PREP_TIME_COL);
        let course_idx = col(COURSE_COL);
        let diet_idx = col(DIET_COL);
        let description_idx = col(DESCRIPTION_COL);
        let instructions_idx = col(INSTRUCTIONS_COL);

        let optional = |record: &csv::StringRecord, idx: Option<usize>| -> String {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        let mut recipes = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record =
                result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

            let title = record
                .get(title_idx)
                .ok_or_else(|| anyhow::anyhow!("Missing title at row {}", row_index))?
                .trim()
                .to_string();
            if title.is_empty() {
                continue;
            }

            let ingredients = record.get(ingredients_idx).unwrap_or_default().to_string();

            recipes.push(Recipe::from_columns(
                title,
                ingredients,
                optional(&record, url_idx),
                optional(&record, image_idx),
                optional(&record, prep_time_idx),
                optional(&record, course_idx),
                optional(&record, diet_idx),
                optional(&record, description_idx),
                optional(&record, instructions_idx),
            ));
        }

        if recipes.is_empty() {
            return Err(anyhow::anyhow!("No valid recipes loaded from {:?}", csv_path));
        }

        Ok(Self { recipes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            TITLE_COL,
            INGREDIENTS_COL,
            URL_COL,
            IMAGE_COL,
            PREP_TIME_COL,
            COURSE_COL,
            DIET_COL,
            DESCRIPTION_COL,
            INSTRUCTIONS_COL
        )?;
        writeln!(
            file,
            "Masala Omelette,Egg | Atta | Onion,https://example.com/omelette,,10 min,Breakfast,Eggetarian,A quick omelette,Beat and fry"
        )?;
        writeln!(file, "Plain Rice,Rice,https://example.com/rice,,15 min,Lunch,Vegetarian,,")?;
        writeln!(file, ",Ghost | Row,,,,,,,")?; // empty title, skipped
        writeln!(file, "Empty Ingredients,,,,,Dinner,Vegan,,")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_recipes_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let store = RecipeStore::load(file.path())?;

        assert_eq!(store.len(), 3); // empty-title row skipped

        let omelette = &store.recipes[0];
        assert_eq!(omelette.title, "Masala Omelette");
        assert_eq!(omelette.ingredient_names, vec!["Egg", "Atta", "Onion"]);
        assert_eq!(
            omelette.normalized_ingredients,
            vec!["egg", "wheat flour", "onion"]
        );
        assert_eq!(omelette.embedding_text, "egg, atta, onion");
        assert_eq!(omelette.course, "Breakfast");

        let empty = &store.recipes[2];
        assert!(empty.ingredient_names.is_empty());
        assert!(empty.normalized_ingredients.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_recipes_missing_optional_columns_default_empty() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{}", TITLE_COL, INGREDIENTS_COL)?;
        writeln!(file, "Dal,Lentils | Haldi | Water")?;
        file.flush()?;

        let store = RecipeStore::load(file.path())?;
        assert_eq!(store.len(), 1);
        let dal = &store.recipes[0];
        assert_eq!(dal.course, "");
        assert_eq!(dal.diet, "");
        assert_eq!(dal.url, "");
        assert_eq!(dal.normalized_ingredients, vec!["lentils", "turmeric", "water"]);
        Ok(())
    }

    #[test]
    fn test_load_recipes_missing_required_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{}", TITLE_COL, URL_COL)?;
        writeln!(file, "Dal,https://example.com/dal")?;
        file.flush()?;

        let result = RecipeStore::load(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(&format!("Column '{}' not found", INGREDIENTS_COL)));
        Ok(())
    }

    #[test]
    fn test_load_recipes_empty_file_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{}", TITLE_COL, INGREDIENTS_COL)?;
        file.flush()?;

        let result = RecipeStore::load(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No valid recipes loaded"));
        Ok(())
    }

    #[test]
    fn test_load_recipes_file_not_found() {
        let path = Path::new("this_file_does_not_exist.csv");
        let result = RecipeStore::load(path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Recipe CSV file not found"));
    }
}
