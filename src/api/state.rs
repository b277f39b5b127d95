use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::recipe_store::RecipeStore;
use crate::search::EmbeddingEngine;

/// The recipe table together with its startup embedding matrix, one vector
/// per recipe in row order.
pub struct Dataset {
    pub store: RecipeStore,
    pub embeddings: Vec<Vec<f32>>,
}

/// Shared application state: the service context built once at startup and
/// handed to every request handler. Read-only afterwards, so no locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub embedder: EmbeddingEngine,
    /// `None` when the dataset file was missing at startup; data-dependent
    /// endpoints then answer with an error payload instead of the server
    /// refusing to start.
    pub dataset: Option<Dataset>,
}

impl AppState {
    /// Builds the service context: loads the embedding model, then the
    /// recipe table, then embeds every recipe's ingredient string. A missing
    /// or unreadable dataset degrades to `dataset: None` rather than failing.
    pub fn initialize(recipes_csv: &Path) -> Result<Self> {
        let embedder = EmbeddingEngine::new().context("Failed to load embedding model")?;

        let dataset = match RecipeStore::load(recipes_csv) {
            Ok(store) => {
                tracing::info!(recipes = store.len(), "recipe table loaded");
                let texts: Vec<String> = store
                    .recipes
                    .iter()
                    .map(|r| r.embedding_text.clone())
                    .collect();
                let embeddings = embedder
                    .embed(&texts)
                    .context("Failed to embed recipe table")?;
                tracing::info!(count = embeddings.len(), "recipe embeddings computed");
                Some(Dataset { store, embeddings })
            }
            Err(err) => {
                tracing::error!(error = %err, path = ?recipes_csv, "recipe dataset unavailable; serving error responses");
                None
            }
        };

        Ok(Self::new(embedder, dataset))
    }

    pub fn new(embedder: EmbeddingEngine, dataset: Option<Dataset>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { embedder, dataset }),
        }
    }

    pub fn embedder(&self) -> &EmbeddingEngine {
        &self.inner.embedder
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.inner.dataset.as_ref()
    }
}
