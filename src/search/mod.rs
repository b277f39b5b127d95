pub mod embedding_engine;
pub mod similarity;

pub use embedding_engine::EmbeddingEngine;
pub use embedding_engine::EMBEDDING_DIMENSION;
pub use similarity::top_k_cosine;
