pub mod ollama;
pub mod provider;
pub mod similarity;

pub use ollama::{OllamaHealthStatus, OllamaProvider};
pub use provider::{EmbeddingError, EmbeddingProvider};
pub use similarity::{EmbeddingOracle, SimilarityOracle, cosine_similarity, rank_by_similarity};
