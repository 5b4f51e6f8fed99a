//! Vector index abstraction.
//!
//! Defines a trait for backend-agnostic storage of `(id, vector, text)`
//! entries grouped in named collections, queried by cosine distance.

use crate::types::{CollectionInfo, IndexEntry, ScoredText};
use grounded_core::AppResult;

/// Trait for vector index backends.
///
/// Implementations must:
/// - treat a missing collection on `clear_collection` as a normal outcome,
///   while still reporting storage failures
/// - overwrite an entry when `add` is called with an id already present in
///   the collection
/// - reject vectors whose length differs from the collection's dimensions
/// - return query hits in ascending cosine distance, ties in insertion order
pub trait VectorIndex: Send + Sync {
    /// Remove a collection and all its entries.
    ///
    /// Returns whether the collection existed.
    fn clear_collection(&mut self, name: &str) -> AppResult<bool>;

    /// Create an empty collection for vectors of `dimensions` produced by
    /// `embedding_model`. Creating a collection that already exists is an error.
    fn create_collection(
        &mut self,
        name: &str,
        dimensions: usize,
        embedding_model: &str,
    ) -> AppResult<CollectionInfo>;

    /// Metadata of a collection, or `None` if it does not exist.
    fn collection_info(&self, name: &str) -> AppResult<Option<CollectionInfo>>;

    /// Insert an entry, replacing any entry with the same id.
    fn add(&mut self, collection: &str, entry: IndexEntry) -> AppResult<()>;

    /// The `k` entries nearest to `vector`, most similar first.
    fn query(&self, collection: &str, vector: &[f32], k: usize) -> AppResult<Vec<ScoredText>>;

    /// Number of entries in a collection.
    fn count(&self, collection: &str) -> AppResult<usize>;
}

/// Cosine distance `1 - cos_sim`, in `[0, 2]`.
///
/// A zero-magnitude vector has similarity 0 with everything, so its
/// distance is 1.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let similarity = (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0);
    1.0 - similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_distance_is_one() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_distance(&[1.0, 0.0], &[0.0, 0.0]), 1.0);
    }
}
