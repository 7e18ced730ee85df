//! In-memory cosine-similarity retrieval over embedded chunks

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Chunk text
    pub content: String,
    /// Cosine similarity (higher is better)
    pub similarity: f32,
}

/// Embedded chunks of a single document
pub struct ChunkIndex {
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl ChunkIndex {
    /// Build an index from chunks and their embeddings.
    ///
    /// Callers must supply one embedding per chunk.
    pub fn new(chunks: Vec<String>, embeddings: Vec<Vec<f32>>) -> Self {
        debug_assert_eq!(chunks.len(), embeddings.len());
        Self { chunks, embeddings }
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top-k chunks by cosine similarity to the query embedding
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(self.embeddings.iter())
            .map(|(content, embedding)| ScoredChunk {
                content: content.clone(),
                similarity: cosine_similarity(query, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }
}

/// Cosine similarity between two vectors (0.0 for mismatched or zero vectors)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let index = ChunkIndex::new(
            vec!["north".to_string(), "east".to_string(), "diagonal".to_string()],
            vec![
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![0.7, 0.7],
            ],
        );

        let results = index.search(&[1.0, 0.1], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "east");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_search_truncates_to_top_k() {
        let index = ChunkIndex::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0], vec![0.5]],
        );
        assert_eq!(index.search(&[1.0], 10).len(), 2);
        assert_eq!(index.search(&[1.0], 1).len(), 1);
    }
}
