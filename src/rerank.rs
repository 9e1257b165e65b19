use crate::chunking::ChunkId;

/// A retrieved chunk handed to the reranker: its key, stored vector and text
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: ChunkId,
    pub vector: &'a [f32],
    pub text: &'a str,
}

/// Re-score candidates by cosine similarity to the query and keep the best.
///
/// Candidates are sorted descending by similarity with a stable sort, so
/// equal scores (duplicate text embeds identically) keep their original
/// retrieval order. At most `min(final_k, candidates)` chunk texts are
/// returned; scores are not part of the result.
pub fn rerank(query: &[f32], candidates: &[Candidate<'_>], final_k: usize) -> Vec<String> {
    let mut scored: Vec<(f32, &str)> = candidates
        .iter()
        .map(|c| (cosine_similarity(query, c.vector), c.text))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(usize::min(final_k, scored.len()));

    scored.into_iter().map(|(_, text)| text.to_string()).collect()
}

/// Cosine similarity between two equal-length vectors.
///
/// A zero-norm vector has similarity 0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(id: u64, vector: &'a [f32], text: &'a str) -> Candidate<'a> {
        Candidate {
            id: ChunkId(id),
            vector,
            text,
        }
    }

    #[test]
    fn orders_by_descending_cosine_similarity() {
        let query = [0.95, 0.05];
        let candidates = [
            candidate(2, &[0.9, 0.1], "logement abordable"),
            candidate(0, &[1.0, 0.0], "eau potable plan"),
        ];

        // [1, 0] is angularly closer to the query than [0.9, 0.1], whatever
        // the retrieval order was.
        let ranked = rerank(&query, &candidates, 2);
        assert_eq!(ranked, vec!["eau potable plan", "logement abordable"]);
    }

    #[test]
    fn magnitude_does_not_affect_the_ranking() {
        let query = [0.95, 0.05];
        // Same direction as [1, 0] but Euclidean-far from the query
        let candidates = [
            candidate(2, &[0.9, 0.1], "logement abordable"),
            candidate(0, &[2.0, 0.0], "eau potable plan"),
        ];

        let ranked = rerank(&query, &candidates, 1);
        assert_eq!(ranked, vec!["eau potable plan"]);
    }

    #[test]
    fn final_k_is_clamped_to_candidate_count() {
        let query = [1.0, 0.0];
        let candidates = [candidate(0, &[1.0, 0.0], "seul")];
        assert_eq!(rerank(&query, &candidates, 5), vec!["seul"]);
    }

    #[test]
    fn equal_scores_keep_retrieval_order() {
        let query = [1.0, 0.0];
        let vector = [0.5, 0.5];
        let candidates = [
            candidate(3, &vector, "premier"),
            candidate(1, &vector, "second"),
            candidate(2, &vector, "troisième"),
        ];

        let ranked = rerank(&query, &candidates, 3);
        assert_eq!(ranked, vec!["premier", "second", "troisième"]);
    }

    #[test]
    fn reranking_is_deterministic() {
        let query = [0.3, 0.7];
        let v1 = [0.2, 0.8];
        let v2 = [0.9, 0.1];
        let candidates = [candidate(0, &v1, "a"), candidate(1, &v2, "b")];

        assert_eq!(
            rerank(&query, &candidates, 2),
            rerank(&query, &candidates, 2)
        );
    }

    #[test]
    fn zero_norm_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_of_identical_directions_is_one() {
        let sim = cosine_similarity(&[2.0, 0.0], &[4.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }
}
