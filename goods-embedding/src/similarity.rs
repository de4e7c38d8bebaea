//! Cosine similarity calculations

use goods_core::SearchHit;
use ndarray::ArrayView1;
use tracing::debug;

/// Calculate cosine similarity between two embeddings
///
/// Returns a value between -1.0 (opposite) and 1.0 (identical). A zero
/// vector scores 0.0 against anything.
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "Embeddings must have same dimension (got {} and {})",
        a.len(),
        b.len()
    );

    let a_view = ArrayView1::from(a);
    let b_view = ArrayView1::from(b);

    let dot_product = a_view.dot(&b_view);
    let norm_a = a_view.dot(&a_view).sqrt();
    let norm_b = b_view.dot(&b_view).sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank candidate vectors against a query, best first
///
/// Candidates must share the query's dimension. Equal scores keep candidate
/// order. At most `top_k` hits are returned.
pub fn rank_by_similarity(query: &[f32], candidates: &[Vec<f32>], top_k: usize) -> Vec<SearchHit> {
    debug!(
        "Ranking {} candidates, top_k={}",
        candidates.len(),
        top_k
    );

    let mut hits: Vec<SearchHit> = candidates
        .iter()
        .enumerate()
        .map(|(position, embedding)| SearchHit {
            position,
            score: cosine_similarity(query, embedding),
        })
        .collect();

    // Stable sort, score descending
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top_k);

    if let Some(top) = hits.first() {
        debug!("Top match: position={}, score={:.3}", top.position, top.score);
    }

    hits
}
