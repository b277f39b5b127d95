use std::cmp::Ordering;
use std::collections::BinaryHeap;

type Float = f32;

#[derive(PartialEq)]
struct ScoredIndex {
    score: Float,
    index: usize,
}

impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reversing the comparison turns it into a
        // min-heap over scores so popping evicts the weakest of the kept K.
        other.score.partial_cmp(&self.score).unwrap_or_else(|| {
            // NaN sorts below any real score and never survives the heap.
            if self.score.is_nan() && !other.score.is_nan() {
                Ordering::Less
            } else if !self.score.is_nan() && other.score.is_nan() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    }
}

/// Normalizes a vector to unit length. Zero vectors come back as zero
/// vectors rather than NaN, so their cosine score against anything is 0.
pub fn normalize(vector: &[Float]) -> Vec<Float> {
    let norm_sq: Float = vector.iter().map(|&x| x * x).sum();
    if norm_sq == 0.0 {
        return vec![0.0; vector.len()];
    }
    let inv_norm = 1.0 / norm_sq.sqrt();
    vector.iter().map(|&x| x * inv_norm).collect()
}

#[inline]
fn dot_product(a: &[Float], b: &[Float]) -> Float {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Ranks `vectors` by cosine similarity against `query` and returns the top
/// `k` as `(index, score)` pairs, highest score first.
pub fn top_k_cosine(query: &[Float], vectors: &[Vec<Float>], k: usize) -> Vec<(usize, Float)> {
    if vectors.is_empty() || k == 0 {
        return Vec::new();
    }
    let query_norm = normalize(query);

    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (index, vector) in vectors.iter().enumerate() {
        let score = dot_product(&normalize(vector), &query_norm);
        heap.push(ScoredIndex { score, index });
        if heap.len() > k {
            heap.pop();
        }
    }

    // Ord is reversed for the min-heap, so the sorted vec comes out highest
    // score first.
    heap.into_sorted_vec()
        .into_iter()
        .map(|si| (si.index, si.score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_top_k_orders_by_similarity() {
        let query = vec![1.0, 0.0];
        let vectors = vec![
            vec![0.0, 1.0],   // orthogonal
            vec![1.0, 0.0],   // identical direction
            vec![1.0, 1.0],   // 45 degrees
            vec![-1.0, 0.0],  // opposite
        ];
        let ranked = top_k_cosine(&query, &vectors, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 1);
        assert!((ranked[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(ranked[1].0, 2);
        assert_eq!(ranked[2].0, 0);
    }

    #[test]
    fn test_top_k_larger_than_input() {
        let query = vec![1.0, 0.0];
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let ranked = top_k_cosine(&query, &vectors, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 0);
    }

    #[test]
    fn test_top_k_empty_input() {
        assert!(top_k_cosine(&[1.0], &[], 5).is_empty());
        assert!(top_k_cosine(&[1.0], &[vec![1.0]], 0).is_empty());
    }

    #[test]
    fn test_top_k_zero_vectors_score_zero() {
        let query = vec![1.0, 0.0];
        let vectors = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
        let ranked = top_k_cosine(&query, &vectors, 2);
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 0);
        assert_eq!(ranked[1].1, 0.0);
    }
}
