//! Plain vector math over `f32` embeddings.

use crate::error::{Error, Result};

fn ensure_same_dim(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(Error::dimension_mismatch(a.len(), b.len()))
    }
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_same_dim(a, b)?;
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok(sum.sqrt())
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` when either side has zero magnitude. That value means
/// "no evidence", not orthogonality.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    ensure_same_dim(a, b)?;
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Element-wise mean. Sums are accumulated in `f64`.
pub fn centroid<V: AsRef<[f32]>>(vectors: &[V]) -> Result<Vec<f32>> {
    let first = vectors
        .first()
        .ok_or_else(|| Error::EmptyInput("centroid of zero vectors".to_string()))?;
    let dim = first.as_ref().len();
    let mut acc = vec![0.0f64; dim];
    for v in vectors {
        let v = v.as_ref();
        if v.len() != dim {
            return Err(Error::dimension_mismatch(dim, v.len()));
        }
        for (slot, x) in acc.iter_mut().zip(v) {
            *slot += f64::from(*x);
        }
    }
    let n = vectors.len() as f64;
    #[allow(clippy::cast_possible_truncation)]
    let mean = acc.into_iter().map(|s| (s / n) as f32).collect();
    Ok(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_norm() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn euclidean_matches_pythagoras() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).expect("same dim");
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_parallel_and_opposite() {
        let s = cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]).expect("same dim");
        assert!((s - 1.0).abs() < 1e-6);
        let s = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).expect("same dim");
        assert!((s + 1.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_is_mean() {
        let c = centroid(&[vec![0.0, 2.0], vec![2.0, 4.0]]).expect("non-empty");
        assert_eq!(c, vec![1.0, 3.0]);
    }
}
