//! This is the vector math module
//! Provide norms, dot product, cosine similarity and the small
//! amount of vector arithmetic the query engines need

use crate::error::{EmbedError, Result};

/// L2 Norm
/// ||vec|| = sqrt(sum(vec[i]^2))
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter()
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt()
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions
pub fn dot_product(left: &[f32], right: &[f32]) -> Result<f32> {
    check_dimension(left, right)?;

    let dot_prod = left.iter()
        .zip(right.iter())
        .map(|(x, y)| x * y)
        .sum();

    Ok(dot_prod)
}

/// Cosine Similarity
/// cos = dot(u, v) / (||u|| * ||v||)
/// Zero vectors have no direction and are rejected
pub fn cosine(left: &[f32], right: &[f32]) -> Result<f32> {
    let dot = dot_product(left, right)?;
    let denom = l2_norm(left) * l2_norm(right);
    if denom == 0.0 {
        return Err(EmbedError::ZeroVector);
    }

    // Rounding can push the ratio a hair outside [-1, 1]
    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Unit vector in the direction of `vector`
/// Fails with ZeroVector when there is no direction to keep
pub fn unit(vector: &[f32]) -> Result<Vec<f32>> {
    let norm = l2_norm(vector);
    if norm == 0.0 {
        return Err(EmbedError::ZeroVector);
    }
    Ok(vector.iter().map(|x| x / norm).collect())
}

/// Analogy offset: b - a + c
pub fn offset(a: &[f32], b: &[f32], c: &[f32]) -> Result<Vec<f32>> {
    check_dimension(a, b)?;
    check_dimension(a, c)?;

    let target = a.iter()
        .zip(b.iter())
        .zip(c.iter())
        .map(|((x, y), z)| y - x + z)
        .collect();

    Ok(target)
}

/// Element-wise arithmetic mean of a non-empty group of equal-length vectors
pub fn mean(vectors: &[&[f32]]) -> Result<Vec<f32>> {
    let Some(first) = vectors.first() else {
        return Err(EmbedError::InsufficientInput { needed: 1, got: 0 });
    };

    let mut sum = vec![0.0f32; first.len()];
    for v in vectors {
        check_dimension(first, v)?;
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }

    let n = vectors.len() as f32;
    Ok(sum.into_iter().map(|x| x / n).collect())
}

fn check_dimension(left: &[f32], right: &[f32]) -> Result<()> {
    if left.len() != right.len() {
        return Err(EmbedError::DimensionMismatch { expected: left.len(), actual: right.len() });
    }
    Ok(())
}
