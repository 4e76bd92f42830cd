//! 2D projection of a word subset by principal-component analysis.
//!
//! The subset is centered and the top two principal axes are taken from the
//! eigen-decomposition of its Gram matrix `Xc * Xc^T` (n x n, where n is the
//! number of words). Since n is small compared to the embedding dimension this
//! is much cheaper than decomposing the D x D covariance, and the scores fall
//! out directly: the score of row i on axis k is `sqrt(lambda_k) * u_k[i]`.
//!
//! Nothing is cached; every call fits a fresh reduction on exactly the words given.

use crate::error::{EmbedError, Result};
use crate::fuzzy;
use crate::store::EmbeddingStore;
use serde::Serialize;
use tracing::{debug, warn};

const MAX_SWEEPS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub word: String,
    pub x: f32,
    pub y: f32,
}

/// Reduced coordinates in input order, plus the share of the subset's
/// variance captured by each axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub points: Vec<ProjectedPoint>,
    pub explained_variance_ratio: [f32; 2],
}

/// Projects the known words among `words` onto their top two principal axes.
///
/// Tokens are corrected; those still unknown are dropped, repeats collapse onto
/// their first occurrence. At least two words must survive. Each axis is
/// oriented so that its largest-magnitude score is positive.
pub fn project_2d<S: AsRef<str>>(store: &EmbeddingStore, words: &[S], cutoff: f64) -> Result<Projection> {
    let mut valid: Vec<String> = Vec::with_capacity(words.len());
    for token in words {
        let word = fuzzy::correct(store, token.as_ref(), cutoff);
        if !store.contains(&word) {
            warn!(word = %word, "skipping unknown word in projection");
            continue;
        }
        if !valid.contains(&word) {
            valid.push(word);
        }
    }

    if valid.len() < 2 {
        return Err(EmbedError::InsufficientInput { needed: 2, got: valid.len() });
    }

    let rows = valid
        .iter()
        .map(|w| store.vector(w))
        .collect::<Result<Vec<_>>>()?;
    let centered = center(&rows);
    let gram = gram_matrix(&centered);
    let total_variance: f64 = (0..gram.len()).map(|i| gram[i][i]).sum();

    let (values, vectors) = jacobi_eigen(gram);
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut axes = [vec![0.0f64; valid.len()], vec![0.0f64; valid.len()]];
    let mut ratio = [0.0f32; 2];
    let floor = 1e-12 * values[order[0]].max(1.0);
    for (axis, &k) in axes.iter_mut().zip(order.iter()) {
        let lambda = values[k];
        if lambda <= floor {
            continue;
        }
        let scale = lambda.sqrt();
        for (i, score) in axis.iter_mut().enumerate() {
            *score = scale * vectors[i][k];
        }
        orient(axis);
    }
    if total_variance > 0.0 {
        for (r, &k) in ratio.iter_mut().zip(order.iter()) {
            *r = (values[k].max(0.0) / total_variance) as f32;
        }
    }

    debug!(words = valid.len(), ?ratio, "project_2d");

    let points = valid
        .into_iter()
        .enumerate()
        .map(|(i, word)| ProjectedPoint { word, x: axes[0][i] as f32, y: axes[1][i] as f32 })
        .collect();

    Ok(Projection { points, explained_variance_ratio: ratio })
}

/// Subtracts column means, promoting to f64.
fn center(rows: &[&[f32]]) -> Vec<Vec<f64>> {
    let n = rows.len() as f64;
    let dim = rows.first().map_or(0, |r| r.len());

    let mut means = vec![0.0f64; dim];
    for row in rows {
        for (m, &x) in means.iter_mut().zip(row.iter()) {
            *m += x as f64;
        }
    }
    means.iter_mut().for_each(|m| *m /= n);

    rows.iter()
        .map(|row| row.iter().zip(means.iter()).map(|(&x, m)| x as f64 - m).collect())
        .collect()
}

fn gram_matrix(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = rows.len();
    let mut gram = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot: f64 = rows[i].iter().zip(rows[j].iter()).map(|(a, b)| a * b).sum();
            gram[i][j] = dot;
            gram[j][i] = dot;
        }
    }
    gram
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns the eigenvalues and a matrix whose column `k` is the unit
/// eigenvector for eigenvalue `k`.
fn jacobi_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v = vec![vec![0.0f64; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum();
    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (0..n).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off <= 1e-30 * scale || off == 0.0 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
                for row in v.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}

/// Flips an axis so its largest-magnitude entry (first on ties) is positive.
fn orient(axis: &mut [f64]) {
    let mut pivot = 0;
    for (i, x) in axis.iter().enumerate() {
        if x.abs() > axis[pivot].abs() {
            pivot = i;
        }
    }
    if axis.get(pivot).is_some_and(|&x| x < 0.0) {
        axis.iter_mut().for_each(|x| *x = -*x);
    }
}
