//! Spectral embedding of the document similarity graph
//!
//! Normalized affinity `D^-1/2 A D^-1/2`, top eigenvectors by subspace
//! iteration, rows scaled to unit length (Ng, Jordan & Weiss).

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::config::EIGEN_TOLERANCE;
use crate::core::{Affinity, SparseVector};
use crate::ui;

/// Dense `n × n` affinity matrix. The diagonal is always 1.
pub fn affinity_matrix(embeddings: &[SparseVector], affinity: Affinity) -> Array2<f64> {
	let n = embeddings.len();
	let norms: Vec<f64> = embeddings.iter().map(|e| e.norm() as f64).collect();

	let rows: Vec<f64> = (0..n)
		.into_par_iter()
		.flat_map_iter(|i| {
			let norms = &norms;
			(0..n).map(move |j| {
				if i == j {
					return 1.0;
				}
				let dot = embeddings[i].dot(&embeddings[j]) as f64;
				match affinity {
					Affinity::Rbf { gamma } => {
						let dist_sq = (norms[i] * norms[i] + norms[j] * norms[j] - 2.0 * dot).max(0.0);
						(-gamma * dist_sq).exp()
					}
					Affinity::Cosine => {
						let denom = norms[i] * norms[j];
						if denom > 0.0 {
							(dot / denom).max(0.0)
						} else {
							0.0
						}
					}
				}
			})
		})
		.collect();

	Array2::from_shape_vec((n, n), rows).unwrap_or_else(|_| Array2::eye(n))
}

/// `n × k` matrix whose rows are the unit-length spectral coordinates.
pub fn embed(affinity: &Array2<f64>, k: usize, max_iter: usize, rng: &mut StdRng) -> Array2<f64> {
	let n = affinity.nrows();
	let degrees: Array1<f64> = affinity.sum_axis(ndarray::Axis(1));
	let inv_sqrt: Array1<f64> = degrees.mapv(|d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 });

	// Shift by I so every eigenvalue is non-negative and the largest ones dominate
	let mut operator = Array2::<f64>::eye(n);
	for ((i, j), a) in affinity.indexed_iter() {
		operator[[i, j]] += a * inv_sqrt[i] * inv_sqrt[j];
	}

	let mut basis = Array2::from_shape_fn((n, k), |_| rng.random_range(-0.5..0.5));
	orthonormalize(&mut basis, rng);

	let mut previous = f64::NAN;
	let mut iterations = 0;
	for _ in 0..max_iter {
		iterations += 1;
		let mut next = operator.dot(&basis);

		let rayleigh: f64 = (0..k).map(|c| basis.column(c).dot(&next.column(c))).sum();
		orthonormalize(&mut next, rng);
		basis = next;

		if (rayleigh - previous).abs() <= EIGEN_TOLERANCE * rayleigh.abs().max(1.0) {
			break;
		}
		previous = rayleigh;
	}
	ui::debug(&format!("Spectral embedding converged after {} iterations", iterations));

	for mut row in basis.rows_mut() {
		let norm = row.dot(&row).sqrt();
		if norm > 0.0 {
			row.mapv_inplace(|v| v / norm);
		}
	}
	basis
}

/// Modified Gram-Schmidt over columns. Collapsed columns are redrawn.
fn orthonormalize(matrix: &mut Array2<f64>, rng: &mut StdRng) {
	let (n, k) = matrix.dim();
	for c in 0..k {
		for _attempt in 0..4 {
			let mut v = matrix.column(c).to_owned();
			for p in 0..c {
				let q = matrix.column(p);
				let proj = q.dot(&v);
				v.scaled_add(-proj, &q);
			}

			let norm = v.dot(&v).sqrt();
			if norm > 1e-10 {
				matrix.column_mut(c).assign(&(v / norm));
				break;
			}

			let fresh = Array1::from_shape_fn(n, |_| rng.random_range(-0.5..0.5));
			matrix.column_mut(c).assign(&fresh);
		}
	}
}
