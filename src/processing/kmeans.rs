//! Seeded k-means over spectral coordinates, backed by linfa

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2, ArrayView1};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::config::KMEANS_TOLERANCE;
use crate::error::{Error, Result};
use crate::ui;

/// Best labelling over `restarts` k-means++ runs. Every label in `0..k` is
/// used when `k <= points.nrows()`.
pub fn fit(points: &Array2<f64>, k: usize, restarts: usize, max_iter: usize, seed: u64) -> Result<Vec<usize>> {
	let n = points.nrows();
	// linfa needs as many distinct points as clusters
	let distinct = count_distinct(points);
	let effective = k.min(distinct).max(1);

	let (mut labels, mut centroids) = if effective == 1 {
		let mean = points.mean_axis(ndarray::Axis(0)).unwrap_or_else(|| Array1::zeros(points.ncols()));
		let mut centroids = Array2::zeros((k, points.ncols()));
		centroids.row_mut(0).assign(&mean);
		(vec![0; n], centroids)
	} else {
		let dataset = DatasetBase::from(points.clone());
		let model = KMeans::params_with_rng(effective, Xoshiro256Plus::seed_from_u64(seed))
			.n_runs(restarts.max(1))
			.max_n_iterations(max_iter as u64)
			.tolerance(KMEANS_TOLERANCE)
			.fit(&dataset)
			.map_err(|e| Error::config(format!("k-means failed: {}", e)))?;

		let predicted: Array1<usize> = model.predict(points);
		let mut centroids = Array2::zeros((k, points.ncols()));
		for (c, row) in model.centroids().rows().into_iter().enumerate() {
			centroids.row_mut(c).assign(&row);
		}
		(predicted.to_vec(), centroids)
	};

	if effective < k {
		ui::debug(&format!("Only {} distinct points for {} clusters", distinct, k));
	}
	repair_empty(points, &mut centroids, &mut labels, k);
	Ok(labels)
}

fn count_distinct(points: &Array2<f64>) -> usize {
	let mut seen: Vec<ArrayView1<f64>> = Vec::new();
	for row in points.rows() {
		if !seen.iter().any(|s| sq_dist(*s, row) <= f64::EPSILON) {
			seen.push(row);
		}
	}
	seen.len()
}

/// Moves the worst-fitting point of a multi-member cluster into each empty one.
fn repair_empty(points: &Array2<f64>, centroids: &mut Array2<f64>, labels: &mut [usize], k: usize) {
	let n = labels.len();
	if k > n {
		return;
	}

	loop {
		let mut sizes = vec![0usize; k];
		for &l in labels.iter() {
			sizes[l] += 1;
		}
		let Some(empty) = sizes.iter().position(|&s| s == 0) else {
			return;
		};

		let donor = (0..n)
			.filter(|&i| sizes[labels[i]] > 1)
			.max_by(|&a, &b| {
				let da = sq_dist(points.row(a), centroids.row(labels[a]));
				let db = sq_dist(points.row(b), centroids.row(labels[b]));
				da.total_cmp(&db).then_with(|| b.cmp(&a))
			});

		let Some(donor) = donor else {
			return;
		};
		labels[donor] = empty;
		centroids.row_mut(empty).assign(&points.row(donor));
	}
}

fn sq_dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
	a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
