//! Clustering parameters

use serde::{Deserialize, Serialize};

use crate::config;

/// Edge weights of the document similarity graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Affinity {
	/// `exp(-gamma * ||a - b||^2)`
	Rbf { gamma: f64 },
	/// Cosine similarity, negatives clipped to zero
	Cosine,
}

impl Default for Affinity {
	fn default() -> Self {
		Self::Rbf { gamma: config::DEFAULT_RBF_GAMMA }
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
	pub affinity: Affinity,
	/// Seed for eigenvector initialization and k-means
	pub seed: u64,
	pub max_eigen_iter: usize,
	pub kmeans_restarts: usize,
	pub max_kmeans_iter: usize,
}

impl Default for ClusterOptions {
	fn default() -> Self {
		Self {
			affinity: Affinity::default(),
			seed: config::DEFAULT_SEED,
			max_eigen_iter: config::MAX_EIGEN_ITER,
			kmeans_restarts: config::KMEANS_RESTARTS,
			max_kmeans_iter: config::MAX_KMEANS_ITER,
		}
	}
}

impl ClusterOptions {
	pub fn with_affinity(mut self, affinity: Affinity) -> Self {
		self.affinity = affinity;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}
}
