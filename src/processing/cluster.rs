//! Spectral clustering of embedded documents

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::core::{ClusterOptions, SparseVector};
use crate::error::{Error, Result};
use crate::processing::{kmeans, spectral};
use crate::ui;

/// Cluster assignment for every corpus position plus per-cluster centroids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clusterer {
	labels: Vec<usize>,
	members: Vec<Vec<usize>>,
	centroids: Vec<Option<SparseVector>>,
}

impl Clusterer {
	/// Partitions `embeddings` into exactly `cluster_count` labelled groups.
	pub fn cluster(embeddings: &[SparseVector], cluster_count: usize, options: &ClusterOptions) -> Result<Self> {
		let n = embeddings.len();
		if cluster_count < 1 || cluster_count > n {
			return Err(Error::config(format!(
				"cluster count must be within 1..={}, got {}",
				n, cluster_count
			)));
		}

		ui::debug(&format!("Clustering {} documents into {} clusters", n, cluster_count));

		let raw = if cluster_count == 1 {
			vec![0; n]
		} else {
			let mut rng = StdRng::seed_from_u64(options.seed);
			let affinity = spectral::affinity_matrix(embeddings, options.affinity);
			let coords = spectral::embed(&affinity, cluster_count, options.max_eigen_iter, &mut rng);
			kmeans::fit(
				&coords,
				cluster_count,
				options.kmeans_restarts,
				options.max_kmeans_iter,
				options.seed,
			)?
		};

		let labels = relabel_by_size(&raw);
		let clusterer = Self::from_labels(embeddings, labels, cluster_count)?;

		ui::debug(&format!("Cluster sizes: {:?}", clusterer.sizes()));
		Ok(clusterer)
	}

	/// Builds centroids for an existing assignment. Clusters may be empty.
	pub fn from_labels(embeddings: &[SparseVector], labels: Vec<usize>, cluster_count: usize) -> Result<Self> {
		if labels.len() != embeddings.len() {
			return Err(Error::config(format!(
				"{} labels for {} documents",
				labels.len(),
				embeddings.len()
			)));
		}

		let mut members = vec![Vec::new(); cluster_count];
		for (position, &label) in labels.iter().enumerate() {
			let slot = members.get_mut(label).ok_or_else(|| {
				Error::config(format!("label {} outside 0..{}", label, cluster_count))
			})?;
			slot.push(position);
		}

		let centroids = members
			.iter()
			.map(|positions| SparseVector::mean(positions.iter().map(|&p| &embeddings[p])))
			.collect();

		Ok(Self { labels, members, centroids })
	}

	/// Mean embedding of the cluster's members
	pub fn centroid(&self, label: usize) -> Result<&SparseVector> {
		match self.centroids.get(label) {
			Some(Some(centroid)) => Ok(centroid),
			Some(None) => Err(Error::invalid(format!("cluster {} has no members", label))),
			None => Err(Error::invalid(format!(
				"cluster {} out of range 0..{}",
				label,
				self.cluster_count()
			))),
		}
	}

	pub fn members(&self, label: usize) -> Result<&[usize]> {
		self.members
			.get(label)
			.map(Vec::as_slice)
			.ok_or_else(|| Error::invalid(format!("cluster {} out of range", label)))
	}

	/// Label per corpus position
	pub fn labels(&self) -> &[usize] {
		&self.labels
	}

	pub fn sizes(&self) -> Vec<usize> {
		self.members.iter().map(Vec::len).collect()
	}

	pub fn cluster_count(&self) -> usize {
		self.members.len()
	}
}

/// Largest cluster becomes 0; equal sizes are ordered by their first member.
fn relabel_by_size(raw: &[usize]) -> Vec<usize> {
	let mut groups: HashMap<usize, (usize, usize)> = HashMap::new();
	for (position, &label) in raw.iter().enumerate() {
		let entry = groups.entry(label).or_insert((0, position));
		entry.0 += 1;
	}

	let mut order: Vec<(usize, usize, usize)> = groups
		.into_iter()
		.map(|(label, (size, first))| (label, size, first))
		.collect();
	order.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

	let mapping: HashMap<usize, usize> = order
		.iter()
		.enumerate()
		.map(|(new, &(old, _, _))| (old, new))
		.collect();
	raw.iter().map(|l| mapping[l]).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Affinity;
	use crate::error::ErrorKind;

	fn topics() -> Vec<SparseVector> {
		// two topics on disjoint axes
		vec![
			SparseVector::from_dense(&[1.0, 0.0, 0.0, 0.0]),
			SparseVector::from_dense(&[0.8, 0.6, 0.0, 0.0]),
			SparseVector::from_dense(&[0.6, 0.8, 0.0, 0.0]),
			SparseVector::from_dense(&[0.0, 0.0, 1.0, 0.0]),
			SparseVector::from_dense(&[0.0, 0.0, 0.6, 0.8]),
		]
	}

	#[test]
	fn groups_related_documents() {
		for affinity in [Affinity::Cosine, Affinity::Rbf { gamma: 2.0 }] {
			let options = ClusterOptions::default().with_affinity(affinity);
			let c = Clusterer::cluster(&topics(), 2, &options).unwrap();
			let l = c.labels();
			assert_eq!(l[0], l[1]);
			assert_eq!(l[1], l[2]);
			assert_eq!(l[3], l[4]);
			assert_ne!(l[0], l[3]);
			// larger cluster first
			assert_eq!(c.sizes(), vec![3, 2]);
		}
	}

	#[test]
	fn centroid_matches_recomputed_mean() {
		let embeddings = topics();
		let c = Clusterer::cluster(&embeddings, 2, &ClusterOptions::default()).unwrap();
		for label in 0..c.cluster_count() {
			let members = c.members(label).unwrap();
			let centroid = c.centroid(label).unwrap().to_dense();
			for j in 0..4 {
				let mean = members.iter().map(|&p| embeddings[p].get(j)).sum::<f32>() / members.len() as f32;
				assert!((centroid[j] - mean).abs() < 1e-6);
			}
		}
	}

	#[test]
	fn every_document_gets_one_label() {
		let c = Clusterer::cluster(&topics(), 3, &ClusterOptions::default()).unwrap();
		assert_eq!(c.labels().len(), 5);
		assert!(c.labels().iter().all(|&l| l < 3));
		assert_eq!(c.sizes().iter().sum::<usize>(), 5);
	}

	#[test]
	fn rejects_bad_cluster_counts() {
		let opts = ClusterOptions::default();
		assert_eq!(Clusterer::cluster(&topics(), 0, &opts).unwrap_err().kind(), ErrorKind::Configuration);
		assert_eq!(Clusterer::cluster(&topics(), 6, &opts).unwrap_err().kind(), ErrorKind::Configuration);
		let single = Clusterer::cluster(&topics(), 1, &opts).unwrap();
		assert_eq!(single.sizes(), vec![5]);
	}

	#[test]
	fn empty_or_unknown_clusters_are_invalid_requests() {
		let c = Clusterer::from_labels(&topics(), vec![0, 0, 0, 2, 2], 3).unwrap();
		assert_eq!(c.centroid(1).unwrap_err().kind(), ErrorKind::InvalidRequest);
		assert_eq!(c.centroid(3).unwrap_err().kind(), ErrorKind::InvalidRequest);
		assert!(c.centroid(2).is_ok());
	}

	#[test]
	fn relabels_largest_first() {
		assert_eq!(relabel_by_size(&[5, 7, 7, 5, 7, 9]), vec![1, 0, 0, 1, 0, 2]);
	}
}
