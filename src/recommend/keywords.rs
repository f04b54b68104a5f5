//! Keyword to cluster mapping for users without history

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::SparseVector;
use crate::error::{Error, Result};
use crate::processing::{Clusterer, VectorSpace};
use crate::ui;

/// Top terms per cluster plus the inverted term → clusters lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordIndex {
	cluster_terms: Vec<Vec<String>>,
	term_clusters: HashMap<String, Vec<usize>>,
	centroids: Vec<Option<SparseVector>>,
	fallback: SparseVector,
	/// Case policy of the fitted vocabulary
	lowercase: bool,
}

impl KeywordIndex {
	/// Ranks every cluster's vocabulary by centroid weight and keeps the
	/// first `top_n`. Equal weights keep vocabulary order.
	pub fn build(clusterer: &Clusterer, space: &VectorSpace, top_n: usize) -> Result<Self> {
		if top_n < 1 {
			return Err(Error::config("keywords per cluster must be at least 1"));
		}

		let mut cluster_terms = Vec::with_capacity(clusterer.cluster_count());
		let mut term_clusters: HashMap<String, Vec<usize>> = HashMap::new();
		let mut centroids = Vec::with_capacity(clusterer.cluster_count());

		for label in 0..clusterer.cluster_count() {
			let Ok(centroid) = clusterer.centroid(label) else {
				ui::debug(&format!("Cluster {} is empty, no keywords recorded", label));
				cluster_terms.push(Vec::new());
				centroids.push(None);
				continue;
			};

			let mut weighted: Vec<(usize, f32)> = centroid.iter().filter(|&(_, w)| w > 0.0).collect();
			weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

			let terms: Vec<String> = weighted
				.iter()
				.take(top_n)
				.filter_map(|&(i, _)| space.term(i).map(str::to_string))
				.collect();

			for term in &terms {
				term_clusters.entry(term.clone()).or_default().push(label);
			}
			cluster_terms.push(terms);
			centroids.push(Some(centroid.clone()));
		}

		ui::debug(&format!(
			"Keyword index: {} clusters, {} distinct terms",
			cluster_terms.len(),
			term_clusters.len()
		));

		Ok(Self {
			cluster_terms,
			term_clusters,
			centroids,
			fallback: space.centroid().clone(),
			lowercase: space.options().lowercase,
		})
	}

	/// Clusters whose top terms contain any keyword, ascending and deduplicated.
	pub fn matching_clusters<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<usize> {
		let matched: BTreeSet<usize> = keywords
			.iter()
			.map(|k| self.normalize(k.as_ref()))
			.filter_map(|k| self.term_clusters.get(&k))
			.flatten()
			.copied()
			.collect();
		matched.into_iter().collect()
	}

	/// Mean centroid of the matching clusters, or the all-corpus centroid when
	/// nothing matches.
	pub fn resolve<S: AsRef<str>>(&self, keywords: &[S]) -> SparseVector {
		let matched = self.matching_clusters(keywords);
		let profile = SparseVector::mean(
			matched
				.iter()
				.filter_map(|&label| self.centroids.get(label).and_then(Option::as_ref)),
		);

		match profile {
			Some(profile) => {
				ui::debug(&format!("Keywords matched clusters {:?}", matched));
				profile
			}
			None => {
				ui::debug("No keyword matched a cluster, using corpus centroid");
				self.fallback.clone()
			}
		}
	}

	/// Ranked top terms of one cluster
	pub fn terms_for(&self, label: usize) -> Option<&[String]> {
		self.cluster_terms.get(label).map(Vec::as_slice)
	}

	pub fn clusters_for(&self, term: &str) -> &[usize] {
		self.term_clusters
			.get(&self.normalize(term))
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	pub fn fallback(&self) -> &SparseVector {
		&self.fallback
	}

	/// Keywords are folded the same way the vocabulary was.
	fn normalize(&self, keyword: &str) -> String {
		let keyword = keyword.trim();
		if self.lowercase {
			keyword.to_lowercase()
		} else {
			keyword.to_string()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{Corpus, Document, FitOptions};

	fn space() -> VectorSpace {
		let corpus = Corpus::new(vec![
			Document::new("r1", "", "robotics robots engineering"),
			Document::new("r2", "", "robotics engineering workshop"),
			Document::new("m1", "", "music choir singing"),
			Document::new("m2", "", "music band singing"),
		])
		.unwrap();
		VectorSpace::fit(corpus, FitOptions::default()).unwrap()
	}

	fn index(space: &VectorSpace, top_n: usize) -> KeywordIndex {
		let clusterer = Clusterer::from_labels(space.embeddings(), vec![0, 0, 1, 1], 2).unwrap();
		KeywordIndex::build(&clusterer, space, top_n).unwrap()
	}

	#[test]
	fn records_top_terms_per_cluster() {
		let space = space();
		let index = index(&space, 2);
		let robots = index.terms_for(0).unwrap();
		assert_eq!(robots.len(), 2);
		assert!(robots.contains(&"robotics".to_string()));
		assert!(robots.contains(&"engineering".to_string()));
		assert_eq!(index.clusters_for("Music"), &[1]);
		assert!(index.clusters_for("robots").is_empty());
	}

	#[test]
	fn resolve_averages_matched_centroids() {
		let space = space();
		let clusterer = Clusterer::from_labels(space.embeddings(), vec![0, 0, 1, 1], 2).unwrap();
		let index = KeywordIndex::build(&clusterer, &space, 3).unwrap();

		assert_eq!(index.resolve(&["robotics"]), *clusterer.centroid(0).unwrap());

		let both = index.resolve(&["ROBOTICS ", "music", "singing"]).to_dense();
		let a = clusterer.centroid(0).unwrap().to_dense();
		let b = clusterer.centroid(1).unwrap().to_dense();
		for j in 0..space.dim() {
			assert!((both[j] - (a[j] + b[j]) / 2.0).abs() < 1e-6);
		}
	}

	#[test]
	fn unmatched_keywords_fall_back_to_corpus_centroid() {
		let space = space();
		let index = index(&space, 2);
		assert_eq!(index.resolve(&["astronomy"]), *space.centroid());
		let none: [&str; 0] = [];
		assert_eq!(index.resolve(&none), *space.centroid());
	}

	#[test]
	fn case_sensitive_vocabulary_matches_exact_case() {
		let corpus = Corpus::new(vec![
			Document::new("r1", "Robotics", "robots"),
			Document::new("r2", "Robotics", "robots"),
			Document::new("m1", "Music", "singing"),
			Document::new("m2", "Music", "singing"),
		])
		.unwrap();
		let options = FitOptions { lowercase: false, ..FitOptions::default() };
		let space = VectorSpace::fit(corpus, options).unwrap();
		let clusterer = Clusterer::from_labels(space.embeddings(), vec![0, 0, 1, 1], 2).unwrap();
		let index = KeywordIndex::build(&clusterer, &space, 2).unwrap();

		assert!(index.terms_for(0).unwrap().contains(&"Robotics".to_string()));
		assert_eq!(index.matching_clusters(&["Robotics"]), vec![0]);
		assert_eq!(index.clusters_for(" Music "), &[1]);
		assert!(index.clusters_for("robotics").is_empty());
		assert_eq!(index.resolve(&["Robotics"]), *clusterer.centroid(0).unwrap());
	}

	#[test]
	fn empty_clusters_have_no_terms() {
		let space = space();
		let clusterer = Clusterer::from_labels(space.embeddings(), vec![0, 0, 0, 0], 2).unwrap();
		let index = KeywordIndex::build(&clusterer, &space, 5).unwrap();
		assert!(index.terms_for(1).unwrap().is_empty());
		assert!(index.terms_for(2).is_none());
		assert!(KeywordIndex::build(&clusterer, &space, 0).is_err());
	}
}
