//! Preference profiles turned into ranked recommendations

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::{Dataset, SparseVector};
use crate::error::{Error, Result};
use crate::processing::VectorSpace;
use crate::recommend::{Directory, KeywordIndex};
use crate::ui;

/// A recommended document. `similarity` is absent for random cold-start picks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
	pub id: String,
	pub similarity: Option<f32>,
}

/// Read-only view over a fitted vector space and its keyword index.
#[derive(Clone, Copy)]
pub struct Recommender<'a> {
	space: &'a VectorSpace,
	keywords: &'a KeywordIndex,
	dataset: &'a dyn Dataset,
}

impl<'a> Recommender<'a> {
	/// Texts and random ids come from the corpus the space was fit on.
	pub fn new(space: &'a VectorSpace, keywords: &'a KeywordIndex) -> Self {
		Self { space, keywords, dataset: space.corpus() }
	}

	/// Resolve ids through another dataset; it must share corpus ids.
	pub fn with_dataset(mut self, dataset: &'a dyn Dataset) -> Self {
		self.dataset = dataset;
		self
	}

	/// Ranks the corpus against `mean(liked) - mean(disliked)`, dropping every
	/// liked or disliked id. With no history at all, picks `count` random ids.
	pub fn recommend_from_history(
		&self,
		liked: &[String],
		disliked: &[String],
		count: usize,
	) -> Result<Vec<Recommendation>> {
		check_count(count)?;

		if liked.is_empty() && disliked.is_empty() {
			ui::debug("No history, sampling random documents");
			return Ok(self
				.dataset
				.random_ids(count)
				.into_iter()
				.map(|id| Recommendation { id, similarity: None })
				.collect());
		}

		let profile = self.history_profile(liked, disliked)?;

		let excluded: BTreeSet<&str> = liked.iter().chain(disliked).map(String::as_str).collect();
		let fetch = count.saturating_add(excluded.len()).min(self.space.corpus().len());
		ui::debug(&format!(
			"Fetching {} candidates to fill {} after {} exclusions",
			fetch,
			count,
			excluded.len()
		));

		let mut results = self.rank(&profile, fetch)?;
		results.retain(|r| !excluded.contains(r.id.as_str()));
		results.truncate(count);
		Ok(results)
	}

	/// Looks the user up in `directory`, then behaves like
	/// [`recommend_from_history`](Self::recommend_from_history).
	pub fn recommend_for_user(
		&self,
		directory: &dyn Directory,
		user: &str,
		count: usize,
	) -> Result<Vec<Recommendation>> {
		check_count(count)?;
		let preferences = directory.preferences(user)?;
		ui::debug(&format!(
			"User {}: {} liked, {} disliked",
			user,
			preferences.liked.len(),
			preferences.disliked.len()
		));

		let liked: Vec<String> = preferences.liked.into_iter().collect();
		let disliked: Vec<String> = preferences.disliked.into_iter().collect();
		self.recommend_from_history(&liked, &disliked, count)
	}

	/// Ranks the corpus against the centroid of the clusters the keywords
	/// select. Requests beyond the corpus size return the whole corpus.
	pub fn recommend_from_keywords<S: AsRef<str>>(&self, keywords: &[S], count: usize) -> Result<Vec<Recommendation>> {
		check_count(count)?;
		let profile = self.keywords.resolve(keywords);
		self.rank(&profile, count.min(self.space.corpus().len()))
	}

	/// Documents most similar to arbitrary text
	pub fn similar_to_text(&self, text: &str, count: usize) -> Result<Vec<Recommendation>> {
		check_count(count)?;
		let query = self.space.embed(text);
		if query.is_zero() {
			return Err(Error::invalid("text shares no terms with the vocabulary"));
		}
		self.rank(&query, count.min(self.space.corpus().len()))
	}

	fn history_profile(&self, liked: &[String], disliked: &[String]) -> Result<SparseVector> {
		let liked_mean = self.mean_embedding(liked)?;
		let disliked_mean = self.mean_embedding(disliked)?;

		let profile = match (liked_mean, disliked_mean) {
			(Some(l), Some(d)) => l.sub(&d),
			(Some(l), None) => l,
			(None, Some(d)) => SparseVector::zeros(d.dim()).sub(&d),
			(None, None) => SparseVector::zeros(self.space.dim()),
		};

		if profile.is_zero() {
			ui::debug("History cancels out, using corpus centroid");
			return Ok(self.space.centroid().clone());
		}
		Ok(profile)
	}

	fn mean_embedding(&self, ids: &[String]) -> Result<Option<SparseVector>> {
		if ids.is_empty() {
			return Ok(None);
		}
		let texts = self.dataset.resolve_text(ids)?;
		let vectors = self.space.transform(&texts);
		Ok(SparseVector::mean(&vectors))
	}

	fn rank(&self, query: &SparseVector, k: usize) -> Result<Vec<Recommendation>> {
		let corpus = self.space.corpus();
		Ok(self
			.space
			.nearest_scored(query, k)?
			.into_iter()
			.filter_map(|n| {
				corpus.get(n.position).map(|doc| Recommendation {
					id: doc.id.clone(),
					similarity: Some(n.similarity),
				})
			})
			.collect())
	}
}

fn check_count(count: usize) -> Result<()> {
	if count < 1 {
		return Err(Error::invalid("count must be at least 1"));
	}
	Ok(())
}
