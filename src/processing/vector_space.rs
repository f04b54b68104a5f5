//! TF-IDF vector space over a fixed corpus

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{Corpus, Document, FitOptions, SparseVector};
use crate::error::{Error, Result};
use crate::processing::tokenize::Analyzer;
use crate::ui;

/// A corpus position paired with its similarity to a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
	pub position: usize,
	pub similarity: f32,
}

/// Fitted vocabulary, idf weights and the embedded corpus.
///
/// Immutable after [`VectorSpace::fit`]; every read is safe to share across
/// threads. Retrieval is an exact scan, O(documents × vocabulary) per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSpace {
	options: FitOptions,
	corpus: Corpus,
	vocabulary: HashMap<String, usize>,
	terms: Vec<String>,
	idf: Vec<f32>,
	/// Terms seen during fit but dropped by df bounds or the feature cap
	pruned: BTreeSet<String>,
	embeddings: Vec<SparseVector>,
	centroid: SparseVector,
	#[serde(skip)]
	analyzer: OnceLock<Analyzer>,
}

impl VectorSpace {
	/// Builds the vocabulary from `corpus`, embeds every document and
	/// precomputes the all-corpus centroid.
	pub fn fit(corpus: Corpus, options: FitOptions) -> Result<Self> {
		options.validate()?;
		if corpus.is_empty() {
			return Err(Error::config("cannot fit a vector space on an empty corpus"));
		}

		let analyzer = Analyzer::new(&options);
		let n_docs = corpus.len();

		let doc_counts: Vec<HashMap<String, u32>> = corpus
			.documents()
			.par_iter()
			.map(|doc| {
				let mut counts = HashMap::new();
				for term in analyzer.analyze(doc.text()) {
					*counts.entry(term).or_insert(0) += 1;
				}
				counts
			})
			.collect();

		let mut doc_freq: HashMap<&str, usize> = HashMap::new();
		let mut term_freq: HashMap<&str, u64> = HashMap::new();
		for counts in &doc_counts {
			for (term, &count) in counts {
				*doc_freq.entry(term.as_str()).or_insert(0) += 1;
				*term_freq.entry(term.as_str()).or_insert(0) += count as u64;
			}
		}

		if doc_freq.is_empty() {
			return Err(Error::config(
				"empty vocabulary: documents contain only stop words or short tokens",
			));
		}

		let min_count = options.min_df.lower_bound(n_docs);
		let max_count = options.max_df.upper_bound(n_docs);
		if max_count < min_count {
			return Err(Error::config(format!(
				"max_df ({}) allows fewer documents than min_df ({})",
				options.max_df, options.min_df
			)));
		}

		let mut pruned = BTreeSet::new();
		let mut retained: Vec<&str> = Vec::with_capacity(doc_freq.len());
		for (&term, &df) in &doc_freq {
			if df < min_count || df > max_count {
				pruned.insert(term.to_string());
			} else {
				retained.push(term);
			}
		}

		if let Some(limit) = options.max_features {
			retained.sort_unstable_by(|a, b| term_freq[b].cmp(&term_freq[a]).then_with(|| a.cmp(b)));
			for term in retained.drain(limit.min(retained.len())..) {
				pruned.insert(term.to_string());
			}
		}

		if retained.is_empty() {
			return Err(Error::config(
				"no terms remain after applying document-frequency bounds",
			));
		}

		retained.sort_unstable();
		let terms: Vec<String> = retained.iter().map(|t| t.to_string()).collect();
		let vocabulary: HashMap<String, usize> =
			terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

		let n = n_docs as f64;
		let idf: Vec<f32> = terms
			.iter()
			.map(|t| (((1.0 + n) / (1.0 + doc_freq[t.as_str()] as f64)).ln() + 1.0) as f32)
			.collect();

		let dim = terms.len();
		let embeddings: Vec<SparseVector> = doc_counts
			.par_iter()
			.map(|counts| weigh(counts.iter().map(|(t, &c)| (t.as_str(), c)), &vocabulary, &idf, dim))
			.collect();

		let empty_rows = embeddings.iter().filter(|e| e.is_zero()).count();
		if empty_rows == n_docs {
			return Err(Error::config("every document reduces to zero retained terms"));
		}

		let centroid = SparseVector::mean(&embeddings)
			.ok_or_else(|| Error::config("cannot fit a vector space on an empty corpus"))?;

		ui::debug(&format!(
			"Fitted {} documents: {} terms kept, {} pruned, {} empty rows",
			n_docs,
			dim,
			pruned.len(),
			empty_rows
		));

		let analyzer_cell = OnceLock::new();
		let _ = analyzer_cell.set(analyzer);

		Ok(Self {
			options,
			corpus,
			vocabulary,
			terms,
			idf,
			pruned,
			embeddings,
			centroid,
			analyzer: analyzer_cell,
		})
	}

	/// Embeds texts with the fitted vocabulary. Unknown terms are ignored.
	pub fn transform<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<SparseVector> {
		texts.par_iter().map(|t| self.embed(t.as_ref())).collect()
	}

	pub fn embed(&self, text: &str) -> SparseVector {
		let mut counts: HashMap<String, u32> = HashMap::new();
		for term in self.analyzer().analyze(text) {
			if self.vocabulary.contains_key(&term) {
				*counts.entry(term).or_insert(0) += 1;
			}
		}
		weigh(counts.iter().map(|(t, &c)| (t.as_str(), c)), &self.vocabulary, &self.idf, self.dim())
	}

	/// The `k` most similar corpus documents, most similar first.
	pub fn nearest(&self, query: &SparseVector, k: usize) -> Result<Vec<&Document>> {
		Ok(self
			.nearest_scored(query, k)?
			.into_iter()
			.filter_map(|n| self.corpus.get(n.position))
			.collect())
	}

	/// Like [`nearest`](Self::nearest) but keeps positions and similarities.
	/// Equal similarities keep corpus order.
	pub fn nearest_scored(&self, query: &SparseVector, k: usize) -> Result<Vec<Neighbor>> {
		let n_docs = self.corpus.len();
		if k < 1 || k > n_docs {
			return Err(Error::invalid(format!(
				"k must be within 1..={}, got {}",
				n_docs, k
			)));
		}
		if query.dim() != self.dim() {
			return Err(Error::invalid(format!(
				"query has dimension {}, vector space has {}",
				query.dim(),
				self.dim()
			)));
		}
		if !query.is_finite() {
			return Err(Error::invalid("query vector contains non-finite values"));
		}

		let query_norm = query.norm();
		if query_norm == 0.0 {
			return Err(Error::invalid("cosine similarity is undefined for a zero query vector"));
		}

		let mut scored: Vec<Neighbor> = self
			.embeddings
			.par_iter()
			.enumerate()
			.map(|(position, doc)| {
				let doc_norm = doc.norm();
				let similarity = if doc_norm > 0.0 {
					query.dot(doc) / (query_norm * doc_norm)
				} else {
					0.0
				};
				Neighbor { position, similarity }
			})
			.collect();

		scored.sort_by(|a, b| {
			b.similarity
				.total_cmp(&a.similarity)
				.then_with(|| a.position.cmp(&b.position))
		});
		scored.truncate(k);
		Ok(scored)
	}

	/// Mean of all corpus embeddings; the profile used when no preference resolves
	pub fn centroid(&self) -> &SparseVector {
		&self.centroid
	}

	pub fn embeddings(&self) -> &[SparseVector] {
		&self.embeddings
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn options(&self) -> &FitOptions {
		&self.options
	}

	/// Vocabulary size
	pub fn dim(&self) -> usize {
		self.terms.len()
	}

	pub fn vocabulary(&self) -> &HashMap<String, usize> {
		&self.vocabulary
	}

	/// Terms by column index
	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn term(&self, index: usize) -> Option<&str> {
		self.terms.get(index).map(String::as_str)
	}

	/// Effective stop words: terms dropped by df bounds or `max_features`
	pub fn stop_words(&self) -> &BTreeSet<String> {
		&self.pruned
	}

	pub fn info(&self) -> String {
		let o = &self.options;
		format!(
			"analyzer: {}, ngram_range: {:?}, stop_words: {}, min_df: {}, max_df: {}, max_features: {}, vocabulary: {}",
			o.analyzer,
			o.ngram_range,
			match &o.stop_words {
				crate::core::StopWords::None => "none".to_string(),
				crate::core::StopWords::English => "english".to_string(),
				crate::core::StopWords::Custom(words) => format!("custom ({})", words.len()),
			},
			o.min_df,
			o.max_df,
			o.max_features.map_or("none".to_string(), |m| m.to_string()),
			self.dim()
		)
	}

	fn analyzer(&self) -> &Analyzer {
		self.analyzer.get_or_init(|| Analyzer::new(&self.options))
	}
}

/// Raw count × idf, L2 normalized. Terms outside the vocabulary are skipped.
fn weigh<'a>(
	counts: impl Iterator<Item = (&'a str, u32)>,
	vocabulary: &HashMap<String, usize>,
	idf: &[f32],
	dim: usize,
) -> SparseVector {
	let pairs = counts
		.filter_map(|(term, count)| vocabulary.get(term).map(|&i| (i, count as f32 * idf[i])))
		.collect();
	SparseVector::from_pairs(dim, pairs).normalized()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{AnalyzerKind, DocFrequency, StopWords};
	use crate::error::ErrorKind;

	fn clubs() -> Corpus {
		Corpus::new(vec![
			Document::new("A", "", "robotics club builds robots"),
			Document::new("B", "", "chess club plays chess"),
			Document::new("C", "", "robotics and chess hybrid club"),
		])
		.unwrap()
	}

	fn fitted() -> VectorSpace {
		VectorSpace::fit(clubs(), FitOptions::default()).unwrap()
	}

	#[test]
	fn vocabulary_is_sorted_and_complete() {
		let vs = fitted();
		assert_eq!(
			vs.terms(),
			&["and", "builds", "chess", "club", "hybrid", "plays", "robotics", "robots"]
		);
		assert_eq!(vs.vocabulary()["club"], 3);
	}

	#[test]
	fn rows_are_unit_length() {
		let vs = fitted();
		for row in vs.embeddings() {
			assert!((row.norm() - 1.0).abs() < 1e-5);
		}
	}

	#[test]
	fn ubiquitous_terms_weigh_less() {
		let vs = fitted();
		let a = &vs.embeddings()[0];
		// "club" appears everywhere, "builds" only in A
		assert!(a.get(vs.vocabulary()["club"]) < a.get(vs.vocabulary()["builds"]));
	}

	#[test]
	fn self_is_nearest() {
		let vs = fitted();
		for (i, doc) in vs.corpus().documents().iter().enumerate() {
			let q = vs.embed(doc.text());
			let hit = vs.nearest_scored(&q, 1).unwrap()[0];
			assert_eq!(hit.position, i);
			assert!(hit.similarity > 0.0);
		}
	}

	#[test]
	fn nearest_is_sorted_and_distinct() {
		let vs = fitted();
		let q = vs.embed("robotics chess");
		for k in 1..=3 {
			let hits = vs.nearest_scored(&q, k).unwrap();
			assert_eq!(hits.len(), k);
			assert!(hits.windows(2).all(|w| w[0].similarity >= w[1].similarity));
			let distinct: BTreeSet<usize> = hits.iter().map(|h| h.position).collect();
			assert_eq!(distinct.len(), k);
		}
	}

	#[test]
	fn ties_keep_corpus_order() {
		let corpus = Corpus::new(vec![
			Document::new("x", "", "alpha beta"),
			Document::new("y", "", "alpha beta"),
			Document::new("z", "", "gamma"),
		])
		.unwrap();
		let vs = VectorSpace::fit(corpus, FitOptions::default()).unwrap();
		let hits = vs.nearest(&vs.embed("alpha beta"), 2).unwrap();
		assert_eq!(hits[0].id, "x");
		assert_eq!(hits[1].id, "y");
	}

	#[test]
	fn invalid_queries_are_rejected() {
		let vs = fitted();
		let q = vs.embed("robotics");
		assert_eq!(vs.nearest(&q, 0).unwrap_err().kind(), ErrorKind::InvalidRequest);
		assert_eq!(vs.nearest(&q, 4).unwrap_err().kind(), ErrorKind::InvalidRequest);
		let zero = vs.embed("nothing matches here");
		assert!(zero.is_zero());
		assert_eq!(vs.nearest(&zero, 1).unwrap_err().kind(), ErrorKind::InvalidRequest);
	}

	#[test]
	fn transform_is_deterministic() {
		let vs = fitted();
		let first = vs.transform(&["chess hybrid"]);
		let second = vs.transform(&["chess hybrid"]);
		assert_eq!(first, second);
		assert_eq!(first[0], vs.embed("chess hybrid"));
	}

	#[test]
	fn df_bounds_prune_terms() {
		let options = FitOptions::default().with_max_df(DocFrequency::Proportion(0.9));
		let vs = VectorSpace::fit(clubs(), options).unwrap();
		assert!(!vs.vocabulary().contains_key("club"));
		assert!(vs.stop_words().contains("club"));

		let options = FitOptions::default().with_min_df(DocFrequency::Count(2));
		let vs = VectorSpace::fit(clubs(), options).unwrap();
		assert_eq!(vs.terms(), &["chess", "club", "robotics"]);
	}

	#[test]
	fn max_features_keeps_most_frequent() {
		let options = FitOptions::default().with_max_features(2);
		let vs = VectorSpace::fit(clubs(), options).unwrap();
		// chess: 3 occurrences, club: 3
		assert_eq!(vs.terms(), &["chess", "club"]);
	}

	#[test]
	fn fit_fails_when_nothing_survives() {
		let err = VectorSpace::fit(Corpus::default(), FitOptions::default()).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);

		let options = FitOptions::default().with_min_df(DocFrequency::Count(4));
		let err = VectorSpace::fit(clubs(), options).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);

		let stop_only = Corpus::new(vec![Document::new("s", "", "the and of")]).unwrap();
		let options = FitOptions::default().with_stop_words(StopWords::English);
		assert!(VectorSpace::fit(stop_only, options).is_err());
	}

	#[test]
	fn centroid_is_mean_of_rows() {
		let vs = fitted();
		let dense: Vec<Vec<f32>> = vs.embeddings().iter().map(|e| e.to_dense()).collect();
		let centroid = vs.centroid().to_dense();
		for j in 0..vs.dim() {
			let mean = dense.iter().map(|r| r[j]).sum::<f32>() / 3.0;
			assert!((centroid[j] - mean).abs() < 1e-6);
		}
	}

	#[test]
	fn char_wb_vocabulary_matches_word_fragments() {
		let options = FitOptions::default().with_analyzer(AnalyzerKind::CharWb).with_ngram_range(3, 3);
		let vs = VectorSpace::fit(clubs(), options).unwrap();
		assert!(vs.vocabulary().contains_key(" ch"));
		assert!(vs.info().starts_with("analyzer: char_wb"));
		// shares fragments with "chess"
		assert!(!vs.embed("chessboard").is_zero());
	}
}
