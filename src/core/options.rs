//! Vocabulary fitting parameters

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Document-frequency bound, either absolute or relative to corpus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DocFrequency {
	Count(usize),
	Proportion(f64),
}

impl DocFrequency {
	fn validate(&self, name: &str) -> Result<()> {
		match *self {
			Self::Proportion(p) if !(0.0..=1.0).contains(&p) => Err(Error::config(format!(
				"{} proportion must be within [0, 1], got {}",
				name, p
			))),
			_ => Ok(()),
		}
	}

	/// Smallest document count a term may have
	pub fn lower_bound(&self, n_docs: usize) -> usize {
		match *self {
			Self::Count(c) => c,
			Self::Proportion(p) => (p * n_docs as f64).ceil() as usize,
		}
	}

	/// Largest document count a term may have
	pub fn upper_bound(&self, n_docs: usize) -> usize {
		match *self {
			Self::Count(c) => c,
			Self::Proportion(p) => (p * n_docs as f64).floor() as usize,
		}
	}
}

impl std::fmt::Display for DocFrequency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Count(c) => write!(f, "{}", c),
			Self::Proportion(p) => write!(f, "{:.2}", p),
		}
	}
}

impl std::str::FromStr for DocFrequency {
	type Err = String;

	/// Integers are counts, anything with a decimal point is a proportion.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let s = s.trim();
		if s.contains('.') {
			let p: f64 = s.parse().map_err(|_| format!("'{}' is not a valid proportion", s))?;
			if !(0.0..=1.0).contains(&p) {
				return Err(format!("proportion must be between 0.0 and 1.0, got {}", p));
			}
			Ok(Self::Proportion(p))
		} else {
			s.parse().map(Self::Count).map_err(|_| format!("'{}' is not a valid count", s))
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum StopWords {
	#[default]
	None,
	English,
	Custom(Vec<String>),
}

/// Unit the n-gram span counts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
	#[default]
	Word,
	/// Character n-grams over the whole normalized text
	Char,
	/// Character n-grams inside word boundaries, words padded with a space
	CharWb,
}

impl std::fmt::Display for AnalyzerKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Word => "word",
			Self::Char => "char",
			Self::CharWb => "char_wb",
		})
	}
}

impl std::str::FromStr for AnalyzerKind {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"word" => Ok(Self::Word),
			"char" => Ok(Self::Char),
			"char_wb" | "char-wb" => Ok(Self::CharWb),
			other => Err(format!("unknown analyzer '{}', expected word, char or char_wb", other)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
	/// Inclusive `(min, max)` n-gram span in tokens
	pub ngram_range: (usize, usize),
	pub stop_words: StopWords,
	pub min_df: DocFrequency,
	pub max_df: DocFrequency,
	/// Keep only the most frequent terms across the corpus
	pub max_features: Option<usize>,
	pub lowercase: bool,
	/// Stop words only apply to the word analyzer
	#[serde(default)]
	pub analyzer: AnalyzerKind,
}

impl Default for FitOptions {
	fn default() -> Self {
		Self {
			ngram_range: (1, 1),
			stop_words: StopWords::None,
			min_df: DocFrequency::Count(1),
			max_df: DocFrequency::Proportion(1.0),
			max_features: None,
			lowercase: true,
			analyzer: AnalyzerKind::Word,
		}
	}
}

impl FitOptions {
	pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
		self.ngram_range = (min, max);
		self
	}

	pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
		self.stop_words = stop_words;
		self
	}

	pub fn with_min_df(mut self, min_df: DocFrequency) -> Self {
		self.min_df = min_df;
		self
	}

	pub fn with_max_df(mut self, max_df: DocFrequency) -> Self {
		self.max_df = max_df;
		self
	}

	pub fn with_max_features(mut self, max_features: usize) -> Self {
		self.max_features = Some(max_features);
		self
	}

	pub fn with_analyzer(mut self, analyzer: AnalyzerKind) -> Self {
		self.analyzer = analyzer;
		self
	}

	pub fn validate(&self) -> Result<()> {
		let (min_n, max_n) = self.ngram_range;
		if min_n < 1 || min_n > max_n {
			return Err(Error::config(format!(
				"invalid n-gram range ({}, {})",
				min_n, max_n
			)));
		}
		self.min_df.validate("min_df")?;
		self.max_df.validate("max_df")?;
		if self.max_features == Some(0) {
			return Err(Error::config("max_features must be at least 1"));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_counts_and_proportions() {
		assert_eq!("2".parse::<DocFrequency>().unwrap(), DocFrequency::Count(2));
		assert_eq!("0.5".parse::<DocFrequency>().unwrap(), DocFrequency::Proportion(0.5));
		assert!("1.5".parse::<DocFrequency>().is_err());
		assert!("abc".parse::<DocFrequency>().is_err());
	}

	#[test]
	fn bounds_round_toward_the_inside() {
		let p = DocFrequency::Proportion(0.5);
		assert_eq!(p.lower_bound(5), 3);
		assert_eq!(p.upper_bound(5), 2);
		assert_eq!(DocFrequency::Count(4).upper_bound(100), 4);
	}

	#[test]
	fn parses_analyzer_kinds() {
		assert_eq!("char_wb".parse::<AnalyzerKind>().unwrap(), AnalyzerKind::CharWb);
		assert_eq!("Word".parse::<AnalyzerKind>().unwrap(), AnalyzerKind::Word);
		assert!("sentence".parse::<AnalyzerKind>().is_err());
		assert_eq!(AnalyzerKind::Char.to_string(), "char");
	}

	#[test]
	fn rejects_bad_ngram_range() {
		assert!(FitOptions::default().with_ngram_range(0, 1).validate().is_err());
		assert!(FitOptions::default().with_ngram_range(2, 1).validate().is_err());
		assert!(FitOptions::default().with_ngram_range(1, 2).validate().is_ok());
	}
}
