//! Organization records and the positional corpus they form

use std::collections::HashMap;

use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single organization. `text` is what gets embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	pub id: String,
	pub name: String,
	pub purpose: String,
	text: String,
}

impl Document {
	/// Indexed text is the name followed by the purpose, so records without a
	/// purpose still carry their name.
	pub fn new(id: impl Into<String>, name: &str, purpose: &str) -> Self {
		let name = name.trim().to_string();
		let purpose = purpose.trim().to_string();
		let text = match (name.is_empty(), purpose.is_empty()) {
			(_, true) => name.clone(),
			(true, false) => purpose.clone(),
			(false, false) => format!("{} {}", name, purpose),
		};

		Self { id: id.into(), name, purpose, text }
	}

	pub fn text(&self) -> &str {
		&self.text
	}
}

/// Lookup of document text and random identifiers, as needed by the recommender.
pub trait Dataset {
	/// One text per id, same order.
	fn resolve_text(&self, ids: &[String]) -> Result<Vec<String>>;

	/// Up to `n` distinct identifiers drawn uniformly at random.
	fn random_ids(&self, n: usize) -> Vec<String>;
}

/// Ordered, immutable document collection. Positions are stable and match
/// embedding rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Document>", into = "Vec<Document>")]
pub struct Corpus {
	documents: Vec<Document>,
	positions: HashMap<String, usize>,
}

impl Corpus {
	/// Fails when two documents share an identifier.
	pub fn new(documents: Vec<Document>) -> Result<Self> {
		let mut positions = HashMap::with_capacity(documents.len());
		for (pos, doc) in documents.iter().enumerate() {
			if positions.insert(doc.id.clone(), pos).is_some() {
				return Err(Error::config(format!("duplicate document id '{}'", doc.id)));
			}
		}
		Ok(Self { documents, positions })
	}

	pub fn len(&self) -> usize {
		self.documents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.documents.is_empty()
	}

	pub fn get(&self, position: usize) -> Option<&Document> {
		self.documents.get(position)
	}

	pub fn position(&self, id: &str) -> Option<usize> {
		self.positions.get(id).copied()
	}

	pub fn documents(&self) -> &[Document] {
		&self.documents
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.documents.iter().map(|d| d.id.as_str())
	}

	pub fn texts(&self) -> Vec<&str> {
		self.documents.iter().map(|d| d.text()).collect()
	}
}

impl Dataset for Corpus {
	fn resolve_text(&self, ids: &[String]) -> Result<Vec<String>> {
		ids.iter()
			.map(|id| {
				self.position(id)
					.map(|pos| self.documents[pos].text().to_string())
					.ok_or_else(|| Error::invalid(format!("unknown document id '{}'", id)))
			})
			.collect()
	}

	fn random_ids(&self, n: usize) -> Vec<String> {
		let amount = n.min(self.len());
		index::sample(&mut rand::rng(), self.len(), amount)
			.into_iter()
			.map(|pos| self.documents[pos].id.clone())
			.collect()
	}
}

impl TryFrom<Vec<Document>> for Corpus {
	type Error = Error;

	fn try_from(documents: Vec<Document>) -> Result<Self> {
		Self::new(documents)
	}
}

impl From<Corpus> for Vec<Document> {
	fn from(corpus: Corpus) -> Self {
		corpus.documents
	}
}
