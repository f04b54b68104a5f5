//! Corpus fingerprinting

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use super::Corpus;

/// Hash of the ordered document identifiers. Two corpora with the same
/// fingerprint agree on every embedding row position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
	pub fn compute(corpus: &Corpus) -> Self {
		let mut hasher = Xxh3::new();
		for id in corpus.ids() {
			hasher.update(id.as_bytes());
			// separator so ["ab", "c"] and ["a", "bc"] differ
			hasher.update(&[0x1f]);
		}
		Self(format!("{:016x}", hasher.digest()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// First eight characters, or the whole value when it is shorter.
	pub fn short(&self) -> &str {
		self.0.get(..8).unwrap_or(&self.0)
	}
}

impl std::fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
