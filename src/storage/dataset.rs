//! JSON organization records

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::{Corpus, Document};
use crate::error::{Error, Result};
use crate::ui;

/// Identifiers arrive as strings or plain numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl RawId {
	pub(crate) fn into_string(self) -> String {
		match self {
			Self::Text(s) => s,
			Self::Number(n) => n.to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct Record {
	#[serde(alias = "orgId")]
	id: RawId,
	#[serde(alias = "orgName")]
	name: String,
	#[serde(default, alias = "orgPurpose", alias = "desc", alias = "description")]
	purpose: Option<String>,
}

/// Reads a JSON array of organizations, keeping file order.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
	let text = fs::read_to_string(path)
		.map_err(|e| Error::Directory(format!("failed to read {}: {}", path.display(), e)))?;
	let corpus = parse_corpus(&text)?;
	ui::debug(&format!("Loaded {} documents from {}", corpus.len(), path.display()));
	Ok(corpus)
}

/// Same as [`load_corpus`] for an in-memory JSON string
pub fn parse_corpus(json: &str) -> Result<Corpus> {
	let records: Vec<Record> =
		serde_json::from_str(json).map_err(|e| Error::Directory(format!("invalid corpus file: {}", e)))?;
	let documents = records
		.into_iter()
		.map(|r| Document::new(r.id.into_string(), &r.name, r.purpose.as_deref().unwrap_or("")))
		.collect();
	Corpus::new(documents)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn accepts_field_aliases() {
		let corpus = parse_corpus(
			r#"[
				{"id": "a", "name": "Robotics", "purpose": "builds robots"},
				{"orgId": 7, "orgName": "Chess", "orgPurpose": null},
				{"id": "c", "name": "Hiking", "desc": "mountain trips"}
			]"#,
		)
		.unwrap();
		assert_eq!(corpus.len(), 3);
		assert_eq!(corpus.position("7"), Some(1));
		assert_eq!(corpus.get(1).unwrap().text(), "Chess");
		assert_eq!(corpus.get(2).unwrap().text(), "Hiking mountain trips");
	}

	#[test]
	fn duplicate_ids_fail() {
		let err = parse_corpus(r#"[{"id": "a", "name": "x"}, {"id": "a", "name": "y"}]"#).unwrap_err();
		assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
		let err = parse_corpus(r#"{"id": "a"}"#).unwrap_err();
		assert_eq!(err.kind(), crate::error::ErrorKind::Directory);
	}

	#[test]
	fn loads_from_disk() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"[{{"id": "x", "name": "Film", "description": "movie nights"}}]"#).unwrap();
		let corpus = load_corpus(file.path()).unwrap();
		assert_eq!(corpus.get(0).unwrap().purpose, "movie nights");

		let missing = load_corpus(Path::new("/definitely/not/here.json")).unwrap_err();
		assert_eq!(missing.kind(), crate::error::ErrorKind::Directory);
	}
}
