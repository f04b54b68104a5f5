//! JSON-backed preference directory

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::recommend::{Directory, InMemoryDirectory, Preferences};
use crate::storage::dataset::RawId;

#[derive(Debug, Deserialize)]
struct Account {
	#[serde(default, alias = "userInterestOrgsId")]
	liked: Vec<RawId>,
	#[serde(default)]
	disliked: Vec<RawId>,
}

/// Users loaded from `{"<user>": {"liked": [...], "disliked": [...]}}`
#[derive(Debug, Clone)]
pub struct JsonDirectory {
	users: InMemoryDirectory,
}

impl JsonDirectory {
	pub fn load(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path)
			.map_err(|e| Error::Directory(format!("failed to read {}: {}", path.display(), e)))?;
		Self::parse(&text)
	}

	pub fn parse(json: &str) -> Result<Self> {
		let accounts: HashMap<String, Account> =
			serde_json::from_str(json).map_err(|e| Error::Directory(format!("invalid user file: {}", e)))?;

		let users: HashMap<String, Preferences> = accounts
			.into_iter()
			.map(|(user, account)| {
				let preferences = Preferences::new(
					account.liked.into_iter().map(RawId::into_string),
					account.disliked.into_iter().map(RawId::into_string),
				);
				(user, preferences)
			})
			.collect();

		Ok(Self { users: users.into() })
	}

	pub fn len(&self) -> usize {
		self.users.len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.is_empty()
	}
}

impl Directory for JsonDirectory {
	fn preferences(&self, user: &str) -> Result<Preferences> {
		self.users.preferences(user)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn parses_both_account_shapes() {
		let dir = JsonDirectory::parse(
			r#"{
				"alice": {"liked": ["a", "b"], "disliked": ["c"]},
				"bob": {"userInterestOrgsId": [3, 4]},
				"carol": {}
			}"#,
		)
		.unwrap();
		assert_eq!(dir.len(), 3);
		assert_eq!(dir.disliked_ids("alice").unwrap().len(), 1);
		assert!(dir.liked_ids("bob").unwrap().contains("4"));
		assert!(dir.preferences("carol").unwrap().is_empty());
	}

	#[test]
	fn unknown_user_and_bad_json_fail() {
		let dir = JsonDirectory::parse("{}").unwrap();
		assert_eq!(dir.preferences("x").unwrap_err().kind(), ErrorKind::Directory);
		assert_eq!(JsonDirectory::parse("[1, 2]").unwrap_err().kind(), ErrorKind::Directory);
	}
}
