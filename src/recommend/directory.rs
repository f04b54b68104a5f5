//! User preference lookup

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};

/// Liked and disliked identifiers of a single user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
	pub liked: BTreeSet<String>,
	pub disliked: BTreeSet<String>,
}

impl Preferences {
	pub fn new<I, J>(liked: I, disliked: J) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
		J: IntoIterator,
		J::Item: Into<String>,
	{
		Self {
			liked: liked.into_iter().map(Into::into).collect(),
			disliked: disliked.into_iter().map(Into::into).collect(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.liked.is_empty() && self.disliked.is_empty()
	}
}

/// Source of per-user preference signals. Both sets may be empty.
pub trait Directory {
	fn preferences(&self, user: &str) -> Result<Preferences>;

	fn liked_ids(&self, user: &str) -> Result<BTreeSet<String>> {
		Ok(self.preferences(user)?.liked)
	}

	fn disliked_ids(&self, user: &str) -> Result<BTreeSet<String>> {
		Ok(self.preferences(user)?.disliked)
	}
}

/// Directory backed by a map, for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
	users: HashMap<String, Preferences>,
}

impl InMemoryDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, user: impl Into<String>, preferences: Preferences) {
		self.users.insert(user.into(), preferences);
	}

	pub fn with_user(mut self, user: impl Into<String>, preferences: Preferences) -> Self {
		self.insert(user, preferences);
		self
	}

	pub fn len(&self) -> usize {
		self.users.len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.is_empty()
	}
}

impl From<HashMap<String, Preferences>> for InMemoryDirectory {
	fn from(users: HashMap<String, Preferences>) -> Self {
		Self { users }
	}
}

impl Directory for InMemoryDirectory {
	fn preferences(&self, user: &str) -> Result<Preferences> {
		self.users
			.get(user)
			.cloned()
			.ok_or_else(|| Error::Directory(format!("unknown user '{}'", user)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn lookups_split_preferences() {
		let dir = InMemoryDirectory::new().with_user("u1", Preferences::new(["a", "b"], ["c"]));
		assert_eq!(dir.liked_ids("u1").unwrap().len(), 2);
		assert!(dir.disliked_ids("u1").unwrap().contains("c"));
	}

	#[test]
	fn unknown_user_is_a_directory_error() {
		let dir = InMemoryDirectory::new();
		assert_eq!(dir.preferences("ghost").unwrap_err().kind(), ErrorKind::Directory);
	}

	#[test]
	fn empty_preferences_are_valid() {
		let none: [&str; 0] = [];
		let dir = InMemoryDirectory::new().with_user("new", Preferences::new(none, none));
		assert!(dir.preferences("new").unwrap().is_empty());
	}
}
