//! Error types shared by the engine and its storage adapters

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification for callers that map failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Configuration,
	InvalidRequest,
	Directory,
	Storage,
}

#[derive(Debug, Error)]
pub enum Error {
	/// Invalid fit-time parameters or an unusable corpus.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Malformed per-call arguments.
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// A preference directory or dataset collaborator failed.
	#[error("directory error: {0}")]
	Directory(String),

	/// A persisted model could not be used.
	#[error("storage error: {0}")]
	Storage(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	pub fn config(msg: impl Into<String>) -> Self {
		Self::Configuration(msg.into())
	}

	pub fn invalid(msg: impl Into<String>) -> Self {
		Self::InvalidRequest(msg.into())
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Configuration(_) => ErrorKind::Configuration,
			Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
			Self::Directory(_) => ErrorKind::Directory,
			Self::Storage(_) | Self::Io(_) => ErrorKind::Storage,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_are_distinguishable() {
		assert_eq!(Error::config("x").kind(), ErrorKind::Configuration);
		assert_eq!(Error::invalid("x").kind(), ErrorKind::InvalidRequest);
		let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
		assert_eq!(io.kind(), ErrorKind::Storage);
	}

	#[test]
	fn messages_carry_context() {
		let err = Error::invalid("k must be at least 1");
		assert_eq!(err.to_string(), "invalid request: k must be at least 1");
	}
}
