//! Recommend command - suggestions from a user's likes and dislikes

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::commands::{open_engine, print_results};
use crate::storage::{self, JsonDirectory};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run(
	model: &Path,
	user: Option<&str>,
	users: Option<&Path>,
	like: &[String],
	dislike: &[String],
	count: usize,
	corpus: Option<&Path>,
) -> Result<()> {
	let start = Instant::now();
	let engine = open_engine(model)?;

	if let Some(corpus_path) = corpus {
		let dataset = storage::load_corpus(corpus_path).context("Failed to load corpus")?;
		storage::verify_dataset(&engine, &dataset)?;
		ui::debug("Corpus matches model");
	}

	let recommender = engine.recommender();
	let results = match (user, users) {
		(Some(user), Some(users)) => {
			let directory = JsonDirectory::load(users).context("Failed to load users")?;
			ui::info(&format!("Recommending for {}", user));
			recommender.recommend_for_user(&directory, user, count)?
		}
		(Some(_), None) => anyhow::bail!("--user needs --users <file>"),
		_ => {
			if like.is_empty() && dislike.is_empty() {
				ui::info("No history given, picking at random");
			} else {
				ui::info(&format!("Recommending from {} likes, {} dislikes", like.len(), dislike.len()));
			}
			recommender.recommend_from_history(like, dislike, count)?
		}
	};

	print_results(&engine, &results);
	ui::success(&format!(
		"{} recommendations in {:.0}ms",
		results.len(),
		start.elapsed().as_millis()
	));
	Ok(())
}
