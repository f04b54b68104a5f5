//! Similar command - organizations closest to free text

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::commands::{open_engine, print_results};
use crate::ui;

pub fn run(model: &Path, text: &str, count: usize) -> Result<()> {
	let engine = open_engine(model)?;
	ui::info(&format!("Searching for: \"{}\"", text.bright_blue()));

	let results = engine.recommender().similar_to_text(text, count)?;
	print_results(&engine, &results);

	if results.first().and_then(|r| r.similarity).is_some_and(|s| s < 0.10) {
		ui::warn("Top result has low similarity (<10%)");
	}
	Ok(())
}
