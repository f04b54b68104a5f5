//! Keywords command - cold-start suggestions from interests

use std::path::Path;

use anyhow::Result;

use crate::commands::{open_engine, print_results};
use crate::ui;

pub fn run(model: &Path, keywords: &[String], count: usize) -> Result<()> {
	let engine = open_engine(model)?;

	ui::info(&format!("Keywords: {}", keywords.join(", ")));
	let matched = engine.keywords().matching_clusters(keywords);
	if matched.is_empty() {
		ui::warn("No keyword matches a cluster, ranking against the whole corpus");
	} else {
		ui::debug(&format!("Matched clusters: {:?}", matched));
	}

	let results = engine.recommender().recommend_from_keywords(keywords, count)?;
	print_results(&engine, &results);
	Ok(())
}
