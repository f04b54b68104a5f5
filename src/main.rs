//! Orgrec - organization recommendations
//!
//! A command-line tool that fits a TF-IDF model over organization
//! descriptions and recommends from likes, dislikes, or keywords.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use orgrec::cli::{Cli, Command};
use orgrec::commands;
use orgrec::config;
use orgrec::core::{ClusterOptions, FitOptions};
use orgrec::recommend::EngineOptions;
use orgrec::ui::{self, Log};

fn main() {
	let cli = Cli::parse();

	Log::set_verbose(cli.verbose);
	if let Some(model) = cli.model.clone() {
		config::set_model_path(model);
	}

	if let Err(e) = run(cli.command) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Fit {
			corpus,
			output,
			clusters,
			keywords,
			ngram,
			analyzer,
			stop_words,
			min_df,
			max_df,
			max_features,
			affinity,
			gamma,
			seed,
		} => {
			let mut fit = FitOptions::default()
				.with_ngram_range(ngram.0, ngram.1)
				.with_analyzer(analyzer)
				.with_stop_words(commands::fit::parse_stop_words(&stop_words)?)
				.with_min_df(min_df)
				.with_max_df(max_df);
			fit.max_features = max_features;

			let cluster = ClusterOptions::default()
				.with_affinity(affinity.with_gamma(gamma))
				.with_seed(seed);

			let options = EngineOptions::default()
				.with_fit(fit)
				.with_cluster(cluster)
				.with_cluster_count(clusters)
				.with_keywords_per_cluster(keywords);

			let output = output.unwrap_or_else(config::model_path);
			commands::fit::run(&corpus, &output, &options)
		}
		Command::Recommend { user, users, like, dislike, count, corpus } => commands::recommend::run(
			&config::model_path(),
			user.as_deref(),
			users.as_deref(),
			&like,
			&dislike,
			count,
			corpus.as_deref(),
		),
		Command::Keywords { keywords, count } => commands::keywords::run(&config::model_path(), &keywords, count),
		Command::Similar { text, count } => commands::similar::run(&config::model_path(), &text, count),
		Command::Clusters { preview, export } => {
			commands::clusters::run(&config::model_path(), preview, export.as_deref())
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::warn(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
