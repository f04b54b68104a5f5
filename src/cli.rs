use clap::builder::styling::{AnsiColor, Style, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_CLUSTER_COUNT, DEFAULT_COUNT, DEFAULT_KEYWORDS_PER_CLUSTER, DEFAULT_RBF_GAMMA, DEFAULT_SEED};
use crate::core::{Affinity, AnalyzerKind, DocFrequency};

/// Similarity graph used for clustering
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum AffinityKind {
	/// Gaussian kernel over Euclidean distance
	#[default]
	Rbf,
	/// Cosine similarity
	Cosine,
}

impl AffinityKind {
	pub fn with_gamma(self, gamma: f64) -> Affinity {
		match self {
			Self::Rbf => Affinity::Rbf { gamma },
			Self::Cosine => Affinity::Cosine,
		}
	}
}

fn parse_ngram(s: &str) -> Result<(usize, usize), String> {
	let (min, max) = match s.split_once('-') {
		Some((a, b)) => (a.trim(), b.trim()),
		None => (s.trim(), s.trim()),
	};
	let min: usize = min.parse().map_err(|_| format!("'{}' is not a valid n-gram size", min))?;
	let max: usize = max.parse().map_err(|_| format!("'{}' is not a valid n-gram size", max))?;
	if min < 1 || min > max {
		Err(format!("n-gram range must satisfy 1 <= min <= max, got {}-{}", min, max))
	} else {
		Ok((min, max))
	}
}

fn parse_count(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val < 1 {
		Err("must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.usage(Style::new().bold().fg_color(Some(AnsiColor::Blue.into())))
		.literal(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.placeholder(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
		.valid(Style::new().fg_color(Some(AnsiColor::Blue.into())))
		.invalid(Style::new().fg_color(Some(AnsiColor::Red.into())))
}

#[derive(Parser, Debug)]
#[command(
	name = "orgrec",
	author,
	version,
	about = "Organization recommendations from TF-IDF topics",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {fit}        {fit_args}        {fit_desc}
  {bin} {recommend}  {rec_args}        {rec_desc}
  {bin} {keywords}   {kw_args}     {kw_desc}
  {bin} {similar}    {sim_args}         {sim_desc}
  {bin} {clusters}   {cl_args}           {cl_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "orgrec".bright_blue(),
		fit = "fit".yellow(),
		fit_args = "-c orgs.json -k 8",
		fit_desc = "Fit a model with 8 clusters".dimmed(),
		recommend = "recommend".yellow(),
		rec_args = "-l 12,40 -d 7",
		rec_desc = "Recommend from likes and dislikes".dimmed(),
		keywords = "keywords".yellow(),
		kw_args = "robotics music",
		kw_desc = "Cold start from interests".dimmed(),
		similar = "similar".yellow(),
		sim_args = "\"board games\"",
		sim_desc = "Closest to free text".dimmed(),
		clusters = "clusters".yellow(),
		cl_args = "--export -",
		cl_desc = "Dump clusters as JSON".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Model file (default: $ORGREC_MODEL or ./orgrec.msgpack)
	#[arg(short = 'm', long = "model", global = true, value_name = "PATH")]
	pub model: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Fit a model from a JSON corpus of organizations
	Fit {
		/// JSON array of {id, name, purpose} records
		#[arg(short = 'c', long = "corpus", value_name = "PATH")]
		corpus: PathBuf,

		/// Where to write the model (default: the model path)
		#[arg(short = 'o', long = "output", value_name = "PATH")]
		output: Option<PathBuf>,

		/// Number of topic clusters
		#[arg(short = 'k', long = "clusters", default_value_t = DEFAULT_CLUSTER_COUNT, value_parser = parse_count)]
		clusters: usize,

		/// Top terms recorded per cluster
		#[arg(long = "keywords", default_value_t = DEFAULT_KEYWORDS_PER_CLUSTER, value_parser = parse_count)]
		keywords: usize,

		/// N-gram span, e.g. 1-2
		#[arg(long = "ngram", default_value = "1-1", value_parser = parse_ngram)]
		ngram: (usize, usize),

		/// N-gram unit: word, char, or char_wb
		#[arg(long = "analyzer", default_value = "word")]
		analyzer: AnalyzerKind,

		/// Stop words: none, english, or a file with one word per line
		#[arg(long = "stop-words", default_value = "none")]
		stop_words: String,

		/// Minimum document frequency (count, or proportion like 0.01)
		#[arg(long = "min-df", default_value = "1")]
		min_df: DocFrequency,

		/// Maximum document frequency (count, or proportion like 0.9)
		#[arg(long = "max-df", default_value = "1.0")]
		max_df: DocFrequency,

		/// Keep only the N most frequent terms
		#[arg(long = "max-features", value_parser = parse_count)]
		max_features: Option<usize>,

		/// Similarity graph for clustering
		#[arg(long = "affinity", default_value = "rbf")]
		affinity: AffinityKind,

		/// RBF kernel width
		#[arg(long = "gamma", default_value_t = DEFAULT_RBF_GAMMA)]
		gamma: f64,

		/// Random seed for clustering
		#[arg(long = "seed", default_value_t = DEFAULT_SEED)]
		seed: u64,
	},

	/// Recommend from a user's likes and dislikes
	Recommend {
		/// User id to look up in --users
		#[arg(short = 'u', long = "user", requires = "users")]
		user: Option<String>,

		/// JSON file of {user: {liked, disliked}}
		#[arg(long = "users", value_name = "PATH")]
		users: Option<PathBuf>,

		/// Liked organization ids (comma-separated or repeated)
		#[arg(short = 'l', long = "like", value_delimiter = ',', conflicts_with = "user")]
		like: Vec<String>,

		/// Disliked organization ids (comma-separated or repeated)
		#[arg(short = 'd', long = "dislike", value_delimiter = ',', conflicts_with = "user")]
		dislike: Vec<String>,

		/// Number of recommendations
		#[arg(short = 'n', long = "count", default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
		count: usize,

		/// Check that this corpus still matches the model
		#[arg(short = 'c', long = "corpus", value_name = "PATH")]
		corpus: Option<PathBuf>,
	},

	/// Recommend for a new user from interest keywords
	Keywords {
		/// Interest keywords
		#[arg(value_name = "KEYWORD", required = true)]
		keywords: Vec<String>,

		/// Number of recommendations
		#[arg(short = 'n', long = "count", default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
		count: usize,
	},

	/// Find organizations similar to a description
	Similar {
		/// Free-text description
		#[arg(value_name = "TEXT")]
		text: String,

		/// Number of results
		#[arg(short = 'n', long = "count", default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
		count: usize,
	},

	/// Show topic clusters and their keywords
	Clusters {
		/// Members shown per cluster
		#[arg(short = 'p', long = "preview", default_value_t = 5)]
		preview: usize,

		/// Export clusters as JSON ('-' for stdout)
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
