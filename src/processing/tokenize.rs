//! Text analysis: tokens, stop words and n-grams

use std::collections::HashSet;

use crate::core::{AnalyzerKind, FitOptions, StopWords};

/// Built-in English stop words
pub const ENGLISH_STOP_WORDS: &[&str] = &[
	"a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
	"alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
	"amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
	"are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
	"been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
	"beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
	"could", "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due", "during",
	"each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
	"ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
	"fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found", "four",
	"from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt", "have", "he",
	"hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him",
	"himself", "his", "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest",
	"into", "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
	"made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most",
	"mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
	"nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
	"nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others",
	"otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
	"put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
	"she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
	"someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system", "take",
	"ten", "than", "that", "the", "their", "them", "themselves", "then", "thence", "there",
	"thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
	"third", "this", "those", "though", "three", "through", "throughout", "thru", "thus", "to",
	"together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until",
	"up", "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
	"whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
	"wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose",
	"why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
	"yourselves",
];

/// Turns raw text into the terms that make up the vocabulary.
#[derive(Debug, Clone)]
pub struct Analyzer {
	kind: AnalyzerKind,
	lowercase: bool,
	stop_words: HashSet<String>,
	ngram_range: (usize, usize),
}

impl Analyzer {
	pub fn new(options: &FitOptions) -> Self {
		let stop_words = match &options.stop_words {
			StopWords::None => HashSet::new(),
			StopWords::English => ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
			StopWords::Custom(words) => words.iter().map(|w| w.trim().to_lowercase()).collect(),
		};

		Self {
			kind: options.analyzer,
			lowercase: options.lowercase,
			stop_words,
			ngram_range: options.ngram_range,
		}
	}

	/// Word tokens: runs of alphanumerics or underscores, two characters or longer.
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
			.filter(|t| t.chars().count() >= 2)
			.map(|t| if self.lowercase { t.to_lowercase() } else { t.to_string() })
			.filter(|t| !self.stop_words.contains(t.to_lowercase().as_str()))
			.collect()
	}

	/// All n-grams in the configured span, in text order per n.
	pub fn analyze(&self, text: &str) -> Vec<String> {
		match self.kind {
			AnalyzerKind::Word => self.word_ngrams(text),
			AnalyzerKind::Char => self.char_ngrams(text),
			AnalyzerKind::CharWb => self.char_wb_ngrams(text),
		}
	}

	fn word_ngrams(&self, text: &str) -> Vec<String> {
		let tokens = self.tokenize(text);
		let (min_n, max_n) = self.ngram_range;

		if min_n == 1 && max_n == 1 {
			return tokens;
		}

		let mut terms = Vec::new();
		for n in min_n..=max_n {
			for window in tokens.windows(n) {
				terms.push(window.join(" "));
			}
		}
		terms
	}

	/// Case folded, whitespace runs collapsed to one space.
	fn normalize(&self, text: &str) -> Vec<char> {
		let folded = if self.lowercase { text.to_lowercase() } else { text.to_string() };
		let mut chars = Vec::with_capacity(folded.len());
		let mut in_space = false;
		for c in folded.chars() {
			if c.is_whitespace() {
				if !in_space {
					chars.push(' ');
				}
				in_space = true;
			} else {
				chars.push(c);
				in_space = false;
			}
		}
		chars
	}

	fn char_ngrams(&self, text: &str) -> Vec<String> {
		let chars = self.normalize(text);
		let (min_n, max_n) = self.ngram_range;

		let mut terms = Vec::new();
		for n in min_n..=max_n.min(chars.len()) {
			for window in chars.windows(n) {
				terms.push(window.iter().collect());
			}
		}
		terms
	}

	/// Words are padded with one space each side. A padded word shorter than
	/// n yields itself once and ends the span for that word.
	fn char_wb_ngrams(&self, text: &str) -> Vec<String> {
		let folded = if self.lowercase { text.to_lowercase() } else { text.to_string() };
		let (min_n, max_n) = self.ngram_range;

		let mut terms = Vec::new();
		for word in folded.split_whitespace() {
			let padded: Vec<char> = std::iter::once(' ')
				.chain(word.chars())
				.chain(std::iter::once(' '))
				.collect();
			for n in min_n..=max_n {
				if padded.len() <= n {
					terms.push(padded.iter().collect());
					break;
				}
				for window in padded.windows(n) {
					terms.push(window.iter().collect());
				}
			}
		}
		terms
	}
}
