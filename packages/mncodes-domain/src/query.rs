use serde::{Deserialize, Serialize};

/// Words too generic to count as extracted entities.
pub const STOP_WORDS: [&str; 6] = ["what", "where", "when", "requirements", "need", "does"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	RequirementLookup,
	Definition,
	Comparison,
	PermitCheck,
	General,
}
impl Intent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RequirementLookup => "requirement_lookup",
			Self::Definition => "definition",
			Self::Comparison => "comparison",
			Self::PermitCheck => "permit_check",
			Self::General => "general",
		}
	}
}

/// Whitespace tokens usable for substring matching. Tokens of one or two
/// characters are dropped; an empty return is the documented no-match edge
/// case, not an error.
pub fn search_terms(query: &str) -> Vec<String> {
	query.split_whitespace().filter(|t| t.chars().count() > 2).map(str::to_string).collect()
}

/// Keyword extraction used when the language-model parse is unavailable.
pub fn fallback_entities(query: &str) -> Vec<String> {
	query
		.to_lowercase()
		.split_whitespace()
		.filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
		.map(str::to_string)
		.collect()
}

/// Ordinal relevance score by result position. The first result scores 1.0
/// and each subsequent rank drops by 0.05; large limits can go negative.
/// This is a documented ordering key, not a calibrated relevance measure.
pub fn lexical_score(index: usize) -> f32 {
	1.0 - 0.05 * index as f32
}
