use serde::{Deserialize, Serialize};
use tracing::warn;

use mncodes_domain::query::{self, Intent};

use crate::CodeSearchService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
	pub intent: Intent,
	pub entities: Vec<String>,
	#[serde(default)]
	pub suggested_filters: SuggestedFilters,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestedFilters {
	pub categories: Option<Vec<String>>,
	pub code_types: Option<Vec<String>>,
}

impl CodeSearchService {
	/// Extract intent and entities from the raw query. The language model is
	/// the primary path; any transport or parse failure degrades to keyword
	/// extraction. This never fails.
	pub(crate) async fn parse_query(&self, query: &str) -> QueryAnalysis {
		let prompt = build_parse_prompt(query);

		match self
			.llm
			.complete(&self.cfg.providers.llm, self.cfg.search.parse_max_tokens, &prompt)
			.await
		{
			Ok(text) => match parse_analysis_text(&text) {
				Some(analysis) => analysis,
				None => {
					warn!("Query parse response was not valid JSON; using keyword fallback.");

					fallback_analysis(query)
				},
			},
			Err(err) => {
				warn!(%err, "Query parse call failed; using keyword fallback.");

				fallback_analysis(query)
			},
		}
	}
}

fn build_parse_prompt(query: &str) -> String {
	format!(
		"Analyze this building code search query and extract key information.\n\
		 \n\
		 Query: \"{query}\"\n\
		 \n\
		 Respond in JSON format:\n\
		 {{\n\
		 \x20 \"intent\": \"requirement_lookup\" | \"definition\" | \"comparison\" | \"permit_check\" | \"general\",\n\
		 \x20 \"entities\": [\"list\", \"of\", \"key\", \"terms\"],\n\
		 \x20 \"suggested_filters\": {{\n\
		 \x20   \"categories\": [\"relevant\", \"categories\"],\n\
		 \x20   \"code_types\": [\"IRC\", \"IBC\", etc if mentioned]\n\
		 \x20 }}\n\
		 }}\n\
		 \n\
		 Categories can include: Egress, Guards, Stairs, Fire Safety, Structural, Electrical, \
		 Plumbing, HVAC, Energy, Accessibility, Foundation, Roofing, Exterior\n\
		 \n\
		 Only respond with the JSON, no other text."
	)
}

fn parse_analysis_text(text: &str) -> Option<QueryAnalysis> {
	serde_json::from_str(text.trim()).ok()
}

/// Keyword extraction used whenever the model path is unavailable: always
/// `general` intent, lowercased words longer than three characters minus the
/// stop-word set, no suggested filters.
pub(crate) fn fallback_analysis(query: &str) -> QueryAnalysis {
	QueryAnalysis {
		intent: Intent::General,
		entities: query::fallback_entities(query),
		suggested_filters: SuggestedFilters::default(),
	}
}
