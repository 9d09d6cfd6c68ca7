use tracing::warn;

use mncodes_domain::query;
use mncodes_storage::queries;

use crate::{Candidate, CodeSearchService, search::SearchFilters};

impl CodeSearchService {
	/// Substring retrieval over section title, full text, and summary.
	///
	/// Only the first surviving token is matched. The tokenizer computes all
	/// of them, but widening to multi-token AND/OR matching would change
	/// observable result sets, so the single-token behavior is kept as the
	/// documented contract.
	pub(crate) async fn lexical_search(
		&self,
		query: &str,
		filters: Option<&SearchFilters>,
		limit: i64,
	) -> Vec<Candidate> {
		let terms = query::search_terms(query);
		let Some(first_term) = terms.first() else {
			// Nothing longer than two characters to match on.
			return Vec::new();
		};
		let code_types = filters.and_then(|f| f.code_types.as_deref());
		let categories = filters.and_then(|f| f.categories.as_deref());

		match queries::search_sections(&self.db, first_term, code_types, categories, limit).await
		{
			Ok(hits) => hits
				.into_iter()
				.enumerate()
				.map(|(index, hit)| Candidate::new(hit, query::lexical_score(index)))
				.collect(),
			Err(err) => {
				warn!(%err, "Lexical search failed; contributing no candidates.");

				Vec::new()
			},
		}
	}
}
