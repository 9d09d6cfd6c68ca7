use tracing::warn;

use mncodes_storage::queries;

use crate::{Candidate, CodeSearchService, search::RelatedSection};

const RELATED_LIMIT: i64 = 5;

impl CodeSearchService {
	/// Sibling sections sharing a category with the top results, excluding
	/// the results themselves. The caller passes at most the top three.
	pub(crate) async fn related_sections(&self, top: &[Candidate]) -> Vec<RelatedSection> {
		if top.is_empty() {
			return Vec::new();
		}

		let mut categories: Vec<String> =
			top.iter().filter_map(|c| c.hit.category.clone()).collect();

		categories.sort();
		categories.dedup();

		if categories.is_empty() {
			return Vec::new();
		}

		let exclude_ids: Vec<String> = top.iter().map(|c| c.hit.id.clone()).collect();

		match queries::related_by_categories(&self.db, &categories, &exclude_ids, RELATED_LIMIT)
			.await
		{
			Ok(rows) => rows
				.into_iter()
				.map(|row| RelatedSection {
					id: row.id,
					section: row.section_number,
					title: row.section_title,
					relationship: "related".to_string(),
				})
				.collect(),
			Err(err) => {
				warn!(%err, "Related-section lookup failed; returning none.");

				Vec::new()
			},
		}
	}
}
