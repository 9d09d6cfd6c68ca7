use std::collections::HashMap;

use tracing::warn;

use mncodes_storage::queries;

use crate::{Candidate, CodeSearchService, search::AmendmentInfo};

impl CodeSearchService {
	/// Attach the resolved jurisdiction's local amendments to each matching
	/// candidate. Candidates without amendments keep their empty list. The
	/// caller guarantees the jurisdiction is resolved and the request did not
	/// opt out.
	pub(crate) async fn enrich_with_amendments(
		&self,
		jurisdiction_id: &str,
		results: &mut [Candidate],
	) {
		if results.is_empty() {
			return;
		}

		let section_ids: Vec<String> = results.iter().map(|c| c.hit.id.clone()).collect();
		let rows =
			match queries::amendments_for_sections(&self.db, jurisdiction_id, &section_ids).await
			{
				Ok(rows) => rows,
				Err(err) => {
					warn!(%err, "Amendment lookup failed; leaving results unenriched.");

					return;
				},
			};
		let mut by_section: HashMap<String, Vec<AmendmentInfo>> = HashMap::new();

		for row in rows {
			by_section.entry(row.code_section_id).or_default().push(AmendmentInfo {
				jurisdiction: row.jurisdiction_name,
				amendment_type: row.amendment_type,
				text: row.amendment_text,
			});
		}

		for candidate in results {
			if let Some(amendments) = by_section.remove(&candidate.hit.id) {
				candidate.local_amendments = amendments;
			}
		}
	}
}
