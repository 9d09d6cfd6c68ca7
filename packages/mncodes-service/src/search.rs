use serde::{Deserialize, Serialize};
use tracing::warn;

use mncodes_domain::query::Intent;
use mncodes_storage::queries;

use crate::{Candidate, CodeSearchService, Error, Result, merge};

pub const ALL_MINNESOTA: &str = "All Minnesota";

/// Sentinel the UI sends for the statewide pseudo-jurisdiction; never looked
/// up against the jurisdiction table.
const ALL_MINNESOTA_SLUG: &str = "all-minnesota";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub jurisdiction: Option<String>,
	pub filters: Option<SearchFilters>,
	pub options: Option<SearchOptions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
	pub code_types: Option<Vec<String>>,
	pub categories: Option<Vec<String>>,
	pub include_amendments: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
	pub include_ai_summary: Option<bool>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub query_interpretation: QueryInterpretation,
	pub results: Vec<SearchResult>,
	pub ai_summary: Option<String>,
	pub related_sections: Vec<RelatedSection>,
	pub total_count: usize,
	pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryInterpretation {
	pub intent: Intent,
	pub entities: Vec<String>,
	pub jurisdiction_resolved: ResolvedJurisdiction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedJurisdiction {
	pub id: Option<String>,
	pub name: String,
	#[serde(rename = "type")]
	pub jurisdiction_type: Option<String>,
	pub county: Option<String>,
}
impl ResolvedJurisdiction {
	pub fn unresolved() -> Self {
		Self {
			id: None,
			name: ALL_MINNESOTA.to_string(),
			jurisdiction_type: None,
			county: None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: String,
	pub source: String,
	pub section: String,
	pub title: String,
	pub text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	pub relevance_score: f32,
	pub local_amendments: Vec<AmendmentInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentInfo {
	pub jurisdiction: String,
	pub amendment_type: String,
	pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedSection {
	pub id: String,
	pub section: String,
	pub title: String,
	pub relationship: String,
}

impl CodeSearchService {
	/// Hybrid search over code sections: parse the query, resolve the
	/// jurisdiction, gather candidates, merge, enrich, summarize. Stateless
	/// per request; every degraded external call falls back rather than
	/// failing the request.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "Query is required".to_string() });
		}

		let limit = req
			.options
			.as_ref()
			.and_then(|options| options.limit)
			.unwrap_or(self.cfg.search.default_limit) as usize;
		let offset =
			req.options.as_ref().and_then(|options| options.offset).unwrap_or(0) as usize;
		let include_ai_summary =
			req.options.as_ref().and_then(|options| options.include_ai_summary).unwrap_or(true);
		let include_amendments = req
			.filters
			.as_ref()
			.and_then(|filters| filters.include_amendments)
			.unwrap_or(true);

		let analysis = self.parse_query(query).await;
		let resolved = self.resolve_jurisdiction(req.jurisdiction.as_deref()).await;

		// 2x headroom so the merge still fills the page after deduplication.
		let candidate_limit = (limit * 2) as i64;
		let mut candidate_lists =
			vec![self.lexical_search(query, req.filters.as_ref(), candidate_limit).await];

		if self.cfg.search.semantic_enabled {
			candidate_lists.push(self.semantic_search(query, candidate_limit).await);
		}

		let mut merged = merge::merge_candidates(candidate_lists, limit);

		if let Some(jurisdiction_id) = resolved.id.as_deref()
			&& include_amendments
		{
			self.enrich_with_amendments(jurisdiction_id, &mut merged).await;
		}

		let ai_summary = if include_ai_summary {
			Some(self.generate_summary(query, &resolved.name, &merged).await)
		} else {
			None
		};
		let related_sections =
			self.related_sections(&merged[..merged.len().min(3)]).await;
		let total_count = merged.len();
		let has_more = merged.len() > offset + limit;
		let results =
			paginate(&merged, offset, limit).iter().map(|c| to_result(c)).collect();

		Ok(SearchResponse {
			query_interpretation: QueryInterpretation {
				intent: analysis.intent,
				entities: analysis.entities,
				jurisdiction_resolved: resolved,
			},
			results,
			ai_summary,
			related_sections,
			total_count,
			has_more,
		})
	}

	/// Fuzzy name-or-id resolution. Absent, sentinel, unmatched, and failed
	/// lookups all degrade to the statewide pseudo-jurisdiction.
	async fn resolve_jurisdiction(&self, jurisdiction: Option<&str>) -> ResolvedJurisdiction {
		let Some(needle) = jurisdiction.map(str::trim).filter(|j| !j.is_empty()) else {
			return ResolvedJurisdiction::unresolved();
		};

		if needle == ALL_MINNESOTA_SLUG {
			return ResolvedJurisdiction::unresolved();
		}

		match queries::find_jurisdiction(&self.db, needle).await {
			Ok(Some(summary)) => ResolvedJurisdiction {
				id: Some(summary.id),
				name: summary.name,
				jurisdiction_type: Some(summary.r#type),
				county: summary.county,
			},
			Ok(None) => ResolvedJurisdiction::unresolved(),
			Err(err) => {
				warn!(%needle, %err, "Jurisdiction lookup failed; treating as unresolved.");

				ResolvedJurisdiction::unresolved()
			},
		}
	}
}

/// The `offset..offset + limit` window of the merged list. An offset past
/// the end yields an empty page, not an error.
pub(crate) fn paginate(merged: &[Candidate], offset: usize, limit: usize) -> &[Candidate] {
	let start = offset.min(merged.len());
	let end = offset.saturating_add(limit).min(merged.len());

	&merged[start..end]
}

fn to_result(candidate: &Candidate) -> SearchResult {
	let hit = &candidate.hit;
	let source = if hit.base_code_abbreviation.is_empty() {
		hit.base_code_name.clone()
	} else {
		hit.base_code_abbreviation.clone()
	};

	SearchResult {
		id: hit.id.clone(),
		source,
		section: hit.section_number.clone(),
		title: hit.section_title.clone(),
		text: hit.full_text.clone(),
		summary: hit.summary.clone(),
		relevance_score: candidate.relevance_score,
		local_amendments: candidate.local_amendments.clone(),
	}
}
