//! Vector-similarity retrieval over stored section embeddings.
//!
//! The orchestrator only invokes this path when `search.semantic_enabled` is
//! set. The embeddings come from the placeholder generator, so similarity
//! reflects hash proximity rather than meaning; nothing here may depend on
//! vector correctness, only on shape (fixed dimension, unit norm).

use std::collections::HashMap;

use tracing::warn;

use mncodes_domain::embedding;
use mncodes_storage::queries;

use crate::{Candidate, CodeSearchService};

impl CodeSearchService {
	pub(crate) async fn semantic_search(&self, query: &str, limit: i64) -> Vec<Candidate> {
		let dim = self.cfg.search.embedding_dim as usize;
		let threshold = self.cfg.search.semantic_threshold;
		let query_vec = embedding::embed(query, dim);
		let stored = match queries::all_section_embeddings(&self.db).await {
			Ok(stored) => stored,
			Err(err) => {
				warn!(%err, "Embedding scan failed; contributing no candidates.");

				return Vec::new();
			},
		};

		let mut scored: Vec<(String, f32)> = stored
			.into_iter()
			.filter(|e| e.embedding_dim as usize == dim)
			.map(|e| {
				let similarity = embedding::cosine_similarity(&query_vec, &e.vec);

				(e.code_section_id, similarity)
			})
			.filter(|(_, similarity)| *similarity >= threshold)
			.collect();

		scored.sort_by(|a, b| b.1.total_cmp(&a.1));
		scored.truncate(limit.max(0) as usize);

		if scored.is_empty() {
			return Vec::new();
		}

		let ids: Vec<String> = scored.iter().map(|(id, _)| id.clone()).collect();
		let hits = match queries::sections_by_ids(&self.db, &ids).await {
			Ok(hits) => hits,
			Err(err) => {
				warn!(%err, "Section fetch for semantic candidates failed.");

				return Vec::new();
			},
		};
		let mut by_id: HashMap<String, _> =
			hits.into_iter().map(|hit| (hit.id.clone(), hit)).collect();

		scored
			.into_iter()
			.filter_map(|(id, similarity)| {
				by_id.remove(&id).map(|hit| Candidate::new(hit, similarity))
			})
			.collect()
	}
}
