//! Rank-merge of candidate lists. This is a merge/dedup step, not a ranking
//! algorithm: scores from different strategies are opaque ordering keys that
//! are only normalized here by the descending sort.

use std::collections::HashSet;

use crate::Candidate;

/// Concatenate the lists, stable-sort by descending relevance score (ties
/// keep input order), drop duplicate section ids keeping the first
/// occurrence, and cap at `limit`.
pub(crate) fn merge_candidates(lists: Vec<Vec<Candidate>>, limit: usize) -> Vec<Candidate> {
	let mut all: Vec<Candidate> = lists.into_iter().flatten().collect();

	all.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

	let mut seen = HashSet::new();
	let mut merged = Vec::new();

	for candidate in all {
		if seen.insert(candidate.hit.id.clone()) {
			merged.push(candidate);

			if merged.len() >= limit {
				break;
			}
		}
	}

	merged
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_fixtures::candidate;

	fn ids(merged: &[Candidate]) -> Vec<&str> {
		merged.iter().map(|c| c.hit.id.as_str()).collect()
	}

	#[test]
	fn orders_by_descending_score() {
		let merged = merge_candidates(
			vec![vec![candidate("a", 0.4), candidate("b", 0.9)], vec![candidate("c", 0.6)]],
			10,
		);

		assert_eq!(ids(&merged), vec!["b", "c", "a"]);
	}

	#[test]
	fn first_occurrence_wins_on_duplicates() {
		let mut dup = candidate("a", 0.8);
		dup.hit.section_title = "Later duplicate".to_string();

		let merged =
			merge_candidates(vec![vec![candidate("a", 0.8), candidate("b", 0.7)], vec![dup]], 10);

		assert_eq!(ids(&merged), vec!["a", "b"]);
		assert_eq!(merged[0].hit.section_title, "Section a");
	}

	#[test]
	fn ties_keep_input_order() {
		let merged = merge_candidates(
			vec![vec![candidate("first", 0.5), candidate("second", 0.5)]],
			10,
		);

		assert_eq!(ids(&merged), vec!["first", "second"]);
	}

	#[test]
	fn caps_at_limit() {
		let list: Vec<_> = (0..8).map(|i| candidate(&format!("s{i}"), 1.0 - 0.05 * i as f32)).collect();
		let merged = merge_candidates(vec![list], 3);

		assert_eq!(merged.len(), 3);
	}

	#[test]
	fn idempotent_on_sorted_duplicate_free_input() {
		let list: Vec<_> =
			(0..5).map(|i| candidate(&format!("s{i}"), 1.0 - 0.05 * i as f32)).collect();
		let once = merge_candidates(vec![list.clone(), list.clone()], 4);
		let twice = merge_candidates(vec![once.clone(), once.clone()], 4);

		assert_eq!(ids(&once), vec!["s0", "s1", "s2", "s3"]);
		assert_eq!(ids(&twice), ids(&once));
	}

	#[test]
	fn merging_nothing_is_empty() {
		assert!(merge_candidates(vec![], 10).is_empty());
		assert!(merge_candidates(vec![vec![]], 10).is_empty());
	}
}
