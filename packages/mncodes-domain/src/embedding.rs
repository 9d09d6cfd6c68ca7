//! Placeholder embedding generator.
//!
//! Produces a deterministic, L2-normalized pseudo-vector from a text hash.
//! This is NOT a semantic representation: cosine similarity between two of
//! these vectors reflects hash proximity, not meaning. Callers may depend on
//! the vector's shape (fixed dimension, unit norm) but never on its
//! correctness. Swap this module for a real embedding model before relying
//! on semantic retrieval.

/// Deterministic pseudo-embedding of `text` with `dim` components.
pub fn embed(text: &str, dim: usize) -> Vec<f32> {
	let hash = text_hash(text) as f64;
	let mut components = Vec::with_capacity(dim);

	for i in 0..dim {
		components.push((hash * (i + 1) as f64).sin() * 0.5);
	}

	let magnitude = components.iter().map(|v| v * v).sum::<f64>().sqrt();

	// A zero hash (e.g. the empty string) yields the zero vector. Keep it
	// finite instead of dividing through.
	if magnitude <= f64::EPSILON {
		return vec![0.0; dim];
	}

	components.into_iter().map(|v| (v / magnitude) as f32).collect()
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	debug_assert_eq!(a.len(), b.len());

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b.iter()) {
		dot += f64::from(*x) * f64::from(*y);
		norm_a += f64::from(*x) * f64::from(*x);
		norm_b += f64::from(*y) * f64::from(*y);
	}

	if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
		return 0.0;
	}

	(dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

// 32-bit string hash over UTF-16 code units, wrapping like the datastore's
// ingestion side. Changing this changes every stored vector.
fn text_hash(text: &str) -> i32 {
	let mut hash = 0_i32;

	for unit in text.encode_utf16() {
		hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit));
	}

	hash
}
