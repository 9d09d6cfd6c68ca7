use tracing::warn;

use crate::{Candidate, CodeSearchService};

/// Body text included per result in the summary prompt, to bound prompt
/// size.
const PROMPT_CLIP_CHARS: usize = 300;
/// Body text included in the deterministic fallback summary.
const FALLBACK_CLIP_CHARS: usize = 200;
/// Results fed to the model; anything past the top five adds little.
const SUMMARY_RESULT_COUNT: usize = 5;

impl CodeSearchService {
	/// Short bullet-point answer for the merged result set. Zero results
	/// short-circuit to a fixed message without touching the model; a failed
	/// model call falls back to a one-line summary of the top result. This
	/// never fails.
	pub(crate) async fn generate_summary(
		&self,
		query: &str,
		jurisdiction: &str,
		results: &[Candidate],
	) -> String {
		if results.is_empty() {
			return no_results_message(query, jurisdiction);
		}

		let prompt = build_summary_prompt(query, jurisdiction, results);

		match self
			.llm
			.complete(&self.cfg.providers.llm, self.cfg.search.summary_max_tokens, &prompt)
			.await
		{
			Ok(text) => text,
			Err(err) => {
				warn!(%err, "Summary call failed; using deterministic fallback.");

				fallback_summary(query, jurisdiction, &results[0])
			},
		}
	}
}

pub(crate) fn no_results_message(query: &str, jurisdiction: &str) -> String {
	format!(
		"No relevant code sections found for \"{query}\" in {jurisdiction}. Try broadening \
		 your search terms or checking a different jurisdiction."
	)
}

fn build_summary_prompt(query: &str, jurisdiction: &str, results: &[Candidate]) -> String {
	let formatted_results = format_results_block(results);

	format!(
		"You are an expert on Minnesota building codes. A user searched for \"{query}\" in \
		 {jurisdiction}.\n\
		 \n\
		 Here are the most relevant code sections found:\n\
		 {formatted_results}\n\
		 \n\
		 Provide a concise, practical summary (3-5 bullet points) that:\n\
		 1. Directly answers what the user is looking for\n\
		 2. Highlights the key requirements with specific numbers (dimensions, heights, etc.)\n\
		 3. Notes any local amendments that might apply\n\
		 4. Uses plain language a contractor or homeowner would understand\n\
		 \n\
		 Format your response as bullet points starting with \u{2022}. Be specific and \
		 actionable."
	)
}

fn format_results_block(results: &[Candidate]) -> String {
	results
		.iter()
		.take(SUMMARY_RESULT_COUNT)
		.enumerate()
		.map(|(i, candidate)| {
			let hit = &candidate.hit;
			let body = hit
				.summary
				.clone()
				.unwrap_or_else(|| clip(&hit.full_text, PROMPT_CLIP_CHARS));
			let amendment_note = if candidate.local_amendments.is_empty() {
				String::new()
			} else {
				let jurisdictions: Vec<&str> = candidate
					.local_amendments
					.iter()
					.map(|a| a.jurisdiction.as_str())
					.collect();

				format!("\n\u{26a0} Local amendments in: {}", jurisdictions.join(", "))
			};

			format!(
				"\n{}. {} {} - {}\n{}...{}\n",
				i + 1,
				hit.base_code_abbreviation,
				hit.section_number,
				hit.section_title,
				body,
				amendment_note,
			)
		})
		.collect::<Vec<_>>()
		.join("\n")
}

pub(crate) fn fallback_summary(query: &str, jurisdiction: &str, top: &Candidate) -> String {
	let hit = &top.hit;
	let body =
		hit.summary.clone().unwrap_or_else(|| clip(&hit.full_text, FALLBACK_CLIP_CHARS));

	format!(
		"For \"{query}\" in {jurisdiction}:\n\u{2022} See {} Section {} - {}\n\u{2022} {}...",
		hit.base_code_abbreviation, hit.section_number, hit.section_title, body,
	)
}

fn clip(text: &str, max_chars: usize) -> String {
	text.chars().take(max_chars).collect()
}
