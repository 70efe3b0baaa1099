//! Text repair: a second, best-effort backend pass that resolves display
//! text for redirect-originated suggestions.

use std::time::Duration;

use tracing::warn;
use typeahead_domain::choose_best_alternate;

use super::{SuggestItem, Suggestion};
use crate::SuggestService;

impl SuggestService {
	/// Issues one batched alternate-title fetch for every suggestion still
	/// lacking text, then drops whatever remains text-less. The fetch is
	/// best-effort: failures are logged and swallowed, never surfaced.
	pub(super) async fn repair_missing_text(
		&self,
		term: &str,
		mut suggestions: Vec<Suggestion>,
		timeout: Duration,
	) -> Vec<SuggestItem> {
		let missing: Vec<String> = suggestions
			.iter()
			.filter(|suggestion| suggestion.text.is_none())
			.map(|suggestion| suggestion.entity_id.clone())
			.collect();

		if !missing.is_empty() {
			match self
				.collaborators
				.backend
				.fetch_alternate_titles(&self.cfg.backend, &missing, timeout)
				.await
			{
				Ok(titles) => {
					for suggestion in
						suggestions.iter_mut().filter(|suggestion| suggestion.text.is_none())
					{
						let Some(candidates) = titles.get(&suggestion.entity_id) else {
							continue;
						};

						// Matched against the original term, not the variant
						// that produced the hit: the user typed the original.
						suggestion.text = choose_best_alternate(term, candidates);
					}
				},
				Err(err) => {
					warn!(
						query = %term,
						entity_ids = ?missing,
						error = %err,
						"Unable to fetch alternate titles; dropping text-less suggestions."
					);
				},
			}
		}

		suggestions
			.into_iter()
			.filter_map(|suggestion| {
				let text = suggestion.text?;

				Some(SuggestItem { entity_id: suggestion.entity_id, score: suggestion.score, text })
			})
			.collect()
	}
}
