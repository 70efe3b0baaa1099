//! Reduction of the multi-profile backend response into one ranked list.
//!
//! The backend has no cross-field deduplication of its own, so the plan
//! over-fetches and this pass dedupes by entity, keeping the highest
//! discounted score per entity, then sorts and truncates.

use std::collections::HashMap;

use tracing::debug;
use typeahead_backend::SuggestGroup;
use typeahead_domain::{SuggestionKind, decode_payload};

use super::{Suggestion, plan::ActiveProfile};

pub(super) struct MergeOutcome {
	pub suggestions: Vec<Suggestion>,
	/// Deduplicated hit count before the caller limit was applied.
	pub total: usize,
}

pub(super) fn merge_response(
	profiles: &[ActiveProfile],
	groups: HashMap<String, Vec<SuggestGroup>>,
	limit: i64,
) -> MergeOutcome {
	let mut suggestions: Vec<Suggestion> = Vec::new();
	let mut by_entity: HashMap<String, usize> = HashMap::new();
	let mut skipped = 0_usize;

	// Traversal follows plan order, not response-map order, so equal-score
	// tie-breaks deterministically favor primary profiles over variants.
	for profile in profiles {
		let Some(profile_groups) = groups.get(&profile.name) else {
			continue;
		};

		for group in profile_groups {
			for option in &group.options {
				let Some(decoded) = decode_payload(&option.text) else {
					skipped += 1;

					continue;
				};
				let score = profile.discount * option.score;
				// Only title suggestions carry display text at this stage;
				// redirect hits are resolved by the repair pass.
				let text = match decoded.kind {
					SuggestionKind::Title => decoded.text,
					SuggestionKind::Redirect => None,
				};

				match by_entity.get(&decoded.entity_id) {
					Some(&index) => {
						// Strictly greater replaces; an equal score keeps the
						// earlier-seen suggestion and its attributes.
						if score > suggestions[index].score {
							suggestions[index].score = score;
							suggestions[index].text = text;
						}
					},
					None => {
						by_entity.insert(decoded.entity_id.clone(), suggestions.len());
						suggestions.push(Suggestion {
							entity_id: decoded.entity_id,
							score,
							text,
						});
					},
				}
			}
		}
	}

	if skipped > 0 {
		debug!(skipped, "Skipped undecodable suggestion payloads.");
	}

	// Stable sort keeps first-seen order on equal scores.
	suggestions
		.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

	let total = suggestions.len();

	if limit >= 0 {
		suggestions.truncate(limit as usize);
	}

	MergeOutcome { suggestions, total }
}
