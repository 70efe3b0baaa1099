//! Best-alternate-title selection for suggestions whose original hit carried
//! no display text.

/// Picks the candidate closest to what the user typed.
///
/// The completion index matches prefixes, so each candidate is compared
/// through its prefix of the query's char length rather than in full; a
/// redirect that starts like the query should beat a shorter edit distance
/// against some unrelated long title. Smallest Levenshtein distance wins,
/// the earliest candidate wins ties, and an exact prefix match returns
/// immediately.
pub fn choose_best_alternate(query: &str, candidates: &[String]) -> Option<String> {
	let query = query.trim().to_lowercase();
	let query_len = query.chars().count();
	let mut best: Option<(&String, usize)> = None;

	for candidate in candidates {
		let prefix: String = candidate.to_lowercase().chars().take(query_len).collect();
		let distance = strsim::levenshtein(&query, &prefix);

		if distance == 0 {
			return Some(candidate.clone());
		}
		if best.map(|(_, best_distance)| distance < best_distance).unwrap_or(true) {
			best = Some((candidate, distance));
		}
	}

	best.map(|(candidate, _)| candidate.clone())
}
