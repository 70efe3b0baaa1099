//! The caller-facing search-as-you-type operation.
//!
//! One invocation composes a batch of per-profile completion requests (plus
//! geo-derived and variant-shadow profiles), dispatches them in a single
//! backend round trip under admission control, reduces the heterogeneous
//! response into a deduplicated ranked list, and repairs missing display
//! text with a second batched lookup.

mod merge;
mod plan;
mod repair;

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{SUGGEST_GATE_KEY, SuggestError, SuggestResult, SuggestService};
use plan::QueryPlan;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
	/// Search term; truncated internally to the configured maximum length.
	pub term: String,
	/// Alternate spellings of the term, searched as lower-priority fallbacks.
	pub variants: Option<Vec<String>>,
	pub geo: Option<GeoContext>,
	/// Non-negative caps the result count; negative means unlimited.
	pub limit: i64,
	/// Requesting identity, forwarded to admission control.
	pub identity: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoContext {
	pub lat: f64,
	pub lon: f64,
}
impl GeoContext {
	fn is_valid(self) -> bool {
		self.lat.is_finite() && self.lon.is_finite()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
	Plain,
	Geo,
}
impl QueryKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Plain => "plain",
			Self::Geo => "geo",
		}
	}
}

/// Merge-internal suggestion; display text may still be missing until the
/// repair pass resolves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
	pub entity_id: String,
	pub score: f64,
	pub text: Option<String>,
}

/// Final, displayable suggestion; text is guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestItem {
	pub entity_id: String,
	pub score: f64,
	pub text: String,
}

/// Ordered (descending score), deduplicated, text-complete result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSet {
	pub kind: QueryKind,
	pub suggestions: Vec<SuggestItem>,
}
impl SuggestionSet {
	fn empty(kind: QueryKind) -> Self {
		Self { kind, suggestions: Vec::new() }
	}
}

impl SuggestService {
	pub async fn suggest(&self, req: SuggestRequest) -> SuggestResult<SuggestionSet> {
		let term = truncate_term(&req.term, self.cfg.suggest.max_input_length);
		let variants = normalize_variants(req.variants.as_deref().unwrap_or(&[]), &term);
		let geo = req.geo.filter(|geo| geo.is_valid());
		let plan = QueryPlan::build(&self.cfg, &term, &variants, geo, req.limit);

		if plan.queries.is_empty() {
			debug!(query = %term, "Every profile rejected the query; returning an empty set.");

			return Ok(SuggestionSet::empty(plan.kind));
		}

		let _permit = self
			.collaborators
			.gate
			.acquire(SUGGEST_GATE_KEY, &req.identity)
			.await
			.map_err(|err| SuggestError::Throttled { message: err.to_string() })?;
		let timeout = Duration::from_millis(self.cfg.suggest.timeout_ms);
		// The primary round trip is mandatory: any failure here is fatal to
		// the whole operation, with no partial results.
		let response = self
			.collaborators
			.backend
			.completion_suggest(&self.cfg.backend, &plan.queries, timeout)
			.await
			.map_err(|err| SuggestError::Backend { message: err.to_string() })?;
		let merged = merge::merge_response(&plan.profiles, response.groups, req.limit);

		info!(
			query = %term,
			query_kind = plan.kind.as_str(),
			backend_took_ms = response.took_ms,
			hits_total = merged.total,
			hits_returned = merged.suggestions.len(),
			"Completion suggest finished."
		);

		let suggestions = self.repair_missing_text(&term, merged.suggestions, timeout).await;

		Ok(SuggestionSet { kind: plan.kind, suggestions })
	}
}

/// Truncates the term to the backend's indexed input length. Truncating, not
/// rejecting: the prefix still finds results.
fn truncate_term(term: &str, max_chars: usize) -> String {
	if term.chars().count() <= max_chars {
		term.to_string()
	} else {
		term.chars().take(max_chars).collect()
	}
}

/// Order-preserving dedup; entries equal to the term itself are dropped. An
/// empty result means "no variants".
fn normalize_variants(variants: &[String], term: &str) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for variant in variants {
		if variant == term {
			continue;
		}
		if seen.insert(variant.as_str()) {
			out.push(variant.clone());
		}
	}

	out
}
